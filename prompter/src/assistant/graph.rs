use std::sync::Arc;

use super::audio::check_audio;
use super::configuration::Configuration;
use super::openai::{Completion, OpenAiClient};
use super::prompts::{
    format_follow_up_instructions, format_refine_instructions, format_ttm_prompt_instructions,
};
use super::state::{is_exit, SessionInput, SessionOutput};

/// Runs one page turn: refine the intent, ask follow-up questions, apply feedback.
pub struct PromptGraph {
    config: Configuration,
    llm: Arc<dyn Completion>,
}

impl PromptGraph {
    pub fn new(config: Configuration) -> Self {
        let llm = Arc::new(OpenAiClient::new(&config));
        Self::with_completion(config, llm)
    }

    pub fn with_completion(config: Configuration, llm: Arc<dyn Completion>) -> Self {
        Self { config, llm }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub async fn generate_ttm_prompt(&self, intent: &str, notices: &mut Vec<String>) -> Option<String> {
        let instructions = format_ttm_prompt_instructions(intent);
        self.ask("ttm_prompt", &instructions, intent, notices).await
    }

    pub async fn follow_up_questions(&self, intent: &str, notices: &mut Vec<String>) -> Option<String> {
        let instructions = format_follow_up_instructions(intent);
        self.ask("follow_up", &instructions, intent, notices).await
    }

    pub async fn refine_prompt(
        &self,
        llm_prompt: &str,
        user_feedback: &str,
        notices: &mut Vec<String>,
    ) -> Option<String> {
        let instructions = format_refine_instructions(llm_prompt, user_feedback);
        self.ask("refine", &instructions, user_feedback, notices).await
    }

    // Every failure collapses to one notice and `None`.
    async fn ask(
        &self,
        step: &str,
        instructions: &str,
        user_text: &str,
        notices: &mut Vec<String>,
    ) -> Option<String> {
        let prompt = format!("{}\n{}", instructions, user_text);

        match self.llm.complete(&prompt).await {
            Ok(text) if text.is_empty() => {
                tracing::warn!(step, "model returned an empty reply");
                None
            }
            Ok(text) => {
                tracing::info!(step, chars = text.len(), "model replied");
                Some(text)
            }
            Err(e) => {
                tracing::error!(step, error = %e, "OpenAI API call failed");
                notices.push(format!("OpenAI API call failed: {}", e));
                None
            }
        }
    }

    pub async fn run(&self, input: SessionInput) -> SessionOutput {
        if is_exit(&input.input) {
            tracing::info!("session ended by user");
            return SessionOutput::terminated();
        }

        let mut output = SessionOutput::default();
        if input.input.is_empty() {
            return output;
        }

        let mut notices = Vec::new();

        output.ttm_prompt = self.generate_ttm_prompt(&input.input, &mut notices).await;
        output.follow_up = self.follow_up_questions(&input.input, &mut notices).await;

        if let (Some(feedback), Some(ttm_prompt)) = (input.feedback(), output.ttm_prompt.as_deref()) {
            output.refined_prompt = self.refine_prompt(ttm_prompt, feedback, &mut notices).await;
        }

        output.audio = Some(check_audio(&self.config.audio_file_path));
        output.notices = notices;
        output
    }
}
