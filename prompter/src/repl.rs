//! Terminal version of the chat page.

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::assistant::audio::{check_audio, AudioStatus};
use crate::assistant::graph::PromptGraph;
use crate::assistant::state::{is_exit, SessionInput, SessionOutput};

/// Reads intents (and optional feedback) until `exit` or end of input.
pub async fn run_repl<R, W>(graph: &PromptGraph, reader: R, mut writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();

    loop {
        writer
            .write_all(b"Describe the music you want (type 'exit' to quit): ")
            .await?;
        writer.flush().await?;

        let Some(intent) = lines.next_line().await? else {
            break;
        };
        if intent.is_empty() {
            continue;
        }
        if is_exit(&intent) {
            let output = graph.run(SessionInput::new(intent)).await;
            print_output(&mut writer, &output).await?;
            break;
        }

        let mut notices = Vec::new();
        let ttm_prompt = graph.generate_ttm_prompt(&intent, &mut notices).await;
        let follow_up = graph.follow_up_questions(&intent, &mut notices).await;
        let partial = SessionOutput {
            ttm_prompt: ttm_prompt.clone(),
            follow_up,
            notices: std::mem::take(&mut notices),
            ..Default::default()
        };
        print_output(&mut writer, &partial).await?;

        writer.write_all(b"Feedback (leave empty to skip): ").await?;
        writer.flush().await?;
        let feedback = lines.next_line().await?.unwrap_or_default();

        let refined_prompt = match (feedback.is_empty(), ttm_prompt.as_deref()) {
            (false, Some(prompt)) => graph.refine_prompt(prompt, &feedback, &mut notices).await,
            _ => None,
        };
        let rest = SessionOutput {
            refined_prompt,
            audio: Some(check_audio(&graph.config().audio_file_path)),
            notices,
            ..Default::default()
        };
        print_output(&mut writer, &rest).await?;
    }

    writer.flush().await?;
    Ok(())
}

async fn print_output<W>(writer: &mut W, output: &SessionOutput) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut text = String::new();

    for notice in &output.notices {
        text.push_str(&format!("error: {}\n", notice));
    }
    if let Some(message) = &output.message {
        text.push_str(&format!("{}\n", message));
    }
    if let Some(prompt) = &output.ttm_prompt {
        text.push_str(&format!("TTM prompt: {}\n", prompt));
    }
    if let Some(questions) = &output.follow_up {
        text.push_str(&format!("Follow-up questions:\n{}\n", questions));
    }
    if let Some(prompt) = &output.refined_prompt {
        text.push_str(&format!("Refined TTM prompt: {}\n", prompt));
    }
    match &output.audio {
        Some(AudioStatus::Available { path }) => {
            text.push_str(&format!("Here is the music file: {}\n", path.display()));
        }
        Some(AudioStatus::Missing { warning, .. }) => {
            text.push_str(&format!("warning: {}\n", warning));
        }
        None => {}
    }

    writer.write_all(text.as_bytes()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::graph::tests::{test_config, ScriptedCompletion};
    use std::path::PathBuf;

    async fn session(replies: Vec<anyhow::Result<String>>, stdin: &str) -> (String, usize) {
        let llm = ScriptedCompletion::new(replies);
        let graph = PromptGraph::with_completion(
            test_config(PathBuf::from("/nonexistent/generated_audio.wav")),
            llm.clone(),
        );
        let mut out = Vec::new();
        run_repl(&graph, stdin.as_bytes(), &mut out).await.unwrap();
        (String::from_utf8(out).unwrap(), llm.calls())
    }

    #[tokio::test]
    async fn full_turn_then_exit() {
        let (out, calls) = session(
            vec![
                Ok("Gentle piano".to_string()),
                Ok("1) tempo?".to_string()),
                Ok("Gentle piano with cello".to_string()),
            ],
            "sad piano\nadd cello\nexit\n",
        )
        .await;

        assert_eq!(calls, 3);
        assert!(out.contains("TTM prompt: Gentle piano\n"));
        assert!(out.contains("Follow-up questions:\n1) tempo?"));
        assert!(out.contains("Refined TTM prompt: Gentle piano with cello"));
        assert!(out.contains("warning: The music file does not exist."));
        assert!(out.contains("Ending the session."));
    }

    #[tokio::test]
    async fn exit_first_makes_no_calls() {
        let (out, calls) = session(vec![], "Exit\nnever read\n").await;
        assert_eq!(calls, 0);
        assert!(out.contains("Ending the session."));
    }

    #[tokio::test]
    async fn errors_are_printed_and_refinement_skipped() {
        let (out, calls) = session(
            vec![Err(anyhow::anyhow!("invalid api key")), Ok("2) mood?".to_string())],
            "techno\nharder\n",
        )
        .await;

        assert_eq!(calls, 2);
        assert!(out.contains("error: OpenAI API call failed: invalid api key"));
        assert!(!out.contains("Refined TTM prompt"));
    }
}
