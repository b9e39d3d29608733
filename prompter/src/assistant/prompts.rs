pub const TTM_PROMPT_INSTRUCTIONS: &str = r#"You are a prompt engineer.
The user wants to hear the audio they imagine through a Text-to-Music (TTM) model, but is not an audio expert and finds it hard to write a detailed TTM prompt.
Turn the user's vague request into a specific TTM prompt.
Attributes you may describe: tone, pitch, rhythm, atmosphere, style and any other audio detail.
Do not describe: audio length, vocals.
Only cover attributes the user mentions.
Reply with the refined TTM prompt and nothing else.
User request: [{intent}]"#;

pub const FOLLOW_UP_INSTRUCTIONS: &str = r#"The user wants to hear the audio they imagine through a Text-to-Music (TTM) model, but is not an audio expert and finds it hard to write a detailed TTM prompt.
Find the audio attributes missing from the user's request and ask follow-up questions that would fill them in.
Attributes you may ask about: tone, pitch, rhythm, atmosphere, style and any other audio detail.
Do not ask about: audio length, vocals.
Format your answer as:
    1) [ Attributes to adjust, based on the user's request: [{intent}] ]
        - [ suggested follow-up answers ]
    2) [ Attributes not yet mentioned, based on the user's request: [{intent}] ]
        - [ suggested follow-up answers ]"#;

pub const REFINE_INSTRUCTIONS: &str = r#"You are a prompt engineer and will receive two pieces of information:
- user_feedback: what the user wants changed after listening to the audio generated from your last prompt.
- llm_prompt: the Text-to-Music (TTM) prompt you wrote last time, which produced that audio.
Modify [{llm_prompt}] so that it reflects [{user_feedback}].
Reply with the modified TTM prompt and nothing else."#;

pub fn format_ttm_prompt_instructions(intent: &str) -> String {
    TTM_PROMPT_INSTRUCTIONS.replace("{intent}", intent)
}

pub fn format_follow_up_instructions(intent: &str) -> String {
    FOLLOW_UP_INSTRUCTIONS.replace("{intent}", intent)
}

pub fn format_refine_instructions(llm_prompt: &str, user_feedback: &str) -> String {
    // Feedback first so a literal "{user_feedback}" inside the prompt is left alone.
    REFINE_INSTRUCTIONS
        .replace("{user_feedback}", user_feedback)
        .replacen("{llm_prompt}", llm_prompt, 1)
}
