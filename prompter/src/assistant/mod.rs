pub mod audio;
pub mod configuration;
pub mod graph;
pub mod openai;
pub mod prompts;
pub mod state;
