use serde::{Deserialize, Serialize};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Which OpenAI endpoint shape the client talks to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ApiStyle {
    #[serde(rename = "chat")]
    Chat,
    #[serde(rename = "completion")]
    Completion,
}

impl Default for ApiStyle {
    fn default() -> Self {
        ApiStyle::Chat
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable not found - please add this to your .env file")]
    MissingVar(&'static str),
    #[error("invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Configuration {
    pub openai_api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub api_style: ApiStyle,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_audio_file_path")]
    pub audio_file_path: PathBuf,
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_max_tokens() -> u32 {
    200
}

fn default_audio_file_path() -> PathBuf {
    PathBuf::from("generated_audio.wav")
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 3000))
}

impl Configuration {
    /// Builds the configuration from the process environment.
    ///
    /// Only `OPENAI_API_KEY` is required; `OPENAI_MODEL`, `OPENAI_API_STYLE`,
    /// `OPENAI_BASE_URL`, `MAX_TOKENS`, `AUDIO_FILE_PATH` and `BIND_ADDR` fall
    /// back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        tracing::debug!("loading configuration");

        let openai_api_key = lookup("OPENAI_API_KEY")
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingVar("OPENAI_API_KEY"))?;

        let model = lookup("OPENAI_MODEL").unwrap_or_else(default_model);

        let api_style = match lookup("OPENAI_API_STYLE") {
            None => ApiStyle::default(),
            Some(value) => match value.to_lowercase().as_str() {
                "chat" => ApiStyle::Chat,
                "completion" | "completions" => ApiStyle::Completion,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: "OPENAI_API_STYLE",
                        value,
                    })
                }
            },
        };

        let base_url = lookup("OPENAI_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(default_base_url);

        let max_tokens = match lookup("MAX_TOKENS") {
            None => default_max_tokens(),
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                var: "MAX_TOKENS",
                value,
            })?,
        };

        let audio_file_path = lookup("AUDIO_FILE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(default_audio_file_path);

        let bind_addr = match lookup("BIND_ADDR") {
            None => default_bind_addr(),
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                var: "BIND_ADDR",
                value,
            })?,
        };

        tracing::info!(
            model = %model,
            api_style = ?api_style,
            base_url = %base_url,
            audio_file = %audio_file_path.display(),
            "configuration loaded"
        );

        Ok(Configuration {
            openai_api_key,
            model,
            api_style,
            base_url,
            max_tokens,
            audio_file_path,
            bind_addr,
        })
    }
}
