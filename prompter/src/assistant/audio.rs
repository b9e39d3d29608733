use serde::Serialize;
use std::path::{Path, PathBuf};

pub const MISSING_AUDIO_WARNING: &str = "The music file does not exist.";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AudioStatus {
    Available { path: PathBuf },
    Missing { path: PathBuf, warning: String },
}

impl AudioStatus {
    pub fn is_available(&self) -> bool {
        matches!(self, AudioStatus::Available { .. })
    }
}

/// Checks whether the generated audio file is on disk.
pub fn check_audio(path: &Path) -> AudioStatus {
    if path.exists() {
        tracing::debug!(path = %path.display(), "audio file found");
        AudioStatus::Available {
            path: path.to_path_buf(),
        }
    } else {
        tracing::warn!(path = %path.display(), "audio file missing");
        AudioStatus::Missing {
            path: path.to_path_buf(),
            warning: MISSING_AUDIO_WARNING.to_string(),
        }
    }
}
