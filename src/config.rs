//! Process-wide settings, kept behind [`ConfigSource`] so the rest of the
//! crate never reads the environment directly.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::DiarizationError;

pub const HF_TOKEN: &str = "HF_TOKEN";
pub const HUGGING_FACE_HUB_TOKEN: &str = "HUGGING_FACE_HUB_TOKEN";
pub const MODEL_DIR: &str = "WHISP_MODEL_DIR";
pub const DIARIZE_CMD: &str = "WHISP_DIARIZE_CMD";

const DEFAULT_MODEL_DIR: &str = "models";
const DEFAULT_DIARIZE_CMD: &str = "whisp-diarize";

/// Key/value lookup for configuration. Empty values count as unset.
pub trait ConfigSource {
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads from the process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSource;

impl ConfigSource for EnvSource {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|value| !value.is_empty())
    }
}

impl ConfigSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).filter(|value| !value.is_empty()).cloned()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Directory holding `ggml-<model>.bin` whisper models.
    pub model_dir: PathBuf,
    /// Executable that performs diarization.
    pub diarize_command: String,
}

impl Settings {
    pub fn from_source(source: &dyn ConfigSource) -> Self {
        Self {
            model_dir: source
                .get(MODEL_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_DIR)),
            diarize_command: source
                .get(DIARIZE_CMD)
                .unwrap_or_else(|| DEFAULT_DIARIZE_CMD.to_string()),
        }
    }
}

/// The Hugging Face token used by diarization models.
pub fn huggingface_token(source: &dyn ConfigSource) -> Result<String, DiarizationError> {
    source
        .get(HF_TOKEN)
        .or_else(|| source.get(HUGGING_FACE_HUB_TOKEN))
        .ok_or_else(|| {
            DiarizationError::MissingCredential(format!(
                "hugging face token required for diarization. set {HF_TOKEN} or {HUGGING_FACE_HUB_TOKEN} environment variable."
            ))
        })
}
