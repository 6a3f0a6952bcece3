//! Speech recognition engines.
//!
//! An engine turns an audio file into time-stamped words. The pipeline talks to
//! engines only through [`Recognizer`], so tests and alternative backends can
//! stand in for the bundled whisper engine.
//!
//! # Whisper Engine
//!
//! - **Model Format**: single GGML file named `ggml-<model>.bin`
//! - **Models**: tiny, base, small, medium, large-v3 and their variants
//! - **Default**: `large-v3` on CUDA builds, `medium` otherwise
//!
//! The engine lives in `engines::whisper` and requires the `whisper` feature, which is
//! enabled by default. Builds with `--no-default-features` keep the
//! [`Recognizer`] trait and the target helpers only.

#[cfg(feature = "whisper")]
pub mod whisper;

use std::fmt;
use std::path::Path;

use crate::{error::RecognitionError, Word};

/// Hardware a recognition engine runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionTarget {
    Cpu,
    Cuda,
}

impl fmt::Display for ExecutionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionTarget::Cpu => f.write_str("cpu"),
            ExecutionTarget::Cuda => f.write_str("cuda"),
        }
    }
}

/// The best target this build can use.
pub fn detect_execution_target() -> ExecutionTarget {
    if cfg!(feature = "cuda") {
        ExecutionTarget::Cuda
    } else {
        ExecutionTarget::Cpu
    }
}

/// Model picked when the caller does not request one.
pub fn default_model_for(target: ExecutionTarget) -> &'static str {
    match target {
        ExecutionTarget::Cuda => "large-v3",
        ExecutionTarget::Cpu => "medium",
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecognitionRequest {
    /// Model name; the engine's default is used when `None`.
    pub model: Option<String>,
    /// Language code such as `en`; auto-detected when `None`.
    pub language: Option<String>,
}

/// Words recognized in a recording, speaker unset, plus the audio length.
#[derive(Debug, Clone, PartialEq)]
pub struct Recognition {
    pub words: Vec<Word>,
    pub duration: f64,
}

pub trait Recognizer {
    /// Model name used when a request does not name one.
    fn default_model(&self) -> String;

    fn transcribe(
        &mut self,
        audio: &Path,
        request: &RecognitionRequest,
    ) -> Result<Recognition, RecognitionError>;
}
