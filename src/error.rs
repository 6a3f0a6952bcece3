//! Error taxonomy for the transcription pipeline.
//!
//! Every failure that leaves the pipeline is a [`WhispError`]. Each kind maps
//! to a stable process exit code:
//!
//! | Kind | Exit code |
//! |---|---|
//! | `InvalidArguments` | 2 |
//! | `FileNotFound` | 10 |
//! | `UnsupportedFormat` | 11 |
//! | `ModelLoad` | 20 |
//! | `Transcription` | 30 |
//! | `MissingCredential` | 31 |
//! | `Output` | 40 |
//!
//! Collaborators (recognition, diarization, audio decoding) report their own
//! error types, which are converted at the pipeline boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WhispError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    FileNotFound(String),
    #[error("{0}")]
    UnsupportedFormat(String),
    #[error("{0}")]
    ModelLoad(String),
    #[error("{0}")]
    Transcription(String),
    #[error("{0}")]
    MissingCredential(String),
    #[error("{0}")]
    Output(String),
}

impl WhispError {
    pub fn exit_code(&self) -> u8 {
        match self {
            WhispError::InvalidArguments(_) => 2,
            WhispError::FileNotFound(_) => 10,
            WhispError::UnsupportedFormat(_) => 11,
            WhispError::ModelLoad(_) => 20,
            WhispError::Transcription(_) => 30,
            WhispError::MissingCredential(_) => 31,
            WhispError::Output(_) => 40,
        }
    }
}

/// Failure reported by a speech recognition engine.
#[derive(Debug, Error)]
pub enum RecognitionError {
    #[error("failed to load model {model}: {reason}")]
    ModelLoad { model: String, reason: String },
    #[error("transcription failed: {0}")]
    Transcription(String),
}

/// Failure reported by a diarization backend.
#[derive(Debug, Error)]
pub enum DiarizationError {
    #[error("{0}")]
    MissingCredential(String),
    #[error("{0}")]
    Failed(String),
}

/// Failure while decoding audio into samples.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("failed to read wav: {0}")]
    Wav(#[from] hound::Error),
    #[error("unexpected wav format: {0}")]
    Format(String),
    #[error("failed to run ffmpeg: {0}")]
    Io(#[from] std::io::Error),
    #[error("ffmpeg could not decode audio: {0}")]
    Decode(String),
}

impl From<RecognitionError> for WhispError {
    fn from(err: RecognitionError) -> Self {
        match err {
            RecognitionError::ModelLoad { .. } => WhispError::ModelLoad(err.to_string()),
            RecognitionError::Transcription(_) => WhispError::Transcription(err.to_string()),
        }
    }
}

impl From<DiarizationError> for WhispError {
    fn from(err: DiarizationError) -> Self {
        match err {
            DiarizationError::MissingCredential(message) => WhispError::MissingCredential(message),
            DiarizationError::Failed(message) => {
                WhispError::Transcription(format!("diarization failed: {message}"))
            }
        }
    }
}

impl From<AudioError> for RecognitionError {
    fn from(err: AudioError) -> Self {
        RecognitionError::Transcription(err.to_string())
    }
}
