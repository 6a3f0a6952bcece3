pub mod align;
pub mod audio;
pub mod config;
pub mod diarize;
pub mod engines;
pub mod error;
pub mod filename;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod segment;
pub mod timefmt;
pub mod validate;

use chrono::{DateTime, Utc};

pub use error::WhispError;
pub use pipeline::{Options, Pipeline, PipelineRun};

/// Speaker label used when no diarization label applies to a word.
pub const UNKNOWN_SPEAKER: &str = "UNKNOWN";

/// A single recognized token with its timing in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub text: String,
    pub start: f64,
    pub end: f64,
    pub speaker: Option<String>,
}

impl Word {
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
            speaker: None,
        }
    }

    /// Returns a copy of this word attributed to `speaker`.
    pub fn with_speaker(&self, speaker: impl Into<String>) -> Self {
        Self {
            speaker: Some(speaker.into()),
            ..self.clone()
        }
    }

    pub fn midpoint(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    /// The assigned speaker, or [`UNKNOWN_SPEAKER`] when none was assigned.
    pub fn effective_speaker(&self) -> &str {
        self.speaker.as_deref().unwrap_or(UNKNOWN_SPEAKER)
    }
}

/// A maximal run of consecutive words attributed to one speaker.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeakerTurn {
    pub speaker: String,
    pub start_time: f64,
    pub words: Vec<Word>,
}

impl SpeakerTurn {
    /// Word texts joined by single spaces.
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|word| word.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub source: String,
    pub duration: f64,
    pub speakers: Vec<String>,
    pub model: String,
    pub turns: Vec<SpeakerTurn>,
    pub transcribed_at: DateTime<Utc>,
}
