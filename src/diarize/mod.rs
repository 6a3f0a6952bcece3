//! Speaker diarization.
//!
//! A diarization result is an ordered list of labelled time intervals. Order
//! matters: the aligner gives a word to the first interval that covers it.

pub mod command;

use std::path::Path;

use serde::Deserialize;

use crate::error::DiarizationError;

pub use command::CommandDiarizer;

/// A time range in seconds attributed to one speaker.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SpeakerInterval {
    pub start: f64,
    pub end: f64,
    #[serde(alias = "speaker")]
    pub label: String,
}

impl SpeakerInterval {
    pub fn new(start: f64, end: f64, label: impl Into<String>) -> Self {
        Self {
            start,
            end,
            label: label.into(),
        }
    }

    /// Whether `time` lies within the interval, both ends included.
    pub fn contains(&self, time: f64) -> bool {
        self.start <= time && time <= self.end
    }
}

pub trait Diarizer {
    /// Partition `audio` into speaker intervals. `speakers_hint` is the
    /// expected number of speakers, if known.
    fn diarize(
        &self,
        audio: &Path,
        speakers_hint: Option<u32>,
    ) -> Result<Vec<SpeakerInterval>, DiarizationError>;
}

/// Parse a JSON array of `{"start", "end", "label"}` objects, keeping order.
pub fn parse_intervals(json: &str) -> Result<Vec<SpeakerInterval>, DiarizationError> {
    serde_json::from_str(json)
        .map_err(|err| DiarizationError::Failed(format!("invalid diarization output: {err}")))
}

/// Distinct labels in first-appearance order.
pub fn distinct_labels(intervals: &[SpeakerInterval]) -> Vec<&str> {
    let mut labels: Vec<&str> = Vec::new();
    for interval in intervals {
        if !labels.contains(&interval.label.as_str()) {
            labels.push(&interval.label);
        }
    }
    labels
}
