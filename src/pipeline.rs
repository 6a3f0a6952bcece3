//! End-to-end transcription: validate, recognize, diarize, align, segment,
//! render.
//!
//! Every stage runs to completion before the next starts. Validation and
//! recognition failures are always fatal. Diarization is skipped when exactly
//! one speaker is requested; when it fails, strict runs abort while default
//! runs fall back to labelling every word [`UNKNOWN_SPEAKER`](crate::UNKNOWN_SPEAKER)
//! and report a warning.

use std::collections::HashSet;
use std::path::Path;

use chrono::Utc;

use crate::{
    align::{assign_speakers, mark_unknown},
    diarize::{Diarizer, SpeakerInterval},
    engines::{RecognitionRequest, Recognizer},
    filename::{make_output_filename, source_timestamp},
    render::render,
    segment::{words_to_turns, DEFAULT_GAP_THRESHOLD},
    validate::{validate_file_exists, Ffprobe, FormatProbe},
    Transcript, WhispError, Word,
};

/// Printed after a diarization warning when the run carries on.
pub const FALLBACK_NOTE: &str = "continuing without diarization (all speakers marked UNKNOWN)";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    pub model: Option<String>,
    pub language: Option<String>,
    /// Expected speaker count; `Some(1)` disables diarization.
    pub speakers: Option<u32>,
    /// Treat diarization failures as fatal.
    pub strict: bool,
}

impl Options {
    pub fn single_speaker(&self) -> bool {
        self.speakers == Some(1)
    }
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub transcript: Transcript,
    pub markdown: String,
    pub suggested_filename: String,
    /// Non-fatal problems, already logged, for the caller to surface.
    pub warnings: Vec<String>,
}

pub struct Pipeline<R, D> {
    recognizer: R,
    diarizer: D,
    probe: Box<dyn FormatProbe>,
}

impl<R: Recognizer, D: Diarizer> Pipeline<R, D> {
    pub fn new(recognizer: R, diarizer: D) -> Self {
        Self {
            recognizer,
            diarizer,
            probe: Box::new(Ffprobe::default()),
        }
    }

    /// Replace the ffprobe-based format check.
    pub fn with_probe(mut self, probe: impl FormatProbe + 'static) -> Self {
        self.probe = Box::new(probe);
        self
    }

    pub fn run(&mut self, file: &Path, options: &Options) -> Result<PipelineRun, WhispError> {
        log::info!("processing: {}", file.display());

        let source = validate_file_exists(file)?;
        self.probe.probe(&source)?;

        let request = RecognitionRequest {
            model: options.model.clone(),
            language: options.language.clone(),
        };
        let recognition = self.recognizer.transcribe(&source, &request)?;

        let mut warnings = Vec::new();
        let words = match self.try_diarize(&source, options, &mut warnings)? {
            Some(intervals) => assign_speakers(&recognition.words, &intervals),
            None => mark_unknown(&recognition.words),
        };

        let turns = words_to_turns(&words, DEFAULT_GAP_THRESHOLD);
        let speakers = extract_speakers(&words, options.single_speaker());
        let model = options
            .model
            .clone()
            .unwrap_or_else(|| self.recognizer.default_model());

        let transcript = Transcript {
            source: source.to_string_lossy().into_owned(),
            duration: recognition.duration,
            speakers,
            model,
            turns,
            transcribed_at: Utc::now(),
        };
        let markdown = render(&transcript, options.single_speaker());
        let suggested_filename = make_output_filename(&source, source_timestamp(&source));

        log::info!(
            "complete: {} turns, {} speakers",
            transcript.turns.len(),
            transcript.speakers.len()
        );

        Ok(PipelineRun {
            transcript,
            markdown,
            suggested_filename,
            warnings,
        })
    }

    fn try_diarize(
        &self,
        source: &Path,
        options: &Options,
        warnings: &mut Vec<String>,
    ) -> Result<Option<Vec<SpeakerInterval>>, WhispError> {
        if options.single_speaker() {
            log::info!("skipping diarization (single speaker mode)");
            return Ok(None);
        }

        match self.diarizer.diarize(source, options.speakers) {
            Ok(intervals) => Ok(Some(intervals)),
            Err(err) => {
                let err = WhispError::from(err);
                if options.strict {
                    return Err(err);
                }
                log::warn!("diarization unavailable: {err}");
                warnings.push(err.to_string());
                Ok(None)
            }
        }
    }
}

/// Distinct effective speakers in first-appearance order; empty in
/// single-speaker mode.
pub fn extract_speakers(words: &[Word], single_speaker: bool) -> Vec<String> {
    if single_speaker {
        return Vec::new();
    }
    let mut seen = HashSet::new();
    words
        .iter()
        .map(Word::effective_speaker)
        .filter(|speaker| seen.insert(*speaker))
        .map(str::to_string)
        .collect()
}
