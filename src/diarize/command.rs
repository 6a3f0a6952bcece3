use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::{
    config::{huggingface_token, ConfigSource, HF_TOKEN},
    diarize::{distinct_labels, parse_intervals, Diarizer, SpeakerInterval},
    error::DiarizationError,
};

/// Diarizer that delegates to an external helper program.
///
/// The helper is invoked as `<program> <audio> [--num-speakers N]` with the
/// Hugging Face token in `HF_TOKEN`, and must print a JSON array of
/// `{"start", "end", "label"}` intervals on stdout.
pub struct CommandDiarizer {
    program: String,
    credentials: Box<dyn ConfigSource>,
}

impl CommandDiarizer {
    pub fn new(program: impl Into<String>, credentials: impl ConfigSource + 'static) -> Self {
        Self {
            program: program.into(),
            credentials: Box::new(credentials),
        }
    }
}

impl Diarizer for CommandDiarizer {
    fn diarize(
        &self,
        audio: &Path,
        speakers_hint: Option<u32>,
    ) -> Result<Vec<SpeakerInterval>, DiarizationError> {
        let token = huggingface_token(self.credentials.as_ref())?;

        log::info!("diarizing...");
        let mut command = Command::new(&self.program);
        command.arg(audio);
        if let Some(count) = speakers_hint {
            command.arg("--num-speakers").arg(count.to_string());
        }

        let output = command
            .env(HF_TOKEN, token)
            .stdin(Stdio::null())
            .output()
            .map_err(|err| match err.kind() {
                ErrorKind::NotFound => DiarizationError::Failed(format!(
                    "diarization helper `{}` not found",
                    self.program
                )),
                _ => DiarizationError::Failed(format!("failed to run `{}`: {err}", self.program)),
            })?;

        if !output.status.success() {
            return Err(DiarizationError::Failed(format!(
                "`{}` exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let intervals = parse_intervals(&String::from_utf8_lossy(&output.stdout))?;
        log::info!("found {} speakers", distinct_labels(&intervals).len());
        Ok(intervals)
    }
}
