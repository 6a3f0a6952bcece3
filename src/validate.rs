//! Input checks that run before any model is loaded.

use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::WhispError;

/// Ensure `path` names an existing regular file and return it canonicalised.
pub fn validate_file_exists(path: &Path) -> Result<PathBuf, WhispError> {
    if !path.exists() {
        return Err(WhispError::FileNotFound(format!(
            "file not found: {}",
            path.display()
        )));
    }
    if !path.is_file() {
        return Err(WhispError::FileNotFound(format!("not a file: {}", path.display())));
    }
    path.canonicalize()
        .map_err(|err| WhispError::FileNotFound(format!("{}: {err}", path.display())))
}

/// Checks whether an audio file can be decoded.
pub trait FormatProbe {
    fn probe(&self, path: &Path) -> Result<(), WhispError>;
}

/// Probe backed by the `ffprobe` binary from ffmpeg.
#[derive(Debug, Clone)]
pub struct Ffprobe {
    pub program: String,
    pub timeout: Duration,
}

impl Default for Ffprobe {
    fn default() -> Self {
        Self {
            program: "ffprobe".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl FormatProbe for Ffprobe {
    fn probe(&self, path: &Path) -> Result<(), WhispError> {
        let spawned = Command::new(&self.program)
            .args(["-v", "error", "-show_entries", "format=duration"])
            .args(["-of", "default=noprint_wrappers=1:nokey=1"])
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn();

        let mut child = match spawned {
            Ok(child) => child,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(WhispError::UnsupportedFormat(
                    "ffprobe not found. please install ffmpeg.".to_string(),
                ));
            }
            Err(err) => {
                return Err(WhispError::UnsupportedFormat(format!(
                    "error running ffprobe: {err}"
                )));
            }
        };

        // Drain stderr concurrently so a chatty ffprobe never blocks on a full pipe.
        let stderr_reader = child.stderr.take().map(|mut pipe| {
            thread::spawn(move || {
                let mut buf = String::new();
                let _ = pipe.read_to_string(&mut buf);
                buf
            })
        });
        let collect_stderr = move || {
            stderr_reader
                .and_then(|handle| handle.join().ok())
                .unwrap_or_default()
        };

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    // reader is left detached; grandchildren may still hold the pipe
                    return Err(WhispError::UnsupportedFormat(format!(
                        "ffprobe timed out checking: {}",
                        path.display()
                    )));
                }
                Ok(None) => thread::sleep(Duration::from_millis(20)),
                Err(err) => {
                    let _ = child.kill();
                    return Err(WhispError::UnsupportedFormat(format!(
                        "error running ffprobe: {err}"
                    )));
                }
            }
        };

        let stderr = collect_stderr();
        if status.success() {
            return Ok(());
        }

        Err(WhispError::UnsupportedFormat(format!(
            "unsupported audio format: {}\n{}",
            path.display(),
            stderr.trim()
        )))
    }
}
