//! Output filename derivation.
//!
//! Transcripts are named `YYYY-MM-DDTHH-MM <name> -- source__transcript.md`,
//! where the timestamp is the source file's modification time in local time.

use std::path::Path;

use chrono::{DateTime, Local, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

static UNSAFE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[<>:"/\\|?*]"#).expect("valid pattern"));

/// Modification time of `path`, or the current time if it cannot be read.
pub fn source_timestamp(path: &Path) -> NaiveDateTime {
    let modified = std::fs::metadata(path).and_then(|meta| meta.modified());
    match modified {
        Ok(time) => DateTime::<Local>::from(time).naive_local(),
        Err(err) => {
            log::debug!("no mtime for {}: {err}", path.display());
            Local::now().naive_local()
        }
    }
}

/// Strip characters that are unsafe in filenames, then surrounding whitespace.
pub fn sanitize_filename(name: &str) -> String {
    UNSAFE_CHARS.replace_all(name, "").trim().to_string()
}

pub fn make_output_filename(source: &Path, timestamp: NaiveDateTime) -> String {
    let stem = source
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!(
        "{} {} -- source__transcript.md",
        timestamp.format("%Y-%m-%dT%H-%M"),
        sanitize_filename(&stem)
    )
}
