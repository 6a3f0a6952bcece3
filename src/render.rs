//! Markdown rendering for transcripts.
//!
//! The output is a YAML frontmatter block, a `# transcript:` header and one
//! paragraph per speaker turn:
//!
//! ```text
//! ---
//! source: ./meeting.m4a
//! duration: 5m 42s
//! speakers:
//!   - SPEAKER_00
//!   - SPEAKER_01
//! model: medium
//! transcribed: 2025-01-15T10:30:00Z
//! ---
//!
//! # transcript: meeting.m4a
//!
//! **[00:00]** SPEAKER_00: hello there
//!
//! **[00:03]** SPEAKER_01: hi
//! ```

use std::path::Path;

use crate::{
    timefmt::{format_duration, format_timestamp},
    SpeakerTurn, Transcript,
};

/// Body used when a recording produced no words at all.
pub const SILENCE: &str = "[...silence]";

/// Render `transcript` as markdown.
///
/// With `single_speaker` set, the frontmatter lists no speakers and turns are
/// rendered without a speaker label.
pub fn render(transcript: &Transcript, single_speaker: bool) -> String {
    [
        render_frontmatter(transcript, single_speaker),
        String::new(),
        render_header(transcript),
        String::new(),
        render_body(transcript, single_speaker),
    ]
    .join("\n")
}

fn source_name(source: &str) -> String {
    Path::new(source)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.to_string())
}

fn render_frontmatter(transcript: &Transcript, single_speaker: bool) -> String {
    let mut lines = vec![
        "---".to_string(),
        format!("source: ./{}", source_name(&transcript.source)),
        format!("duration: {}", format_duration(transcript.duration)),
    ];

    if single_speaker {
        lines.push("speakers: []".to_string());
    } else {
        lines.push("speakers:".to_string());
        lines.extend(transcript.speakers.iter().map(|speaker| format!("  - {speaker}")));
    }

    lines.push(format!("model: {}", transcript.model));
    lines.push(format!(
        "transcribed: {}",
        transcript.transcribed_at.format("%Y-%m-%dT%H:%M:%SZ")
    ));
    lines.push("---".to_string());

    lines.join("\n")
}

fn render_header(transcript: &Transcript) -> String {
    format!("# transcript: {}", source_name(&transcript.source))
}

fn render_body(transcript: &Transcript, single_speaker: bool) -> String {
    if transcript.turns.is_empty() {
        return SILENCE.to_string();
    }

    transcript
        .turns
        .iter()
        .map(|turn| render_turn(turn, transcript.duration, single_speaker))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_turn(turn: &SpeakerTurn, audio_duration: f64, single_speaker: bool) -> String {
    let timestamp = format_timestamp(turn.start_time, audio_duration);
    if single_speaker {
        format!("**{timestamp}** {}", turn.text())
    } else {
        format!("**{timestamp}** {}: {}", turn.speaker, turn.text())
    }
}
