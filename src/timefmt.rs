//! Clock and duration strings for rendered transcripts.

const HOUR: u64 = 3600;

fn whole_seconds(seconds: f64) -> u64 {
    // Negative and NaN inputs saturate to zero.
    seconds as u64
}

/// Format `seconds` as `[MM:SS]`, or `[HH:MM:SS]` when the whole recording
/// runs an hour or longer.
///
/// The width is chosen from `audio_duration_seconds`, so every timestamp in a
/// transcript shares one format. Fractional seconds are truncated.
///
/// ```
/// use whisp::timefmt::format_timestamp;
///
/// assert_eq!(format_timestamp(75.9, 300.0), "[01:15]");
/// assert_eq!(format_timestamp(75.9, 4000.0), "[00:01:15]");
/// ```
pub fn format_timestamp(seconds: f64, audio_duration_seconds: f64) -> String {
    let total = whole_seconds(seconds);
    let hours = total / HOUR;
    let minutes = (total % HOUR) / 60;
    let secs = total % 60;

    if audio_duration_seconds >= HOUR as f64 {
        format!("[{hours:02}:{minutes:02}:{secs:02}]")
    } else {
        format!("[{minutes:02}:{secs:02}]")
    }
}

/// Format a duration such as `5m 42s` or `1h 2s`, omitting zero components.
///
/// A zero duration renders as `0s`.
pub fn format_duration(seconds: f64) -> String {
    let total = whole_seconds(seconds);
    if total == 0 {
        return "0s".to_string();
    }

    let parts = [
        (total / HOUR, "h"),
        ((total % HOUR) / 60, "m"),
        (total % 60, "s"),
    ];

    parts
        .iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, unit)| format!("{value}{unit}"))
        .collect::<Vec<_>>()
        .join(" ")
}
