//! Grouping of words into speaker turns.

use crate::{SpeakerTurn, Word};

/// Silence, in seconds, after which the same speaker starts a new paragraph.
pub const DEFAULT_GAP_THRESHOLD: f64 = 1.5;

/// Group time-ordered words into speaker turns.
///
/// A new turn starts when the effective speaker changes, or when the pause
/// since the previous word's end exceeds `gap_threshold` (a pause exactly
/// equal to the threshold keeps the turn going). The pause is always measured
/// against the immediately preceding word. Empty input yields no turns.
pub fn words_to_turns(words: &[Word], gap_threshold: f64) -> Vec<SpeakerTurn> {
    let Some((first, rest)) = words.split_first() else {
        return Vec::new();
    };

    let mut turns = Vec::new();
    let mut current = SpeakerTurn {
        speaker: first.effective_speaker().to_string(),
        start_time: first.start,
        words: vec![first.clone()],
    };
    let mut previous = first;

    for word in rest {
        let speaker = word.effective_speaker();
        let gap = word.start - previous.end;

        if speaker != current.speaker || gap > gap_threshold {
            let finished = std::mem::replace(
                &mut current,
                SpeakerTurn {
                    speaker: speaker.to_string(),
                    start_time: word.start,
                    words: vec![word.clone()],
                },
            );
            turns.push(finished);
        } else {
            current.words.push(word.clone());
        }
        previous = word;
    }

    turns.push(current);
    turns
}
