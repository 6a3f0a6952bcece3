//! Word-level speaker assignment.

use crate::{diarize::SpeakerInterval, Word, UNKNOWN_SPEAKER};

/// Label each word with the speaker whose interval contains its midpoint.
///
/// Intervals are scanned in the order given and the first one covering the
/// midpoint (inclusive at both ends) wins, so overlapping intervals resolve in
/// favour of the earlier one. Words outside every interval are labelled
/// [`UNKNOWN_SPEAKER`]. The input words are left untouched.
pub fn assign_speakers(words: &[Word], intervals: &[SpeakerInterval]) -> Vec<Word> {
    words
        .iter()
        .map(|word| {
            let midpoint = word.midpoint();
            let label = intervals
                .iter()
                .find(|interval| interval.contains(midpoint))
                .map(|interval| interval.label.as_str())
                .unwrap_or(UNKNOWN_SPEAKER);
            word.with_speaker(label)
        })
        .collect()
}

/// Force every word to [`UNKNOWN_SPEAKER`], used when no diarization is available.
pub fn mark_unknown(words: &[Word]) -> Vec<Word> {
    words
        .iter()
        .map(|word| word.with_speaker(UNKNOWN_SPEAKER))
        .collect()
}
