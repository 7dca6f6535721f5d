//! Suggestion filtering
//!
//! Drops candidates that look like another rendition of a song the user
//! already liked, removes duplicate videos and bounds the result size.
//! Surviving candidates keep their original relative order.

use std::collections::HashSet;

use crate::models::CandidateVideo;

/// Upper bound on recommendations returned to the caller
pub const MAX_SUGGESTIONS: usize = 10;

/// Song names of this many characters or fewer never exclude anything
const MIN_SONG_NAME_CHARS: usize = 3;

/// Lower-cased song portion of a liked title (text after the first `-`).
///
/// `None` when the title has no `-` or the song name is too short to be a
/// reliable match.
pub fn song_name(liked_title: &str) -> Option<String> {
    let (_, song) = liked_title.split_once('-')?;
    let song = song.trim().to_lowercase();
    if song.chars().count() <= MIN_SONG_NAME_CHARS {
        return None;
    }
    Some(song)
}

/// Applies near-duplicate exclusion, `videoId` dedup and truncation.
pub fn filter_suggestions(
    candidates: Vec<CandidateVideo>,
    liked_titles: &[String],
) -> Vec<CandidateVideo> {
    let exclusions: Vec<String> = liked_titles.iter().filter_map(|t| song_name(t)).collect();
    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut suggestions = Vec::new();

    for candidate in candidates {
        if suggestions.len() == MAX_SUGGESTIONS {
            break;
        }

        let suggested_lower = candidate.title.to_lowercase();
        if let Some(song) = exclusions.iter().find(|song| suggested_lower.contains(song.as_str())) {
            tracing::debug!(
                title = %candidate.title,
                liked_song = %song,
                "Excluding near-duplicate of a liked song"
            );
            continue;
        }

        if !seen_ids.insert(candidate.video_id.clone()) {
            continue;
        }

        suggestions.push(candidate);
    }

    suggestions
}
