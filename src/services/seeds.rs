//! Seed extraction
//!
//! Turns liked video titles (loosely `"Artist - Song"`) into at most
//! [`MAX_SEEDS`] distinct artist names used to drive discovery searches.
//! Noise is stripped by an ordered list of [`NormalizationRule`]s rather
//! than a single compound pattern, so each rule can be exercised alone.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// Upper bound on seed artists per discovery run
pub const MAX_SEEDS: usize = 2;

/// Seeds of this many characters or fewer are discarded
const MIN_SEED_CHARS: usize = 2;

/// One normalization step: every match of `pattern` is removed
pub struct NormalizationRule {
    pub name: &'static str,
    pattern: Regex,
}

impl NormalizationRule {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("Invalid normalization pattern"),
        }
    }

    pub fn matches(&self, input: &str) -> bool {
        self.pattern.is_match(input)
    }

    pub fn run(&self, input: &str) -> String {
        self.pattern.replace_all(input, "").into_owned()
    }
}

/// Applied in order to the raw artist portion of a title
pub static ARTIST_RULES: Lazy<Vec<NormalizationRule>> = Lazy::new(|| {
    vec![
        NormalizationRule::new("hashtags", r"#\w+"),
        // Pictographs plus the modifiers, joiners, keycaps, selectors and tags
        // that glue emoji sequences together
        NormalizationRule::new(
            "emoji",
            r"[\p{Extended_Pictographic}\p{Emoji_Modifier}\x{1F1E6}-\x{1F1FF}\x{200D}\x{20E3}\x{FE0E}\x{FE0F}\x{E0020}-\x{E007F}]",
        ),
        NormalizationRule::new("pipe_suffix", r"\|.*$"),
        NormalizationRule::new("official_marker", r"(?i)[(\[]official.*$"),
    ]
});

/// Derives the seed artists for a batch of liked titles.
///
/// Output is distinct, in first-seen order, and never longer than
/// [`MAX_SEEDS`]. Never fails; an empty input gives an empty output.
pub fn extract_seeds(liked_titles: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut seeds = Vec::new();

    for title in liked_titles {
        let artist = normalize_artist(title);
        if artist.chars().count() <= MIN_SEED_CHARS {
            tracing::trace!(title = %title, "Discarding short seed candidate");
            continue;
        }
        if seen.insert(artist.clone()) {
            seeds.push(artist);
        }
        if seeds.len() == MAX_SEEDS {
            break;
        }
    }

    seeds
}

/// Artist guess for a single title: the text before the first `-` (or the
/// whole title) with every rule in [`ARTIST_RULES`] applied, then trimmed.
pub fn normalize_artist(title: &str) -> String {
    let raw = match title.split_once('-') {
        Some((artist, _)) => artist,
        None => title,
    };

    ARTIST_RULES
        .iter()
        .fold(raw.to_string(), |acc, rule| rule.run(&acc))
        .trim()
        .to_string()
}
