//! Tiered matching of a filter against history lines.
//!
//! A filter is turned into five case-insensitive patterns, from an exact
//! substring match down to loose in-order substrings. Each history line is
//! assigned to the strongest tier it satisfies; within a tier the newest
//! line ranks first.

use crate::candidate::{Candidate, MatchSpan};
use crate::error::SearchError;
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, warn};

static WORD_REGEX: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"[a-zA-Z0-9]+").unwrap());

/// One or more token boundary characters: whitespace, `.`, `-`, `\`, `_`.
const BOUNDARY: &str = r"[\s.\-\\_]+";

/// Remainder of a token after a matched word prefix.
const TOKEN_REST: &str = "[a-zA-Z0-9]*";

/// Match strength, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    /// The filter occurs verbatim.
    Exact,
    /// The whole line is the filter's words, each a token prefix.
    WordPrefixLine,
    /// The filter's words are token prefixes somewhere in the line.
    WordPrefix,
    /// The filter's words occur in order, separated by boundaries.
    WordSubstring,
    /// The filter's words occur in order anywhere.
    Substring,
}

impl Tier {
    pub const ALL: [Tier; 5] = [
        Tier::Exact,
        Tier::WordPrefixLine,
        Tier::WordPrefix,
        Tier::WordSubstring,
        Tier::Substring,
    ];

    /// Regex source for this tier, or `None` when the tier needs words and
    /// the filter has none.
    fn pattern(self, filter: &str, words: &[&str]) -> Option<String> {
        if self != Tier::Exact && words.is_empty() {
            return None;
        }
        let prefixes = || {
            words
                .iter()
                .map(|word| format!("({}){TOKEN_REST}", regex::escape(word)))
                .collect::<Vec<_>>()
        };
        let substrings = || {
            words
                .iter()
                .map(|word| format!("({}).*", regex::escape(word)))
                .collect::<Vec<_>>()
        };

        let pattern = match self {
            Tier::Exact => format!("({})", regex::escape(filter)),
            Tier::WordPrefixLine => format!("^{}$", prefixes().join(BOUNDARY)),
            Tier::WordPrefix => prefixes().join(BOUNDARY),
            Tier::WordSubstring => substrings().join(BOUNDARY),
            Tier::Substring => substrings().concat(),
        };
        Some(pattern)
    }

    /// Compile this tier's pattern for `filter`.
    pub fn compile(self, filter: &str, words: &[&str]) -> Result<Option<Regex>, SearchError> {
        let Some(pattern) = self.pattern(filter, words) else {
            return Ok(None);
        };
        RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .map(Some)
            .map_err(|source| SearchError::Pattern { tier: self, source })
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tier::Exact => "exact",
            Tier::WordPrefixLine => "word-prefix-line",
            Tier::WordPrefix => "word-prefix",
            Tier::WordSubstring => "word-substring",
            Tier::Substring => "substring",
        };
        f.write_str(name)
    }
}

/// Split a filter into its ASCII alphanumeric words.
pub fn words(filter: &str) -> Vec<&str> {
    WORD_REGEX.find_iter(filter).map(|m| m.as_str()).collect()
}

/// Rank `history` (oldest first) against `filter`, best candidate first.
///
/// A tier whose pattern cannot be built contributes nothing.
pub fn rank(filter: &str, history: &[String]) -> Vec<Candidate> {
    let words = words(filter);
    let mut seen: HashSet<&str> = HashSet::new();
    let mut ranked = Vec::new();

    for tier in Tier::ALL {
        let regex = match tier.compile(filter, &words) {
            Ok(Some(regex)) => regex,
            Ok(None) => continue,
            Err(err) => {
                warn!("skipping tier: {err}");
                continue;
            }
        };

        let before = ranked.len();
        for line in history.iter().rev() {
            if seen.contains(line.as_str()) {
                continue;
            }
            let Some(caps) = regex.captures(line) else {
                continue;
            };
            let spans = caps
                .iter()
                .skip(1)
                .flatten()
                .map(|m| MatchSpan::from_byte_range(line, m.range()))
                .collect();
            seen.insert(line.as_str());
            ranked.push(Candidate::matched(line.clone(), spans, tier));
        }
        debug!("{tier} tier matched {} lines", ranked.len() - before);
    }

    ranked
}
