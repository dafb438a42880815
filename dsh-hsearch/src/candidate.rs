//! Candidate lines and the spans that matched a filter.

use crate::matcher::Tier;

/// Half-open character range `[start, end)` into a candidate line.
///
/// Offsets count `char`s, not bytes, so they line up with what a terminal
/// renderer walks when it highlights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
}

impl MatchSpan {
    pub const fn new(start: usize, end: usize) -> Self {
        MatchSpan { start, end }
    }

    /// Convert a byte range reported by the regex engine into char offsets.
    pub(crate) fn from_byte_range(line: &str, range: std::ops::Range<usize>) -> Self {
        let start = line[..range.start].chars().count();
        let end = start + line[range.start..range.end].chars().count();
        MatchSpan { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A history line paired with the spans that matched the active filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    line: String,
    spans: Vec<MatchSpan>,
    tier: Option<Tier>,
}

/// A run of text that is either highlighted or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub highlighted: bool,
}

impl Candidate {
    /// The "nothing selected" sentinel.
    pub const fn empty() -> Self {
        Candidate {
            line: String::new(),
            spans: Vec::new(),
            tier: None,
        }
    }

    pub(crate) fn matched(line: String, spans: Vec<MatchSpan>, tier: Tier) -> Self {
        Candidate {
            line,
            spans,
            tier: Some(tier),
        }
    }

    /// The entry shown before the first step: the filter itself, fully highlighted.
    pub(crate) fn filter_seed(filter: &str) -> Self {
        Candidate {
            line: filter.to_string(),
            spans: vec![MatchSpan::new(0, filter.chars().count())],
            tier: None,
        }
    }

    pub fn line(&self) -> &str {
        &self.line
    }

    pub fn spans(&self) -> &[MatchSpan] {
        &self.spans
    }

    /// Tier that produced this candidate. `None` for the filter seed and the sentinel.
    pub fn tier(&self) -> Option<Tier> {
        self.tier
    }

    pub fn into_parts(self) -> (String, Vec<MatchSpan>) {
        (self.line, self.spans)
    }

    /// Split the line into alternating plain and highlighted runs.
    ///
    /// Overlapping spans are merged, empty spans and spans reaching past the
    /// end of the line are clamped away.
    pub fn segments(&self) -> Vec<Segment<'_>> {
        let boundaries: Vec<usize> = self
            .line
            .char_indices()
            .map(|(idx, _)| idx)
            .chain(std::iter::once(self.line.len()))
            .collect();
        let char_len = boundaries.len() - 1;

        let mut marked = vec![false; char_len];
        for span in self.spans.iter().filter(|span| !span.is_empty()) {
            let end = span.end.min(char_len);
            for flag in marked.iter_mut().take(end).skip(span.start) {
                *flag = true;
            }
        }

        let mut segments = Vec::new();
        let mut run_start = 0;
        for idx in 1..=char_len {
            if idx == char_len || marked[idx] != marked[run_start] {
                segments.push(Segment {
                    text: &self.line[boundaries[run_start]..boundaries[idx]],
                    highlighted: marked[run_start],
                });
                run_start = idx;
            }
        }
        segments
    }
}

impl Default for Candidate {
    fn default() -> Self {
        Candidate::empty()
    }
}
