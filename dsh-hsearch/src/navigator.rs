//! Reversible step-through of ranked candidates.
//!
//! Two stacks hold a session's candidates. `pending` keeps what has not been
//! visited yet with the next candidate on top; `visited` keeps the trail with
//! the current selection on top. Stepping moves one candidate between the two
//! tops, so stepping back always retraces the way forward.

use crate::candidate::Candidate;

static EMPTY_CANDIDATE: Candidate = Candidate::empty();

/// The "nothing selected" sentinel: empty line, no spans.
pub fn empty_candidate() -> &'static Candidate {
    &EMPTY_CANDIDATE
}

/// State of one search, from `start` until it is reset or replaced.
#[derive(Debug, Clone)]
pub struct SearchSession {
    filter: String,
    pending: Vec<Candidate>,
    visited: Vec<Candidate>,
}

impl SearchSession {
    /// Build a session from candidates ranked best first.
    ///
    /// The trail starts at the filter itself so stepping back past the first
    /// result lands on what the user typed.
    pub fn new(filter: &str, mut ranked: Vec<Candidate>) -> Self {
        ranked.reverse();
        SearchSession {
            filter: filter.to_string(),
            pending: ranked,
            visited: vec![Candidate::filter_seed(filter)],
        }
    }

    /// Step to the next ranked candidate. Returns `false` when none remain.
    pub fn up(&mut self) -> bool {
        match self.pending.pop() {
            Some(candidate) => {
                self.visited.push(candidate);
                true
            }
            None => false,
        }
    }

    /// Step back along the trail. Returns `false` when the trail is empty.
    pub fn down(&mut self) -> bool {
        match self.visited.pop() {
            Some(candidate) => {
                self.pending.push(candidate);
                true
            }
            None => false,
        }
    }

    pub fn current(&self) -> &Candidate {
        self.visited.last().unwrap_or(&EMPTY_CANDIDATE)
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn visited_len(&self) -> usize {
        self.visited.len()
    }
}
