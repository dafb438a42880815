//! Interactive history search for line editors.
//!
//! - [`store`] - duplicate-suppressed history of executed lines
//! - [`matcher`] - five-tier matching of a filter against history
//! - [`navigator`] - reversible stepping through ranked candidates
//! - [`search`] - [`HistorySearch`], the engine a line editor drives

mod candidate;
mod config;
mod error;
pub mod matcher;
pub mod navigator;
pub mod search;
pub mod store;


pub use crate::candidate::{Candidate, MatchSpan, Segment};
pub use crate::config::{DEFAULT_MAX_ENTRIES, SearchConfig};
pub use crate::error::SearchError;
pub use crate::matcher::Tier;
pub use crate::navigator::SearchSession;
pub use crate::search::HistorySearch;
pub use crate::store::HistoryStore;
