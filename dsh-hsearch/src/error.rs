use crate::matcher::Tier;
use thiserror::Error;

/// Errors raised while building search state.
///
/// Pattern failures never escape [`crate::HistorySearch::start`]; the tier is
/// logged and skipped instead.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("failed to build {tier} pattern: {source}")]
    Pattern {
        tier: Tier,
        #[source]
        source: regex::Error,
    },

    #[error("invalid search configuration: {0}")]
    InvalidConfig(String),
}
