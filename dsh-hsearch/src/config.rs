use crate::error::SearchError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_ENTRIES: usize = 10000;

/// Tunables for the history search engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum number of distinct lines kept; the oldest are dropped first.
    pub max_entries: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

impl SearchConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.max_entries == 0 {
            return Err(SearchError::InvalidConfig(
                "max_entries must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
