use crate::candidate::Candidate;
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::matcher;
use crate::navigator::{SearchSession, empty_candidate};
use crate::store::HistoryStore;
use tracing::debug;

/// History search engine: a history store plus at most one active session.
///
/// Every mutating call takes `&mut self`, so recording a line can never
/// interleave with building a session. Callers that share an engine across
/// threads must wrap it in their own lock.
#[derive(Debug, Clone, Default)]
pub struct HistorySearch {
    store: HistoryStore,
    session: Option<SearchSession>,
}

impl HistorySearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        Ok(HistorySearch {
            store: HistoryStore::with_capacity(config.max_entries),
            session: None,
        })
    }

    /// Record an executed command. Ends any active search.
    pub fn add(&mut self, line: &str) {
        if self.store.add(line) {
            self.reset();
        }
    }

    /// Record many executed commands, oldest first. Ends any active search.
    pub fn load<I>(&mut self, lines: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let added = self.store.extend(lines);
        self.reset();
        added
    }

    /// Begin (or restart) a search for `filter` over the current history.
    pub fn start(&mut self, filter: &str) {
        let ranked = matcher::rank(filter, self.store.as_slice());
        debug!("search start: {filter:?} -> {} candidates", ranked.len());
        self.session = Some(SearchSession::new(filter, ranked));
    }

    /// Step to the next candidate. Returns whether the selection moved.
    pub fn up(&mut self) -> bool {
        self.session.as_mut().is_some_and(SearchSession::up)
    }

    /// Step back to the previous candidate. Returns whether the selection moved.
    pub fn down(&mut self) -> bool {
        self.session.as_mut().is_some_and(SearchSession::down)
    }

    /// Abandon the active search. History is left untouched.
    pub fn reset(&mut self) {
        if self.session.take().is_some() {
            debug!("search reset");
        }
    }

    pub fn current(&self) -> &Candidate {
        match &self.session {
            Some(session) => session.current(),
            None => empty_candidate(),
        }
    }

    pub fn is_browsing(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&SearchSession> {
        self.session.as_ref()
    }

    /// Active filter, or `""` when idle.
    pub fn filter(&self) -> &str {
        self.session.as_ref().map_or("", SearchSession::filter)
    }

    pub fn history(&self) -> &HistoryStore {
        &self.store
    }
}
