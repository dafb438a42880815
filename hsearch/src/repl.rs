//! Interactive reverse search on the terminal.

use crate::render::render_prompt;
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::queue;
use crossterm::style::{Color, Print};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use dsh_hsearch::HistorySearch;
use std::io::Write;
use tracing::debug;

/// What the loop should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Accept(String),
    Abort,
}

/// Reverse-search line editor driving a [`HistorySearch`].
pub struct ReverseSearch {
    search: HistorySearch,
    filter: String,
    exhausted: bool,
}

impl ReverseSearch {
    pub fn new(search: HistorySearch, filter: &str) -> Self {
        let mut editor = ReverseSearch {
            search,
            filter: filter.to_string(),
            exhausted: false,
        };
        editor.restart();
        editor
    }

    pub fn search(&self) -> &HistorySearch {
        &self.search
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// The selected match and the match count, `[0/m]` on the filter itself.
    pub fn position(&self) -> Option<(usize, usize)> {
        let session = self.search.session()?;
        let total = (session.pending_len() + session.visited_len()).saturating_sub(1);
        Some((session.visited_len().saturating_sub(1), total))
    }

    fn restart(&mut self) {
        self.search.start(&self.filter);
        // Jump straight to the best match, like a shell's Ctrl-R.
        self.exhausted = !self.search.up();
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('g') if ctrl => {
                self.search.reset();
                KeyOutcome::Abort
            }
            KeyCode::Char('r') if ctrl => {
                self.exhausted = !self.search.up();
                KeyOutcome::Continue
            }
            KeyCode::Char('s') if ctrl => {
                self.search.down();
                self.exhausted = false;
                KeyOutcome::Continue
            }
            KeyCode::Char(c) if !ctrl => {
                self.filter.push(c);
                self.restart();
                KeyOutcome::Continue
            }
            KeyCode::Backspace => {
                self.filter.pop();
                self.restart();
                KeyOutcome::Continue
            }
            KeyCode::Up => {
                self.exhausted = !self.search.up();
                KeyOutcome::Continue
            }
            KeyCode::Down => {
                self.search.down();
                self.exhausted = false;
                KeyOutcome::Continue
            }
            KeyCode::Enter => {
                let selected = match self.search.current().tier() {
                    Some(_) => self.search.current().line().to_string(),
                    None => self.filter.clone(),
                };
                // Accepting a line executes it, so it becomes the newest entry.
                self.search.add(&selected);
                KeyOutcome::Accept(selected)
            }
            KeyCode::Esc => {
                self.search.reset();
                KeyOutcome::Abort
            }
            _ => KeyOutcome::Continue,
        }
    }

    /// Run the loop until a line is accepted or the search is aborted.
    ///
    /// The prompt is drawn on `out`; the accepted line is returned.
    pub fn run<W: Write>(&mut self, out: &mut W, color: Color) -> Result<Option<String>> {
        enable_raw_mode()?;
        let result = self.event_loop(out, color);
        disable_raw_mode()?;
        queue!(out, Print("\r\n"))?;
        out.flush()?;
        result
    }

    fn event_loop<W: Write>(&mut self, out: &mut W, color: Color) -> Result<Option<String>> {
        loop {
            render_prompt(
                out,
                self.filter(),
                self.search().current(),
                self.position(),
                self.exhausted,
                color,
            )?;

            if let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                match self.handle_key(key) {
                    KeyOutcome::Continue => {}
                    KeyOutcome::Accept(line) => {
                        debug!("accepted {line:?}");
                        return Ok(Some(line));
                    }
                    KeyOutcome::Abort => {
                        debug!("search aborted");
                        return Ok(None);
                    }
                }
            }
        }
    }
}
