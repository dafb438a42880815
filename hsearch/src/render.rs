use crossterm::cursor::MoveToColumn;
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use dsh_hsearch::Candidate;
use std::io::{self, Write};

/// Queue a candidate with its matched spans highlighted.
pub fn render_candidate<W: Write>(
    out: &mut W,
    candidate: &Candidate,
    color: Color,
) -> io::Result<()> {
    for segment in candidate.segments() {
        // The prompt is a single row; keep multi-line entries on it.
        let text = segment.text.replace('\n', "↵");
        if segment.highlighted {
            queue!(
                out,
                SetForegroundColor(color),
                SetAttribute(Attribute::Bold),
                Print(text),
                SetAttribute(Attribute::Reset),
                ResetColor
            )?;
        } else {
            queue!(out, Print(text))?;
        }
    }
    Ok(())
}

/// Redraw the reverse-search prompt line.
///
/// `position` is the selected match and the match count, drawn as `[n/m]`.
pub fn render_prompt<W: Write>(
    out: &mut W,
    filter: &str,
    candidate: &Candidate,
    position: Option<(usize, usize)>,
    exhausted: bool,
    color: Color,
) -> io::Result<()> {
    let label = if exhausted {
        "failing reverse-i-search"
    } else {
        "reverse-i-search"
    };
    let position = position
        .map(|(index, total)| format!("[{index}/{total}] "))
        .unwrap_or_default();
    queue!(
        out,
        MoveToColumn(0),
        Clear(ClearType::CurrentLine),
        Print(format!("{position}({label})`{filter}': "))
    )?;
    render_candidate(out, candidate, color)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsh_hsearch::HistorySearch;

    fn selected(history: &[&str], filter: &str) -> Candidate {
        let mut search = HistorySearch::new();
        for line in history {
            search.add(line);
        }
        search.start(filter);
        search.up();
        search.current().clone()
    }

    #[test]
    fn unmatched_text_is_printed_verbatim() -> io::Result<()> {
        let mut out = Vec::new();
        render_candidate(&mut out, &Candidate::empty(), Color::Yellow)?;
        assert!(out.is_empty());

        let candidate = selected(&["make test"], "");
        render_candidate(&mut out, &candidate, Color::Yellow)?;
        assert_eq!(String::from_utf8_lossy(&out), "make test");
        Ok(())
    }

    #[test]
    fn matched_spans_are_bold() -> io::Result<()> {
        let candidate = selected(&["git status"], "stat");
        let mut out = Vec::new();
        render_candidate(&mut out, &candidate, Color::Yellow)?;
        let rendered = String::from_utf8_lossy(&out);
        assert!(rendered.starts_with("git "));
        assert!(rendered.contains("\u{1b}[1mstat"));
        assert!(rendered.ends_with("us"));
        Ok(())
    }

    #[test]
    fn prompt_shows_filter() -> io::Result<()> {
        let candidate = selected(&["ls"], "zz");
        let mut out = Vec::new();
        render_prompt(&mut out, "zz", &candidate, None, true, Color::Yellow)?;
        let rendered = String::from_utf8_lossy(&out);
        assert!(rendered.contains("(failing reverse-i-search)`zz': "));
        assert!(rendered.contains("\u{1b}[2K(failing"));
        Ok(())
    }

    #[test]
    fn prompt_shows_position() -> io::Result<()> {
        let candidate = selected(&["ls -a", "ls -l"], "ls");
        let mut out = Vec::new();
        render_prompt(&mut out, "ls", &candidate, Some((1, 2)), false, Color::Yellow)?;
        let rendered = String::from_utf8_lossy(&out);
        assert!(rendered.contains("[1/2] (reverse-i-search)`ls': "));
        Ok(())
    }

    #[test]
    fn multi_line_entry_stays_on_one_row() -> io::Result<()> {
        let candidate = selected(&["echo one \ntwo"], "two");
        let mut out = Vec::new();
        render_candidate(&mut out, &candidate, Color::Yellow)?;
        let rendered = String::from_utf8_lossy(&out);
        assert!(!rendered.contains('\n'));
        assert!(!rendered.contains('\r'));
        assert!(rendered.starts_with("echo one ↵"));
        Ok(())
    }
}
