use anyhow::{Context as _, Result, bail};
use dsh_hsearch::HistorySearch;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Trait for shell history importers
pub trait HistoryImporter {
    /// Read the commands from the history file, oldest first
    fn read_entries(&self) -> Result<Vec<String>>;

    /// Load the history file into the search engine
    fn import(&self, search: &mut HistorySearch) -> Result<usize> {
        let entries = self.read_entries()?;
        let count = search.load(entries);
        tracing::info!("Successfully imported {count} commands");
        Ok(count)
    }
}

/// Read a file line by line, replacing invalid UTF-8.
fn read_lossy_lines(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).with_context(|| {
        let error_msg = format!("Failed to open history file: {}", path.display());
        tracing::error!("{error_msg}");
        error_msg
    })?;

    let mut reader = BufReader::new(file);
    let mut line_buffer = Vec::new();
    let mut line_number = 0;
    let mut lines = Vec::new();

    loop {
        line_buffer.clear();
        let bytes_read = reader
            .read_until(b'\n', &mut line_buffer)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if bytes_read == 0 {
            break;
        }
        line_number += 1;

        let line = String::from_utf8_lossy(&line_buffer);
        if line.contains('\u{FFFD}') {
            warn!(
                "Line {line_number} contains invalid UTF-8 characters, replaced with '\\u{{FFFD}}'"
            );
        }
        lines.push(line.trim_end_matches(['\n', '\r']).to_string());
    }
    Ok(lines)
}

/// One command per line, as written by bash
pub struct PlainHistoryImporter {
    history_path: PathBuf,
}

impl PlainHistoryImporter {
    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            history_path: path.as_ref().to_path_buf(),
        }
    }
}

impl HistoryImporter for PlainHistoryImporter {
    fn read_entries(&self) -> Result<Vec<String>> {
        debug!("Importing history from {}", self.history_path.display());
        let entries = read_lossy_lines(&self.history_path)?
            .into_iter()
            // `#1625097600` lines are bash HISTTIMEFORMAT stamps
            .filter(|line| !is_bash_timestamp(line))
            .filter(|line| !line.trim().is_empty())
            .collect();
        Ok(entries)
    }
}

fn is_bash_timestamp(line: &str) -> bool {
    line.strip_prefix('#')
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}

/// zsh history, plain or with EXTENDED_HISTORY `: <start>:<elapsed>;` prefixes
pub struct ZshHistoryImporter {
    history_path: PathBuf,
}

impl ZshHistoryImporter {
    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            history_path: path.as_ref().to_path_buf(),
        }
    }
}

fn strip_zsh_metadata(line: &str) -> &str {
    if let Some(rest) = line.strip_prefix(": ")
        && let Some((meta, cmd)) = rest.split_once(';')
        && meta.bytes().all(|b| b.is_ascii_digit() || b == b':')
    {
        return cmd;
    }
    line
}

impl HistoryImporter for ZshHistoryImporter {
    fn read_entries(&self) -> Result<Vec<String>> {
        debug!("Importing zsh history from {}", self.history_path.display());
        let mut entries = Vec::new();
        let mut current: Option<String> = None;

        for line in read_lossy_lines(&self.history_path)? {
            let text = match current.take() {
                Some(mut pending) => {
                    pending.push('\n');
                    pending.push_str(&line);
                    pending
                }
                None => strip_zsh_metadata(&line).to_string(),
            };

            // A trailing backslash continues the command on the next line.
            if let Some(stripped) = text.strip_suffix('\\') {
                current = Some(stripped.to_string());
            } else if !text.trim().is_empty() {
                entries.push(text);
            }
        }
        if let Some(pending) = current
            && !pending.trim().is_empty()
        {
            entries.push(pending);
        }
        Ok(entries)
    }
}

/// Fish shell history importer
pub struct FishHistoryImporter {
    history_path: PathBuf,
}

impl FishHistoryImporter {
    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            history_path: path.as_ref().to_path_buf(),
        }
    }
}

/// Undo fish's escaping of newlines and backslashes in `- cmd:` values.
fn unescape_fish(cmd: &str) -> String {
    let mut out = String::with_capacity(cmd.len());
    let mut chars = cmd.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

impl HistoryImporter for FishHistoryImporter {
    fn read_entries(&self) -> Result<Vec<String>> {
        debug!(
            "Importing fish history from {}",
            self.history_path.display()
        );
        let entries = read_lossy_lines(&self.history_path)?
            .iter()
            .filter_map(|line| line.trim().strip_prefix("- cmd:"))
            .map(|cmd| unescape_fish(cmd.trim()))
            .filter(|cmd| !cmd.is_empty())
            .collect();
        Ok(entries)
    }
}

fn default_history_path(shell_name: &str) -> Result<PathBuf> {
    let home_dir = dirs::home_dir().context("Failed to get home directory")?;
    let relative = match shell_name {
        "zsh" => ".zsh_history",
        "fish" => ".local/share/fish/fish_history",
        _ => ".bash_history",
    };
    let default_path = home_dir.join(relative);
    if !default_path.exists() {
        bail!(
            "{shell_name} history file not found at {}",
            default_path.display()
        );
    }
    Ok(default_path)
}

/// Factory function to create a history importer for the specified shell
pub fn create_importer(
    shell_name: &str,
    custom_path: Option<&Path>,
) -> Result<Box<dyn HistoryImporter>> {
    let shell_name = shell_name.to_lowercase();
    debug!("Creating history importer for {shell_name} shell");

    if !matches!(shell_name.as_str(), "plain" | "bash" | "zsh" | "fish") {
        let error_msg = format!("Unsupported shell: {shell_name}");
        tracing::error!("{error_msg}");
        bail!(error_msg)
    }

    let path = match custom_path {
        Some(path) => path.to_path_buf(),
        None => default_history_path(&shell_name)?,
    };
    debug!("Using history file: {}", path.display());

    let importer: Box<dyn HistoryImporter> = match shell_name.as_str() {
        "zsh" => Box::new(ZshHistoryImporter::with_path(path)),
        "fish" => Box::new(FishHistoryImporter::with_path(path)),
        _ => Box::new(PlainHistoryImporter::with_path(path)),
    };
    Ok(importer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_history(contents: &[u8]) -> Result<(tempfile::TempDir, PathBuf)> {
        let temp_dir = tempdir()?;
        let path = temp_dir.path().join("history");
        let mut file = File::create(&path)?;
        file.write_all(contents)?;
        file.flush()?;
        Ok((temp_dir, path))
    }

    #[test]
    fn test_plain_history_import() -> Result<()> {
        let (_dir, path) = write_history(b"ls -la\n#1625097600\ncd /tmp\n\nls -la\n")?;
        let importer = PlainHistoryImporter::with_path(&path);
        assert_eq!(importer.read_entries()?, vec!["ls -la", "cd /tmp", "ls -la"]);

        let mut search = HistorySearch::new();
        let count = importer.import(&mut search)?;
        assert_eq!(count, 3);
        let lines: Vec<&str> = search.history().iter().map(String::as_str).collect();
        assert_eq!(lines, vec!["cd /tmp", "ls -la"]);
        Ok(())
    }

    #[test]
    fn test_zsh_history_import() -> Result<()> {
        let (_dir, path) = write_history(
            b": 1625097600:0;git status\n: 1625097601:3;echo one \\\ntwo\nplain line\n: not meta\n",
        )?;
        let entries = ZshHistoryImporter::with_path(&path).read_entries()?;
        assert_eq!(
            entries,
            vec!["git status", "echo one \ntwo", "plain line", ": not meta"]
        );
        Ok(())
    }

    #[test]
    fn test_fish_history_import() -> Result<()> {
        let (_dir, path) = write_history(
            b"- cmd: ls -la\n  when: 1625097600\n- cmd: echo a\\\\nb\n  when: 1625097601\n- cmd: printf 'x\\ny'\n  when: 1625097602\n",
        )?;
        let entries = FishHistoryImporter::with_path(&path).read_entries()?;
        assert_eq!(entries, vec!["ls -la", "echo a\\nb", "printf 'x\ny'"]);
        Ok(())
    }

    #[test]
    fn test_history_import_with_invalid_utf8() -> Result<()> {
        let (_dir, path) = write_history(b"echo \xff\xfe\ncd\n")?;
        let entries = PlainHistoryImporter::with_path(&path).read_entries()?;
        assert_eq!(entries.len(), 2);
        assert!(entries[0].contains('\u{FFFD}'));
        Ok(())
    }

    #[test]
    fn test_unsupported_shell() {
        assert!(create_importer("tcsh", Some(Path::new("/tmp/x"))).is_err());
    }

    #[test]
    fn test_missing_file_fails_on_read() {
        let importer = create_importer("FISH", Some(Path::new("/nonexistent/fish_history")))
            .expect("custom path is not checked up front");
        assert!(importer.read_entries().is_err());
    }
}
