use anyhow::Context as _;
use anyhow::Result;
use crossterm::style::Color;
use dsh_hsearch::SearchConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const APP_NAME: &str = "hsearch";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub search: SearchConfig,
    /// History format: `plain`, `bash`, `zsh` or `fish`.
    pub shell: String,
    pub history_file: Option<PathBuf>,
    pub highlight_color: String,
}

impl Default for AppConfig {
    fn default() -> AppConfig {
        AppConfig {
            search: SearchConfig::default(),
            shell: "plain".to_string(),
            history_file: None,
            highlight_color: "yellow".to_string(),
        }
    }
}

impl AppConfig {
    fn read_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&json)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        config.search.validate()?;
        Ok(config)
    }

    /// Load the config from `explicit`, or from the xdg config directory.
    ///
    /// An explicit path must be readable. The xdg file is optional and falls
    /// back to defaults when missing or broken.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::read_file(path);
        }

        let found = xdg::BaseDirectories::with_prefix(APP_NAME)
            .ok()
            .and_then(|dirs| dirs.find_config_file(CONFIG_FILE));
        match found {
            Some(path) => match Self::read_file(&path) {
                Ok(config) => {
                    debug!("loaded config from {}", path.display());
                    Ok(config)
                }
                Err(err) => {
                    warn!("ignoring config: {err:#}");
                    Ok(AppConfig::default())
                }
            },
            None => Ok(AppConfig::default()),
        }
    }

    pub fn highlight(&self) -> Color {
        parse_color(&self.highlight_color).unwrap_or_else(|| {
            warn!("unknown highlight color {:?}", self.highlight_color);
            Color::Yellow
        })
    }
}

/// Map a color name as written in the config to a terminal color.
pub fn parse_color(name: &str) -> Option<Color> {
    let color = match name.to_lowercase().replace(['-', ' '], "_").as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "dark_red" => Color::DarkRed,
        "green" => Color::Green,
        "dark_green" => Color::DarkGreen,
        "yellow" => Color::Yellow,
        "dark_yellow" => Color::DarkYellow,
        "blue" => Color::Blue,
        "dark_blue" => Color::DarkBlue,
        "magenta" => Color::Magenta,
        "dark_magenta" => Color::DarkMagenta,
        "cyan" => Color::Cyan,
        "dark_cyan" => Color::DarkCyan,
        "white" => Color::White,
        "grey" | "gray" => Color::Grey,
        "dark_grey" | "dark_gray" => Color::DarkGrey,
        _ => return None,
    };
    Some(color)
}

/// Get the path to a state file (e.g. logs).
pub fn get_state_file(name: &str) -> Result<PathBuf> {
    let xdg_dir =
        xdg::BaseDirectories::with_prefix(APP_NAME).context("failed get xdg directory")?;
    xdg_dir.place_state_file(name).context("failed get path")
}
