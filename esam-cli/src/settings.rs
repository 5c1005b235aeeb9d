//! Application settings

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How decode results are printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One table per frame
    #[default]
    Table,
    /// A JSON array of frame reports
    Json,
    /// One CSV row per field
    Csv,
}

/// Border style of rendered tables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableStyle {
    #[default]
    Modern,
    Ascii,
    Markdown,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Output format when `--format` is not given
    #[serde(default)]
    pub format: OutputFormat,
    /// Include the details column
    #[serde(default = "default_true")]
    pub show_details: bool,
    /// Table border style
    #[serde(default)]
    pub table_style: TableStyle,
    /// Colour the outcome lines
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
            show_details: true,
            table_style: TableStyle::Modern,
            color: true,
        }
    }
}

impl Settings {
    /// Get the XDG config directory for esamdec
    /// Uses $XDG_CONFIG_HOME/esamdec on Linux/macOS, falls back to ~/.config/esamdec
    fn config_dir() -> Option<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_config);
            if path.is_absolute() {
                return Some(path.join("esamdec"));
            }
        }

        dirs::home_dir().map(|h| h.join(".config").join("esamdec"))
    }

    /// Get the default settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.json"))
    }

    /// Load settings from `path`, or from the default location
    ///
    /// A missing file gives the defaults; so does a malformed one, with a
    /// warning.
    pub fn load(path: Option<&Path>) -> Self {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::settings_path() {
                Some(p) => p,
                None => return Self::default(),
            },
        };
        Self::load_from(&path)
    }

    /// Load settings from a specific file
    pub fn load_from(path: &Path) -> Self {
        let Ok(json) = std::fs::read_to_string(path) else {
            tracing::debug!("No settings at {}, using defaults", path.display());
            return Self::default();
        };
        match serde_json::from_str(&json) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Ignoring malformed settings {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings to a specific file, creating its directory
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
