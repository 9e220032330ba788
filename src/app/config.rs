//! Configuration for the reader

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::compose::{ComposeOptions, DisplayMode};
use crate::pager::Style;

/// Reader configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which verse fields to show
    pub mode: DisplayMode,
    /// Window title while reading
    pub title: String,
    /// Marker drawn before the selected verse
    pub marker: String,
    /// Glyph for unused rows below the last verse
    pub filler: String,
    /// Break words wider than the screen instead of letting them overflow
    pub split_long_words: bool,
    /// JSON corpus to read from
    pub corpus_path: Option<PathBuf>,
    /// Write logs here instead of stderr
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: DisplayMode::Both,
            title: "Quran CLI".to_string(),
            marker: "|".to_string(),
            filler: "~".to_string(),
            split_long_words: false,
            corpus_path: None,
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from default location or return default config
    pub fn load_or_default() -> Self {
        // Try to load from ~/.config/quran-pager/config.json
        if let Some(config_dir) = dirs_config_path() {
            let config_path = config_dir.join("config.json");
            if config_path.exists() {
                match Self::load(&config_path) {
                    Ok(config) => return config,
                    Err(e) => tracing::warn!(
                        "ignoring {}: {}",
                        config_path.display(),
                        e
                    ),
                }
            }
        }
        Self::default()
    }

    /// Glyphs for the pager
    pub fn style(&self) -> Style {
        Style {
            marker: self.marker.clone(),
            filler: self.filler.clone(),
        }
    }

    pub fn compose_options(&self) -> ComposeOptions {
        ComposeOptions {
            split_long_words: self.split_long_words,
        }
    }
}

/// Get the configuration directory path
fn dirs_config_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".config").join("quran-pager"))
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
