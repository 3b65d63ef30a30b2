//! Configuration for the line editing tools

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::term::WindowSize;

/// Editor configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// History settings
    pub history: HistoryConfig,
    /// Editor settings
    pub editor: EditorConfig,
    /// Terminal settings
    pub terminal: TerminalConfig,
}

/// History configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of entries kept
    pub capacity: usize,
    /// File the history is loaded from and saved to
    pub file: Option<PathBuf>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: crate::history::DEFAULT_CAPACITY,
            file: None,
        }
    }
}

/// Editor configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Use the full-screen multi-line editor
    pub multiline: bool,
    /// Spaces inserted per nesting level
    pub indent_width: usize,
    /// Title bar text of the multi-line editor
    pub title: String,
    /// Prompt of the single-line editor
    pub prompt: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            multiline: false,
            indent_width: crate::repl::DEFAULT_INDENT_WIDTH,
            title: "repl".to_string(),
            prompt: "> ".to_string(),
        }
    }
}

/// Terminal configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    /// Columns assumed when the terminal does not report a size
    pub fallback_columns: u16,
    /// Rows assumed when the terminal does not report a size
    pub fallback_rows: u16,
    /// Milliseconds to wait for the rest of an escape sequence
    pub escape_timeout_ms: u64,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            fallback_columns: 80,
            fallback_rows: 24,
            escape_timeout_ms: 50,
        }
    }
}

impl TerminalConfig {
    /// Size assumed when the terminal does not report one
    pub fn fallback_size(&self) -> WindowSize {
        WindowSize::new(self.fallback_columns.max(1), self.fallback_rows.max(1))
    }

    /// Escape sequence timeout
    pub fn escape_timeout(&self) -> Duration {
        Duration::from_millis(self.escape_timeout_ms)
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
        // Try to load from ~/.config/mochi-line/config.json
        if let Some(config_path) = default_path() {
            if config_path.exists() {
                match Self::load(&config_path) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Ignoring {}: {}", config_path.display(), e);
                    },
                }
            }
        }
        Self::default()
    }
}

/// Path of the default configuration file
pub fn default_path() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(|home| {
        PathBuf::from(home)
            .join(".config")
            .join("mochi-line")
            .join("config.json")
    })
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
