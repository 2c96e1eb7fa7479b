//! Configuration file parser for ~/.config/podfeed/config.toml.
//!
//! The config file is optional; a missing file yields `Config::default()`.
//! Unknown keys are ignored by serde, though we log a warning so typos
//! don't go unnoticed. Command-line flags override anything set here.
use serde::Deserialize;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::feed::{CollectPolicy, TagPolicy, UnreadablePolicy, DEFAULT_MIME_TYPE};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `"permissive"` falls back to the file path when tags are unreadable,
    /// `"strict"` aborts the run.
    pub tag_policy: TagPolicy,

    /// `"abort"` stops on the first file that cannot be stat'ed or opened,
    /// `"skip"` leaves it out of the feed.
    pub on_unreadable: UnreadablePolicy,

    /// MIME type written on every enclosure.
    pub mime_type: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tag_policy: TagPolicy::Permissive,
            on_unreadable: UnreadablePolicy::Abort,
            mime_type: DEFAULT_MIME_TYPE.to_string(),
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 3] = ["tag_policy", "on_unreadable", "mime_type"];

    /// Default location: `$HOME/.config/podfeed/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        let home = std::env::var_os("HOME")?;
        Some(
            PathBuf::from(home)
                .join(".config")
                .join("podfeed")
                .join("config.toml"),
        )
    }

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML or unknown policy value → `Err(ConfigError::Parse)`
    /// - Unknown keys → accepted, logged as warning
    ///
    /// The file is opened once and read through a bounded reader, so a file
    /// that grows after it is opened still cannot exceed the size cap.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let mut content = String::new();
        file.take(Self::MAX_FILE_SIZE + 1).read_to_string(&mut content)?;
        if content.len() as u64 > Self::MAX_FILE_SIZE {
            return Err(ConfigError::TooLarge(format!(
                "{} exceeds {} bytes",
                path.display(),
                Self::MAX_FILE_SIZE
            )));
        }

        let table: toml::Table = content.parse()?;
        for key in table.keys().filter(|k| !Self::KNOWN_KEYS.contains(&k.as_str())) {
            tracing::warn!(key = %key, "Unknown key in config file, ignoring");
        }

        let config: Config = toml::Value::Table(table).try_into()?;
        tracing::debug!(path = %path.display(), ?config, "Loaded configuration");
        Ok(config)
    }

    pub fn collect_policy(&self) -> CollectPolicy {
        CollectPolicy {
            tags: self.tag_policy,
            unreadable: self.on_unreadable,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
