//! Store configuration
//!
//! A [`StoreConfig`] is built once and then owned, immutably, by the store
//! it opens. Two stores with different configs never share paths or state.
//!
//! Sources, in the order callers usually layer them:
//! - defaults (`data/events.jsonl`, `data/cards.index.json`)
//! - a TOML document ([`StoreConfig::from_toml_str`], [`StoreConfig::load`])
//! - environment variables ([`StoreConfig::from_env`])
//! - builder methods
//!
//! ```ignore
//! let config = StoreConfig::new("/var/lib/app/state").tail_block_size(8192);
//! let store = JsonlStore::open(config)?;
//! ```

use std::path::{Path, PathBuf};

use factlog_core::{FactlogError, FactlogResult};
use factlog_durability::DEFAULT_TAIL_BLOCK_SIZE;
use serde::{Deserialize, Serialize};

/// Environment variable overriding the data directory
pub const ENV_DATA_DIR: &str = "STATE_DATA_DIR";
/// Environment variable overriding the log file name
pub const ENV_EVENTS_FILE: &str = "STATE_EVENTS_FILE";
/// Environment variable overriding the projection file name
pub const ENV_CARDS_FILE: &str = "STATE_CARDS_FILE";

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_EVENTS_FILE: &str = "events.jsonl";
const DEFAULT_CARDS_FILE: &str = "cards.index.json";
const DEFAULT_TAIL: usize = 50;

/// Where a store keeps its files and how it reads them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Directory holding the log and the card projection
    pub data_dir: PathBuf,
    /// Log file name inside `data_dir`
    pub events_file: String,
    /// Card projection file name inside `data_dir`
    pub cards_file: String,
    /// Block size for the backward tail scan
    pub tail_block_size: usize,
    /// Number of events shown when a caller asks for "the tail" without a count
    pub default_tail: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            events_file: DEFAULT_EVENTS_FILE.to_string(),
            cards_file: DEFAULT_CARDS_FILE.to_string(),
            tail_block_size: DEFAULT_TAIL_BLOCK_SIZE,
            default_tail: DEFAULT_TAIL,
        }
    }
}

impl StoreConfig {
    /// Defaults rooted at `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Defaults overridden by `STATE_DATA_DIR`, `STATE_EVENTS_FILE` and
    /// `STATE_CARDS_FILE` when set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`StoreConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(name) = lookup(ENV_EVENTS_FILE).filter(|v| !v.is_empty()) {
            config.events_file = name;
        }
        if let Some(name) = lookup(ENV_CARDS_FILE).filter(|v| !v.is_empty()) {
            config.cards_file = name;
        }
        config
    }

    /// Parse a TOML document; missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> FactlogResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| FactlogError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> FactlogResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    /// Set the data directory.
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Set the log file name.
    pub fn events_file(mut self, name: impl Into<String>) -> Self {
        self.events_file = name.into();
        self
    }

    /// Set the projection file name.
    pub fn cards_file(mut self, name: impl Into<String>) -> Self {
        self.cards_file = name.into();
        self
    }

    /// Set the tail block size.
    pub fn tail_block_size(mut self, bytes: usize) -> Self {
        self.tail_block_size = bytes;
        self
    }

    /// Set the default tail length.
    pub fn default_tail(mut self, n: usize) -> Self {
        self.default_tail = n;
        self
    }

    /// Full path of the log file.
    pub fn events_path(&self) -> PathBuf {
        self.data_dir.join(&self.events_file)
    }

    /// Full path of the card projection file.
    pub fn cards_path(&self) -> PathBuf {
        self.data_dir.join(&self.cards_file)
    }

    /// Reject configurations a store cannot open with.
    pub fn validate(&self) -> FactlogResult<()> {
        if self.tail_block_size == 0 {
            return Err(FactlogError::config("tail_block_size must be at least 1"));
        }
        let files = [("events_file", &self.events_file), ("cards_file", &self.cards_file)];
        for (field, name) in files {
            if name.is_empty() {
                return Err(FactlogError::config(format!("{} must not be empty", field)));
            }
            if Path::new(name).components().count() != 1 {
                return Err(FactlogError::config(format!(
                    "{} must be a plain file name, got {:?}",
                    field, name
                )));
            }
        }
        if self.events_file == self.cards_file {
            return Err(FactlogError::config(
                "events_file and cards_file must differ",
            ));
        }
        Ok(())
    }
}
