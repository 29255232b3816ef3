//! Reader and writer settings.
//!
//! Settings can be built in code or loaded from TOML:
//!
//! ```toml
//! [reader]
//! date_offset = "local"   # "preserve" (default), "local" or "utc"
//!
//! [writer]
//! indent = false
//! write_document_declaration = true
//! ```
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Which UTC offset the canonical text of a date construct is rendered in.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DateOffset {
    /// Keep the offset the date was written with.
    #[default]
    Preserve,
    /// Re-render in the offset of the machine running the parser.
    Local,
    /// Re-render in UTC.
    Utc,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReaderConfig {
    pub date_offset: DateOffset,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WriterConfig {
    /// Indenting changes the whitespace inside XHTML content, so it is off
    /// unless asked for.
    pub indent: bool,
    pub write_document_declaration: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self { indent: false, write_document_declaration: true }
    }
}

/// Main configuration struct.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub reader: ReaderConfig,
    pub writer: WriterConfig,
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from a TOML file.  Missing fields use the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
