use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Error type for loading a [`BoardConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Limits and tuning for a [`ConcernBoard`](crate::ConcernBoard).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Longest accepted concern text, in characters, after trimming.
    #[serde(default = "default_max_text_len")]
    pub max_text_len: usize,
    #[serde(default = "default_max_author_name_len")]
    pub max_author_name_len: usize,
    #[serde(default = "default_max_location_len")]
    pub max_location_len: usize,
    /// Page size used when a leaderboard page request asks for size 0.
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
    /// Attempts for a compare-and-swap write before a conflict is surfaced.
    #[serde(default = "default_max_write_attempts")]
    pub max_write_attempts: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            max_text_len: default_max_text_len(),
            max_author_name_len: default_max_author_name_len(),
            max_location_len: default_max_location_len(),
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            max_write_attempts: default_max_write_attempts(),
        }
    }
}

impl BoardConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_write_attempts == 0 {
            return Err(ConfigError::Invalid("max_write_attempts must be at least 1".into()));
        }
        if self.default_page_size == 0 || self.max_page_size == 0 {
            return Err(ConfigError::Invalid("page sizes must be at least 1".into()));
        }
        if self.default_page_size > self.max_page_size {
            return Err(ConfigError::Invalid(
                "default_page_size must not exceed max_page_size".into(),
            ));
        }
        if self.max_text_len == 0 || self.max_location_len == 0 {
            return Err(ConfigError::Invalid("length limits must be at least 1".into()));
        }
        Ok(())
    }
}

const fn default_max_text_len() -> usize {
    5000
}

const fn default_max_author_name_len() -> usize {
    100
}

const fn default_max_location_len() -> usize {
    100
}

const fn default_page_size() -> usize {
    20
}

const fn default_max_page_size() -> usize {
    100
}

const fn default_max_write_attempts() -> u32 {
    8
}
