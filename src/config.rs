//! Configuration Module - User preferences from ~/.typesniff/config.toml
//!
//! Supports:
//! - Sniffing prefix length and rule tiers
//! - Object store location and key generation
//! - Upload bearer secrets (overridable from the environment)

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sniff::{SniffOptions, DEFAULT_PREFIX_LEN, MAX_PREFIX_LEN, MIN_PREFIX_LEN};

/// Environment variable holding comma separated upload secrets
pub const AUTH_SECRETS_ENV: &str = "TYPESNIFF_AUTH_SECRETS";

/// Values that parse but cannot be used
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("prefix length must be at least {MIN_PREFIX_LEN} bytes, got {0}")]
    PrefixTooShort(usize),

    #[error("prefix length must be at most {MAX_PREFIX_LEN} bytes, got {0}")]
    PrefixTooLong(usize),

    #[error("upload.initial_key_length must be non-zero")]
    ZeroKeyLength,

    #[error("upload.tries_per_length must be non-zero")]
    ZeroTries,

    #[error("upload.auth_secrets contains an empty secret")]
    EmptySecret,
}

/// typesniff Configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Detection settings
    pub sniff: SniffConfig,
    /// Upload boundary settings
    pub upload: UploadConfig,
}

/// Detection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SniffConfig {
    /// Bytes read from the head of a stream before detection
    pub prefix_len: usize,
    /// Consecutive ID3 tags skipped before guessing mp3
    pub max_id3_chain: usize,
    /// Evaluate the weak signature tier
    pub weak_signatures: bool,
    /// Evaluate the ASAR JSON-header heuristic
    pub asar_heuristic: bool,
}

impl Default for SniffConfig {
    fn default() -> Self {
        let options = SniffOptions::default();
        Self {
            prefix_len: DEFAULT_PREFIX_LEN,
            max_id3_chain: options.max_id3_chain,
            weak_signatures: options.weak_signatures,
            asar_heuristic: options.asar_heuristic,
        }
    }
}

impl SniffConfig {
    pub fn options(&self) -> SniffOptions {
        SniffOptions {
            max_id3_chain: self.max_id3_chain,
            weak_signatures: self.weak_signatures,
            asar_heuristic: self.asar_heuristic,
        }
    }
}

/// Upload settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Directory objects are written to
    pub store_dir: PathBuf,
    /// Length of the first generated key candidates
    pub initial_key_length: usize,
    /// Candidates tried per length before growing the key
    pub tries_per_length: usize,
    /// Accepted bearer tokens (empty = uploads rejected)
    pub auth_secrets: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            store_dir: dirs::data_dir()
                .map(|d| d.join("typesniff").join("objects"))
                .unwrap_or_else(|| PathBuf::from("objects")),
            initial_key_length: 5,
            tries_per_length: 3,
            auth_secrets: Vec::new(),
        }
    }
}

impl Config {
    /// Load config from default path or return defaults, then apply
    /// environment overrides
    pub fn load() -> Self {
        let path = Self::default_path();
        let mut config = if path.exists() {
            Self::load_from(&path).unwrap_or_else(|e| {
                tracing::warn!("Ignoring config: {e:#}");
                Self::default()
            })
        } else {
            Self::default()
        };
        config.apply_env();
        config
    }

    /// Load config from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config: {}", path.display()))?;

        Ok(config)
    }

    /// Save config to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;

        Ok(())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "tunclon", "typesniff")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".typesniff")
                    .join("config.toml")
            })
    }

    /// Write the commented sample config to `path` unless a file is already
    /// there. Returns whether a file was written.
    pub fn ensure_exists_at(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, generate_sample_config())
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        tracing::info!("Created default config at {}", path.display());
        Ok(true)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_prefix_len(self.sniff.prefix_len)?;
        if self.upload.initial_key_length == 0 {
            return Err(ConfigError::ZeroKeyLength);
        }
        if self.upload.tries_per_length == 0 {
            return Err(ConfigError::ZeroTries);
        }
        if self.upload.auth_secrets.iter().any(|s| s.is_empty()) {
            return Err(ConfigError::EmptySecret);
        }
        Ok(())
    }

    /// Replace the configured secrets with `TYPESNIFF_AUTH_SECRETS` when set
    pub fn apply_env(&mut self) {
        if let Ok(raw) = std::env::var(AUTH_SECRETS_ENV) {
            self.apply_secrets(&raw);
        }
    }

    fn apply_secrets(&mut self, raw: &str) {
        self.upload.auth_secrets = split_secrets(raw);
        tracing::debug!(
            count = self.upload.auth_secrets.len(),
            "upload secrets taken from {AUTH_SECRETS_ENV}"
        );
    }
}

/// Bounds shared by `sniff.prefix_len` and `detect --prefix`
pub fn check_prefix_len(len: usize) -> Result<(), ConfigError> {
    if len < MIN_PREFIX_LEN {
        return Err(ConfigError::PrefixTooShort(len));
    }
    if len > MAX_PREFIX_LEN {
        return Err(ConfigError::PrefixTooLong(len));
    }
    Ok(())
}

/// Split a comma separated secret list, dropping blanks
pub fn split_secrets(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Generate a sample config file with comments
pub fn generate_sample_config() -> String {
    format!(
        r#"# typesniff Configuration
# Location: ~/.config/typesniff/config.toml (or %APPDATA%\typesniff\config.toml on Windows)

[sniff]
# Bytes read from the start of each file before detection
prefix_len = {DEFAULT_PREFIX_LEN}

# Consecutive ID3 tags skipped before guessing mp3
max_id3_chain = 16

# Evaluate short, collision-prone signatures (mpg, ico, ttf, tar, mp3 frame sync, ...)
weak_signatures = true

# Recognise Electron ASAR archives by their JSON header
asar_heuristic = true

[upload]
# Where uploaded objects and their .meta.json sidecars are written
# store_dir = "/var/lib/typesniff/objects"

# Generated keys start this long and grow by one after repeated collisions
initial_key_length = 5

# Random candidates tried per key length
tries_per_length = 3

# Accepted bearer tokens; {AUTH_SECRETS_ENV}="a,b" overrides this list
auth_secrets = []
"#
    )
}
