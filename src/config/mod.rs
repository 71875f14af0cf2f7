//! Configuration file support.
//!
//! Field names mirror the TOML keys, so fields carry no separate docs.

#![allow(missing_docs)]

pub mod parser;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Environment variable overriding the configuration file location.
pub const CONFIG_PATH_ENV: &str = "HASHCHECK_CONFIG_PATH";

/// Process-wide settings, loaded once at startup.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub manifest: ManifestConfig,

    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub hashing: HashingConfig,

    #[serde(default)]
    pub diff: DiffConfig,
}

/// Names of the two manifest files kept in the snapshot root.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ManifestConfig {
    #[serde(default = "default_baseline_file")]
    pub baseline_file: String,
    #[serde(default = "default_temp_file")]
    pub temp_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ScanConfig {
    /// Descend into symlinked directories (file symlinks are always recorded)
    #[serde(default)]
    pub follow_symlinks: bool,
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
    /// Reject paths that are not valid UTF-8 instead of dropping the bad bytes
    #[serde(default)]
    pub strict_paths: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HashingConfig {
    #[serde(default)]
    pub algorithm: HashAlgorithm,
    #[serde(default = "default_block_size")]
    pub block_size: usize,
}

/// Content digest written into the manifest. Both render as 32 hex digits.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// Compatible with manifests written by earlier tools
    #[default]
    Md5,
    /// XXH3-128, much faster but not compatible
    Xxh3,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiffConfig {
    #[serde(default)]
    pub context_lines: usize,
    #[serde(default = "default_algorithm")]
    pub algorithm: DiffAlgorithm,
    #[serde(default = "default_color")]
    pub color: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DiffAlgorithm {
    Myers,
    Patience,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            baseline_file: default_baseline_file(),
            temp_file: default_temp_file(),
        }
    }
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::default(),
            block_size: default_block_size(),
        }
    }
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            context_lines: 0,
            algorithm: default_algorithm(),
            color: default_color(),
        }
    }
}

impl Config {
    /// Resolve where the configuration file lives.
    ///
    /// An explicit path wins, then `HASHCHECK_CONFIG_PATH`, then
    /// `<config dir>/hashcheck/config.toml`.
    #[must_use]
    pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("hashcheck").join("config.toml"))
    }

    /// Load configuration from a file
    ///
    /// A missing file yields the defaults; nothing is written.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file exists but cannot be read
    /// - The file contains invalid TOML
    /// - A value fails validation
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        parser::parse_config_file(path)
    }

    /// Save configuration to a file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Cannot create parent directories
    /// - Cannot write to the file
    /// - TOML serialization fails
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create config file: {}", path.display()))?;
        file.write_all(toml_str.as_bytes())?;
        Ok(())
    }

    /// File names the scanner must never record
    #[must_use]
    pub fn reserved_names(&self) -> Vec<String> {
        vec![
            self.manifest.baseline_file.clone(),
            self.manifest.temp_file.clone(),
        ]
    }
}

// Default functions for serde
fn default_baseline_file() -> String {
    ".hashes.txt".to_string()
}

fn default_temp_file() -> String {
    ".hashes.txt.tmp".to_string()
}

const fn default_block_size() -> usize {
    1024 * 1024 // 1MiB
}

const fn default_algorithm() -> DiffAlgorithm {
    DiffAlgorithm::Myers
}

const fn default_color() -> bool {
    true
}
