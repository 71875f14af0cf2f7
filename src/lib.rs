#![warn(missing_docs)]
#![allow(clippy::arithmetic_side_effects)] // Simple counters cannot overflow
#![allow(clippy::indexing_slicing)] // Bounds checked by logic

//! # hashcheck - Directory Change Detection
//!
//! hashcheck records a fingerprint (modification time, content digest,
//! relative path) for every file below a directory and compares successive
//! snapshots to tell whether anything changed.
//!
//! ## How a run works
//!
//! 1. A leftover temporary manifest from an interrupted run is deleted.
//! 2. Every regular file is discovered and sorted by path.
//! 3. Each file is hashed in fixed-size blocks (MD5 by default).
//! 4. Without a baseline the candidate becomes the baseline. Otherwise the
//!    candidate is written to a temporary manifest, compared line by line,
//!    and either discarded or atomically renamed over the baseline.
//!
//! ## Architecture
//!
//! - [`tracking`]: discovery, fingerprints and the manifest format
//! - [`diff`]: manifest comparison and unified diff rendering
//! - [`commands`]: `check`, `status` and `show`
//! - [`config`]: configuration loading and validation
//! - [`output`]: status lines, warnings and verbosity
//! - [`utils`]: hashing and path helpers
//!
//! ## Example Usage
//!
//! ```no_run
//! use hashcheck::SnapshotContext;
//! use hashcheck::commands::check;
//!
//! # fn main() -> anyhow::Result<()> {
//! let ctx = SnapshotContext::new(None, None)?;
//! let mut stdin = std::io::stdin().lock();
//! let outcome = check::run(&ctx, false, &mut stdin, &mut std::io::stdout())?;
//! println!("{}", outcome.message());
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions (argument parsing structures).
pub mod cli;

/// Command implementations.
pub mod commands;

/// Configuration parsing, validation, and management.
pub mod config;

/// Manifest comparison and unified diff output.
pub mod diff;

/// Output formatting and verbosity control.
pub mod output;

/// Discovery, fingerprinting and the manifest format.
pub mod tracking;

/// Utility functions and helpers.
pub mod utils;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Current version of the hashcheck binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Central context for a snapshot run.
///
/// Holds the snapshot root and the configuration loaded once at startup.
///
/// # Examples
///
/// ```no_run
/// use hashcheck::SnapshotContext;
/// use hashcheck::config::Config;
///
/// # fn main() -> anyhow::Result<()> {
/// // Current directory, configuration from the default location
/// let ctx = SnapshotContext::new(None, None)?;
///
/// // Explicit root and configuration (for testing)
/// let ctx = SnapshotContext::with_config("/tmp/tree".into(), Config::default());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SnapshotContext {
    /// Directory being snapshotted; manifests live directly inside it.
    pub root: PathBuf,

    /// Configuration file the settings came from, if one was found.
    pub config_path: Option<PathBuf>,

    /// Loaded configuration settings.
    pub config: config::Config,

    /// Whether diff and status output may use colors.
    pub colorize: bool,
}

impl SnapshotContext {
    /// Creates a context for `root` (default: the current directory).
    ///
    /// # Errors
    /// Returns an error if the current directory cannot be determined, the root
    /// is not a directory, or the configuration file is invalid.
    pub fn new(root: Option<PathBuf>, config_path: Option<&Path>) -> Result<Self> {
        let root = match root {
            Some(root) => root,
            None => std::env::current_dir().context("Could not determine current directory")?,
        };

        if !root.is_dir() {
            anyhow::bail!("Not a directory: {}", root.display());
        }

        let config_path = config::Config::resolve_path(config_path);
        let config = match &config_path {
            Some(path) => config::Config::load(path)?,
            None => config::Config::default(),
        };

        tracing::debug!(
            root = %root.display(),
            config = ?config_path,
            "Snapshot context ready"
        );

        Ok(Self {
            root,
            config_path,
            config,
            colorize: false,
        })
    }

    /// Creates a context with an explicit configuration.
    #[must_use]
    pub const fn with_config(root: PathBuf, config: config::Config) -> Self {
        Self {
            root,
            config_path: None,
            config,
            colorize: false,
        }
    }

    /// Path of the baseline manifest.
    #[must_use]
    pub fn baseline_path(&self) -> PathBuf {
        self.root.join(&self.config.manifest.baseline_file)
    }

    /// Path of the temporary manifest.
    #[must_use]
    pub fn temp_path(&self) -> PathBuf {
        self.root.join(&self.config.manifest.temp_file)
    }

    /// Scanner configured for this root.
    ///
    /// # Errors
    /// Returns an error if an ignore pattern is invalid.
    pub fn scanner(&self) -> Result<tracking::DirectoryScanner> {
        tracking::DirectoryScanner::from_config(self.root.clone(), &self.config)
    }

    /// Discover and fingerprint every file, producing the candidate manifest.
    ///
    /// # Errors
    /// Returns an error if any directory or file cannot be read.
    pub fn build_candidate(&self) -> Result<tracking::Manifest> {
        let manifest = tracking::build_manifest(&self.scanner()?, &self.config.hashing)?;
        output::info(&format!(
            "Hashed {} file(s) under {}",
            manifest.len(),
            self.root.display()
        ));
        Ok(manifest)
    }

    /// Delete a temporary manifest left behind by an interrupted run.
    ///
    /// Returns `true` if one was found and removed. Its content is never read.
    ///
    /// # Errors
    /// Returns an error if the leftover file cannot be removed.
    pub fn recover_interrupted_run(&self) -> Result<bool> {
        let temp = self.temp_path();
        if !temp.exists() {
            return Ok(false);
        }

        std::fs::remove_file(&temp).with_context(|| {
            format!("Failed to remove leftover temporary manifest {}", temp.display())
        })?;

        tracing::info!(path = %temp.display(), "Removed leftover temporary manifest");
        output::warning(&format!(
            "Found temporary hash file {}, removed it",
            self.config.manifest.temp_file
        ));
        Ok(true)
    }
}
