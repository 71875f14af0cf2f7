#![allow(dead_code)]

use anyhow::Result;
use hashcheck::SnapshotContext;
use hashcheck::commands::check::{self, CheckOutcome};
use hashcheck::config::Config;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test tree fixture for consistent test setup
pub struct TestTree {
    pub temp_dir: TempDir,
    pub ctx: SnapshotContext,
}

impl TestTree {
    /// Create an empty tree with default settings
    pub fn new() -> Result<Self> {
        Self::with_config(Config::default())
    }

    /// Create an empty tree with explicit settings
    pub fn with_config(config: Config) -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let ctx = SnapshotContext::with_config(temp_dir.path().to_path_buf(), config);
        Ok(Self { temp_dir, ctx })
    }

    /// Get the root of the tree
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write a file, creating parent directories as needed
    pub fn write(&self, relative: &str, contents: &str) -> Result<PathBuf> {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    /// Run a check, answering the prompt with `answer`
    pub fn check(&self, answer: &str) -> Result<(CheckOutcome, String)> {
        let mut input = Cursor::new(answer.as_bytes().to_vec());
        let mut out = Vec::new();
        let outcome = check::run(&self.ctx, false, &mut input, &mut out)?;
        Ok((outcome, String::from_utf8(out)?))
    }

    /// Current baseline text
    pub fn baseline(&self) -> Result<String> {
        Ok(fs::read_to_string(self.ctx.baseline_path())?)
    }

    /// Whether the temporary manifest is on disk
    pub fn temp_exists(&self) -> bool {
        self.ctx.temp_path().exists()
    }
}
