//! Directory scanner for discovering files under a snapshot root.
//!
//! The `DirectoryScanner` walks the whole tree below the root and collects
//! every regular file and file symlink except the manifest files themselves.
//! Directory symlinks are only descended into when `follow_symlinks` is set.
//! The result is sorted by manifest path so that successive runs line up
//! record for record.

use crate::config::Config;
use crate::utils::paths::to_manifest_path;
use crate::utils::{compile_patterns, should_ignore};
use anyhow::{Context, Result};
use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A file found by the scanner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    /// Path relative to the scan root, as found on disk
    pub relative: PathBuf,
    /// Rendered manifest path (`./a/b`)
    pub manifest_path: String,
}

/// Scanner for enumerating files below a root directory
pub struct DirectoryScanner {
    /// Directory being snapshotted
    root: PathBuf,
    /// File names that are never recorded (the manifest files)
    reserved_names: Vec<String>,
    /// Patterns to ignore during scanning
    ignore_patterns: Vec<Pattern>,
    /// Whether to descend into directory symlinks
    follow_symlinks: bool,
    /// Whether non-UTF-8 paths are an error
    strict_paths: bool,
}

impl DirectoryScanner {
    /// Create a new directory scanner
    ///
    /// # Arguments
    ///
    /// * `root` - Directory to scan
    /// * `reserved_names` - File names to skip at any depth
    /// * `ignore_patterns` - Compiled glob patterns to exclude
    /// * `follow_symlinks` - Whether to descend into directory symlinks
    /// * `strict_paths` - Reject non-UTF-8 paths instead of dropping bytes
    #[must_use]
    pub const fn new(
        root: PathBuf,
        reserved_names: Vec<String>,
        ignore_patterns: Vec<Pattern>,
        follow_symlinks: bool,
        strict_paths: bool,
    ) -> Self {
        Self {
            root,
            reserved_names,
            ignore_patterns,
            follow_symlinks,
            strict_paths,
        }
    }

    /// Create a scanner configured from [`Config`]
    ///
    /// # Errors
    ///
    /// Returns an error if an ignore pattern is invalid.
    pub fn from_config(root: PathBuf, config: &Config) -> Result<Self> {
        Ok(Self::new(
            root,
            config.reserved_names(),
            compile_patterns(&config.scan.ignore_patterns)?,
            config.scan.follow_symlinks,
            config.scan.strict_paths,
        ))
    }

    /// Root directory of the scan
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scan the tree and return every tracked file, sorted by manifest path
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The root is not a directory
    /// - A directory cannot be read
    /// - A path cannot be rendered (strict mode) or two paths render the same
    pub fn scan_files(&self) -> Result<Vec<DiscoveredFile>> {
        if !self.root.is_dir() {
            anyhow::bail!("Not a directory: {}", self.root.display());
        }

        let mut files = Vec::new();

        for entry in WalkDir::new(&self.root)
            .follow_links(self.follow_symlinks)
            .min_depth(1)
            .into_iter()
            .filter_entry(|e| !self.should_skip_entry(e))
        {
            let entry = entry.with_context(|| {
                format!("Failed to read directory entry in {}", self.root.display())
            })?;

            if !Self::is_recorded_type(&entry) || self.is_reserved(entry.file_name()) {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(&self.root)
                .with_context(|| format!("Path escaped scan root: {}", entry.path().display()))?
                .to_path_buf();
            let manifest_path = to_manifest_path(&relative, self.strict_paths)?;

            files.push(DiscoveredFile {
                relative,
                manifest_path,
            });
        }

        files.sort_by(|a, b| a.manifest_path.cmp(&b.manifest_path));

        if let Some(pair) = files
            .windows(2)
            .find(|w| w[0].manifest_path == w[1].manifest_path)
        {
            anyhow::bail!(
                "Paths {} and {} both render as {}",
                pair[0].relative.display(),
                pair[1].relative.display(),
                pair[0].manifest_path
            );
        }

        tracing::debug!(root = %self.root.display(), files = files.len(), "Scan complete");
        Ok(files)
    }

    /// Check if a directory entry should be skipped
    fn should_skip_entry(&self, entry: &walkdir::DirEntry) -> bool {
        let relative = entry
            .path()
            .strip_prefix(&self.root)
            .unwrap_or_else(|_| entry.path());
        should_ignore(relative, &self.ignore_patterns)
    }

    /// Regular files, plus symlinks that do not point at a directory.
    ///
    /// A dangling link is kept so that hashing it fails loudly.
    fn is_recorded_type(entry: &walkdir::DirEntry) -> bool {
        let file_type = entry.file_type();
        if file_type.is_symlink() {
            return !std::fs::metadata(entry.path()).is_ok_and(|meta| meta.is_dir());
        }
        file_type.is_file()
    }

    fn is_reserved(&self, name: &std::ffi::OsStr) -> bool {
        self.reserved_names.iter().any(|r| name == r.as_str())
    }
}
