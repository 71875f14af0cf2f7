//! Snapshot building: discovery, fingerprinting and the manifest format.
//!
//! # Architecture
//!
//! - [`crate::tracking::DirectoryScanner`] - Finds every file below the root
//! - [`crate::tracking::FileRecord`] - Fingerprint of one file and its line format
//! - [`crate::tracking::Manifest`] - Sorted, duplicate-free set of records
//!
//! # Usage
//!
//! ```no_run
//! use hashcheck::config::Config;
//! use hashcheck::tracking::{DirectoryScanner, build_manifest};
//! use std::path::PathBuf;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::default();
//! let scanner = DirectoryScanner::from_config(PathBuf::from("."), &config)?;
//! let manifest = build_manifest(&scanner, &config.hashing)?;
//! print!("{}", manifest.render());
//! # Ok(())
//! # }
//! ```

pub mod manifest;
pub mod record;
pub mod scanner;

pub use manifest::Manifest;
pub use record::FileRecord;
pub use scanner::{DirectoryScanner, DiscoveredFile};

use crate::config::HashingConfig;
use crate::output;
use anyhow::Result;
use tracing::{Level, debug, info, span};

/// Fingerprint already-discovered files into a manifest.
///
/// The first unreadable file aborts the whole build; no partial manifest is
/// ever returned.
///
/// # Errors
///
/// Returns an error if any file cannot be read.
pub fn fingerprint_files(
    scanner: &DirectoryScanner,
    files: Vec<DiscoveredFile>,
    hashing: &HashingConfig,
) -> Result<Manifest> {
    let mut records = Vec::with_capacity(files.len());

    for file in files {
        let record = FileRecord::fingerprint(
            scanner.root(),
            &file.relative,
            file.manifest_path,
            hashing,
        )?;
        debug!(path = %record.path, digest = %record.digest, "Fingerprinted");
        output::verbose(&format!("  {} {}", record.digest, record.path));
        records.push(record);
    }

    Manifest::from_records(records)
}

/// Scan the root and fingerprint every file found.
///
/// # Errors
///
/// Returns an error if the scan fails or any file cannot be read.
pub fn build_manifest(scanner: &DirectoryScanner, hashing: &HashingConfig) -> Result<Manifest> {
    let span = span!(Level::INFO, "build_manifest", root = %scanner.root().display());
    let _guard = span.enter();

    let files = scanner.scan_files()?;
    let manifest = fingerprint_files(scanner, files, hashing)?;

    info!(files = manifest.len(), "Manifest built");
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::utils::hash::hash_bytes;
    use std::fs;
    use tempfile::TempDir;

    fn scanner(root: &std::path::Path) -> Result<DirectoryScanner> {
        DirectoryScanner::from_config(root.to_path_buf(), &Config::default())
    }

    #[test]
    fn test_build_manifest() -> Result<()> {
        let dir = TempDir::new()?;
        fs::create_dir(dir.path().join("docs"))?;
        fs::write(dir.path().join("docs/readme.md"), "# readme")?;
        fs::write(dir.path().join("main.rs"), "fn main() {}")?;

        let manifest = build_manifest(&scanner(dir.path())?, &HashingConfig::default())?;

        assert_eq!(manifest.len(), 2);
        let readme = manifest.get("./docs/readme.md").unwrap();
        assert_eq!(readme.digest, hash_bytes(b"# readme"));
        assert!(manifest.get("./main.rs").is_some());
        Ok(())
    }

    #[test]
    fn test_build_manifest_is_deterministic() -> Result<()> {
        let dir = TempDir::new()?;
        for name in ["c", "a", "b"] {
            fs::write(dir.path().join(name), name)?;
        }

        let scanner = scanner(dir.path())?;
        let first = build_manifest(&scanner, &HashingConfig::default())?.render();
        let second = build_manifest(&scanner, &HashingConfig::default())?.render();
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn test_vanished_file_aborts_build() -> Result<()> {
        let dir = TempDir::new()?;
        fs::write(dir.path().join("present"), "x")?;

        let scanner = scanner(dir.path())?;
        let mut files = scanner.scan_files()?;
        fs::remove_file(dir.path().join("present"))?;
        files.truncate(1);

        assert!(fingerprint_files(&scanner, files, &HashingConfig::default()).is_err());
        Ok(())
    }
}
