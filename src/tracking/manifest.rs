//! Sorted manifest of file fingerprints.
//!
//! A `Manifest` is the in-memory form of a hash file: one [`FileRecord`] per
//! tracked file, ordered by path in byte-wise lexicographic order with no
//! duplicate paths. The text form is one `<timestamp> <digest> <path>` line
//! per record, and rendering is deterministic so that an unchanged tree
//! always produces byte-identical text.

use crate::tracking::record::FileRecord;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Ordered, duplicate-free list of file fingerprints
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    /// Records sorted by path
    records: Vec<FileRecord>,
}

impl Manifest {
    /// Create an empty manifest
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Build a manifest from records in any order
    ///
    /// # Errors
    ///
    /// Returns an error if two records share a path.
    pub fn from_records(mut records: Vec<FileRecord>) -> Result<Self> {
        records.sort_by(|a, b| a.path.cmp(&b.path));

        if let Some(pair) = records.windows(2).find(|w| w[0].path == w[1].path) {
            anyhow::bail!("Duplicate path in manifest: {}", pair[0].path);
        }

        Ok(Self { records })
    }

    /// All records, sorted by path
    #[must_use]
    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    /// Look up the record for a manifest path
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&FileRecord> {
        self.records
            .binary_search_by(|r| r.path.as_str().cmp(path))
            .ok()
            .map(|i| &self.records[i])
    }

    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the manifest has no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Render the manifest text, one newline-terminated line per record
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for record in &self.records {
            out.push_str(&record.to_string());
            out.push('\n');
        }
        out
    }

    /// Parse manifest text
    ///
    /// # Errors
    ///
    /// Returns an error naming the 1-based line number of the first malformed
    /// line, or if a path appears twice.
    pub fn parse(text: &str) -> Result<Self> {
        let records = text
            .lines()
            .enumerate()
            .map(|(i, line)| {
                FileRecord::parse_line(line).with_context(|| format!("Malformed line {}", i + 1))
            })
            .collect::<Result<Vec<_>>>()?;

        Self::from_records(records)
    }

    /// Read and parse a manifest file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;

        Self::parse(&text).with_context(|| format!("Corrupt manifest {}", path.display()))
    }

    /// Write the manifest to `path`, replacing any existing file
    ///
    /// The data is flushed and synced before returning so that a later rename
    /// only ever publishes a complete manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create manifest {}", path.display()))?;
        let mut writer = BufWriter::new(file);

        writer
            .write_all(self.render().as_bytes())
            .with_context(|| format!("Failed to write manifest {}", path.display()))?;

        let file = writer
            .into_inner()
            .map_err(|e| e.into_error())
            .with_context(|| format!("Failed to flush manifest {}", path.display()))?;
        file.sync_all()
            .with_context(|| format!("Failed to sync manifest {}", path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::hash::hash_bytes;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn record(path: &str, content: &[u8]) -> FileRecord {
        let modified = NaiveDate::from_ymd_opt(2023, 11, 2)
            .and_then(|d| d.and_hms_micro_opt(8, 30, 0, 250))
            .unwrap();
        FileRecord::new(modified, hash_bytes(content), path.to_string())
    }

    #[test]
    fn test_from_records_sorts_bytewise() -> Result<()> {
        let manifest = Manifest::from_records(vec![
            record("./b", b"b"),
            record("./a/z", b"az"),
            record("./a.txt", b"a"),
            record("./B", b"B"),
        ])?;

        let paths: Vec<&str> = manifest.records().iter().map(|r| r.path.as_str()).collect();
        // '.' (0x2e) sorts before '/' (0x2f); uppercase before lowercase
        assert_eq!(paths, vec!["./B", "./a.txt", "./a/z", "./b"]);
        Ok(())
    }

    #[test]
    fn test_from_records_rejects_duplicates() {
        let err = Manifest::from_records(vec![record("./a", b"1"), record("./a", b"2")])
            .unwrap_err();
        assert!(err.to_string().contains("Duplicate path"));
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(Manifest::new().render(), "");
    }

    #[test]
    fn test_render_parse_is_byte_identical() -> Result<()> {
        let manifest = Manifest::from_records(vec![record("./one", b"1"), record("./two", b"2")])?;
        let text = manifest.render();

        assert!(text.ends_with('\n'));
        assert_eq!(text.lines().count(), 2);

        let parsed = Manifest::parse(&text)?;
        assert_eq!(parsed, manifest);
        assert_eq!(parsed.render(), text);
        Ok(())
    }

    #[test]
    fn test_parse_reports_line_number() {
        let good = record("./a", b"a").to_string();
        let text = format!("{good}\ngarbage\n");
        let err = Manifest::parse(&text).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_get() -> Result<()> {
        let manifest = Manifest::from_records(vec![record("./a", b"a"), record("./c", b"c")])?;
        assert!(manifest.get("./a").is_some());
        assert!(manifest.get("./b").is_none());
        assert_eq!(manifest.len(), 2);
        Ok(())
    }

    #[test]
    fn test_write_and_load() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join(".hashes.txt");
        let manifest = Manifest::from_records(vec![record("./x", b"x")])?;

        manifest.write_to(&path)?;
        assert_eq!(std::fs::read_to_string(&path)?, manifest.render());
        assert_eq!(Manifest::load(&path)?, manifest);
        Ok(())
    }
}
