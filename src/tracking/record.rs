//! Per-file fingerprints and their one-line text form.

use crate::config::HashingConfig;
use crate::utils::hash::{hash_file_streaming, is_valid_digest};
use crate::utils::paths::unescape_manifest_path;
use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDateTime, Timelike};
use std::fmt;
use std::path::Path;
use std::time::SystemTime;

/// Timestamp layout with a fixed six-digit fraction.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Rendered width of [`TIMESTAMP_FORMAT`].
pub const TIMESTAMP_LEN: usize = 26;

/// Fingerprint of a single file: modification time, content digest and path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Local wall-clock modification time, microsecond precision
    pub modified: NaiveDateTime,
    /// Lowercase hex 128-bit digest of the content
    pub digest: String,
    /// `./`-prefixed, `/`-separated path relative to the snapshot root, with
    /// backslashes and control characters escaped
    pub path: String,
}

impl FileRecord {
    /// Build a record, truncating `modified` to whole microseconds.
    #[must_use]
    pub fn new(modified: NaiveDateTime, digest: String, path: String) -> Self {
        Self {
            modified: truncate_to_micros(modified),
            digest,
            path,
        }
    }

    /// Fingerprint the file at `root/relative`.
    ///
    /// `path` is the already-rendered manifest path for `relative`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file's metadata or content cannot be read.
    pub fn fingerprint(
        root: &Path,
        relative: &Path,
        path: String,
        hashing: &HashingConfig,
    ) -> Result<Self> {
        let absolute = root.join(relative);

        let metadata = std::fs::metadata(&absolute)
            .with_context(|| format!("Failed to read metadata of {}", absolute.display()))?;
        let modified = metadata.modified().with_context(|| {
            format!("Modification time unavailable for {}", absolute.display())
        })?;

        let digest = hash_file_streaming(&absolute, hashing.algorithm, hashing.block_size)?;

        Ok(Self::new(local_time(modified), digest, path))
    }

    /// The timestamp as it appears in a manifest line.
    #[must_use]
    pub fn timestamp(&self) -> String {
        self.modified.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Parse one manifest line (without its trailing newline).
    ///
    /// # Errors
    ///
    /// Returns an error if the timestamp, digest or path field is malformed.
    pub fn parse_line(line: &str) -> Result<Self> {
        let mut parts = line.splitn(4, ' ');
        let (Some(date), Some(time), Some(digest), Some(path)) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            anyhow::bail!("Expected '<timestamp> <digest> <path>', got {line:?}");
        };

        let stamp = &line[..date.len() + 1 + time.len()];
        if stamp.len() != TIMESTAMP_LEN {
            anyhow::bail!("Timestamp must have a six-digit fraction: {stamp:?}");
        }
        let modified = NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT)
            .with_context(|| format!("Invalid timestamp: {stamp:?}"))?;

        if !is_valid_digest(digest) {
            anyhow::bail!("Invalid digest: {digest:?}");
        }
        if path.is_empty() {
            anyhow::bail!("Missing path");
        }
        unescape_manifest_path(path)?;

        Ok(Self::new(modified, digest.to_string(), path.to_string()))
    }
}

impl fmt::Display for FileRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.timestamp(), self.digest, self.path)
    }
}

/// Convert a filesystem time to local wall-clock time.
#[must_use]
pub fn local_time(time: SystemTime) -> NaiveDateTime {
    DateTime::<Local>::from(time).naive_local()
}

fn truncate_to_micros(time: NaiveDateTime) -> NaiveDateTime {
    let nanos = time.nanosecond();
    time.with_nanosecond(nanos - nanos % 1_000).unwrap_or(time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::hash::hash_bytes;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    fn at(h: u32, m: u32, s: u32, nanos: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .and_then(|d| d.and_hms_nano_opt(h, m, s, nanos))
            .unwrap()
    }

    #[test]
    fn test_whole_seconds_are_zero_padded() {
        let record = FileRecord::new(at(7, 5, 3, 0), hash_bytes(b"a"), "./a".to_string());
        assert_eq!(record.timestamp(), "2024-03-09 07:05:03.000000");
        assert_eq!(record.timestamp().len(), TIMESTAMP_LEN);
    }

    #[test]
    fn test_sub_microsecond_digits_truncated() {
        let record = FileRecord::new(at(0, 0, 0, 123_456_789), hash_bytes(b"a"), "./a".into());
        assert_eq!(record.timestamp(), "2024-03-09 00:00:00.123456");
        assert_eq!(record.modified.nanosecond(), 123_456_000);
    }

    #[test]
    fn test_line_format() {
        let digest = hash_bytes(b"content");
        let record = FileRecord::new(at(12, 0, 1, 500_000_000), digest.clone(), "./x y".into());
        assert_eq!(
            record.to_string(),
            format!("2024-03-09 12:00:01.500000 {digest} ./x y")
        );
    }

    #[test]
    fn test_parse_line_with_spaces_in_path() -> Result<()> {
        let digest = hash_bytes(b"content");
        let line = format!("2024-03-09 12:00:01.500000 {digest} ./dir/a file  with spaces");
        let record = FileRecord::parse_line(&line)?;

        assert_eq!(record.path, "./dir/a file  with spaces");
        assert_eq!(record.digest, digest);
        assert_eq!(record.to_string(), line);
        Ok(())
    }

    #[test]
    fn test_parse_line_keeps_escaped_path() -> Result<()> {
        let line = format!("2024-03-09 12:00:01.500000 {} ./a\\nb\\\\c", hash_bytes(b"x"));
        let record = FileRecord::parse_line(&line)?;

        assert_eq!(record.path, "./a\\nb\\\\c");
        assert_eq!(unescape_manifest_path(&record.path)?, "./a\nb\\c");
        assert_eq!(record.to_string(), line);
        Ok(())
    }

    #[test]
    fn test_parse_line_rejects_bad_escape() {
        let line = format!("2024-03-09 12:00:01.500000 {} ./a\\q", hash_bytes(b"x"));
        assert!(FileRecord::parse_line(&line).is_err());
    }

    #[test]
    fn test_parse_line_rejects_short_fraction() {
        let line = format!("2024-03-09 12:00:01.5 {} ./a", hash_bytes(b"a"));
        assert!(FileRecord::parse_line(&line).is_err());
    }

    #[test]
    fn test_parse_line_rejects_bad_digest() {
        assert!(FileRecord::parse_line("2024-03-09 12:00:01.000000 nothex ./a").is_err());
    }

    #[test]
    fn test_parse_line_rejects_missing_fields() {
        assert!(FileRecord::parse_line("2024-03-09 12:00:01.000000").is_err());
        assert!(FileRecord::parse_line("").is_err());
    }

    #[test]
    fn test_fingerprint_reads_content_and_mtime() -> Result<()> {
        let dir = TempDir::new()?;
        fs::create_dir(dir.path().join("sub"))?;
        fs::write(dir.path().join("sub/file.txt"), b"payload")?;

        let relative = Path::new("sub/file.txt");
        let hashing = HashingConfig {
            block_size: 3,
            ..HashingConfig::default()
        };
        let record = FileRecord::fingerprint(dir.path(), relative, "./sub/file.txt".into(), &hashing)?;

        let mtime = fs::metadata(dir.path().join(relative))?.modified()?;
        assert_eq!(record.digest, hash_bytes(b"payload"));
        assert_eq!(record.path, "./sub/file.txt");
        assert_eq!(record.modified, truncate_to_micros(local_time(mtime)));
        Ok(())
    }

    #[test]
    fn test_fingerprint_missing_file_fails() -> Result<()> {
        let dir = TempDir::new()?;
        let result =
            FileRecord::fingerprint(dir.path(), Path::new("gone"), "./gone".into(), &HashingConfig::default());
        assert!(result.is_err());
        Ok(())
    }
}
