//! In-process comparison of two manifests.
//!
//! Detection is line-exact on the manifest text: any difference in any line,
//! including a timestamp-only change, makes the manifests differ. The same
//! pass also produces the per-path breakdown used for reporting.

use crate::tracking::{FileRecord, Manifest};
use anyhow::{Context, Result};
use colored::{Color, Colorize};
use std::cmp::Ordering;
use std::fmt;
use std::io::Write;

/// A path present in both manifests whose line differs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordChange {
    /// Record from the baseline
    pub before: FileRecord,
    /// Record from the candidate
    pub after: FileRecord,
}

impl RecordChange {
    /// Whether the content digest differs
    #[must_use]
    pub fn content_changed(&self) -> bool {
        self.before.digest != self.after.digest
    }

    /// Whether the modification time differs
    #[must_use]
    pub fn timestamp_changed(&self) -> bool {
        self.before.modified != self.after.modified
    }

    /// Short description of what changed
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match (self.content_changed(), self.timestamp_changed()) {
            (true, true) => "content and timestamp",
            (true, false) => "content",
            (false, true) => "timestamp",
            (false, false) => "line",
        }
    }
}

/// Result of comparing a baseline against a candidate
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestDiff {
    /// Whether the two manifest texts are byte-identical
    identical: bool,
    /// Paths only in the candidate
    pub added: Vec<FileRecord>,
    /// Paths only in the baseline
    pub removed: Vec<FileRecord>,
    /// Paths in both whose record differs
    pub changed: Vec<RecordChange>,
}

impl ManifestDiff {
    /// Compare two parsed manifests record by record
    #[must_use]
    pub fn between(baseline: &Manifest, candidate: &Manifest) -> Self {
        let mut diff = Self {
            identical: baseline.render() == candidate.render(),
            ..Self::default()
        };

        let mut old = baseline.records().iter().peekable();
        let mut new = candidate.records().iter().peekable();

        loop {
            match (old.peek(), new.peek()) {
                (Some(a), Some(b)) => match a.path.cmp(&b.path) {
                    Ordering::Less => {
                        diff.removed.push((*a).clone());
                        old.next();
                    }
                    Ordering::Greater => {
                        diff.added.push((*b).clone());
                        new.next();
                    }
                    Ordering::Equal => {
                        if a != b {
                            diff.changed.push(RecordChange {
                                before: (*a).clone(),
                                after: (*b).clone(),
                            });
                        }
                        old.next();
                        new.next();
                    }
                },
                (Some(a), None) => {
                    diff.removed.push((*a).clone());
                    old.next();
                }
                (None, Some(b)) => {
                    diff.added.push((*b).clone());
                    new.next();
                }
                (None, None) => break,
            }
        }

        diff
    }

    /// Whether the manifests are byte-identical
    #[must_use]
    pub const fn is_identical(&self) -> bool {
        self.identical
    }

    /// Number of paths affected
    #[must_use]
    pub fn change_count(&self) -> usize {
        self.added.len() + self.removed.len() + self.changed.len()
    }

    /// Write one line per affected path
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_report(&self, colorize: bool, writer: &mut dyn Write) -> Result<()> {
        for record in &self.added {
            writeln!(writer, "  {} {}", paint("added:   ", Color::Green, colorize), record.path)?;
        }
        for record in &self.removed {
            writeln!(writer, "  {} {}", paint("removed: ", Color::Red, colorize), record.path)?;
        }
        for change in &self.changed {
            writeln!(
                writer,
                "  {} {} ({})",
                paint("changed: ", Color::Yellow, colorize),
                change.after.path,
                change.kind()
            )?;
        }

        Ok(())
    }
}

impl fmt::Display for ManifestDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} added, {} removed, {} changed",
            self.added.len(),
            self.removed.len(),
            self.changed.len()
        )
    }
}

fn paint(label: &str, color: Color, colorize: bool) -> String {
    if colorize {
        label.color(color).to_string()
    } else {
        label.to_string()
    }
}

/// Compare a baseline manifest text against a candidate manifest text
///
/// `is_identical` reflects byte equality of the two texts and is decided
/// before either is parsed. The per-path lists come from parsing both.
///
/// # Errors
///
/// Returns an error if the texts differ and either is not a well-formed
/// manifest.
pub fn compare_manifests(baseline_text: &str, candidate_text: &str) -> Result<ManifestDiff> {
    if baseline_text == candidate_text {
        tracing::debug!("Manifests are byte-identical");
        return Ok(ManifestDiff {
            identical: true,
            ..ManifestDiff::default()
        });
    }

    let baseline = Manifest::parse(baseline_text).context("Baseline manifest is corrupt")?;
    let candidate = Manifest::parse(candidate_text).context("Candidate manifest is corrupt")?;

    let mut diff = ManifestDiff::between(&baseline, &candidate);
    diff.identical = false;

    tracing::debug!(identical = diff.identical, summary = %diff, "Manifests compared");
    Ok(diff)
}
