//! The snapshot/compare cycle.
//!
//! ```text
//! start ── leftover temp? ── delete it
//!   │
//!   ├─ no baseline ───────────────► write candidate as baseline   (Created)
//!   │
//!   └─ baseline ─► write temp ─► compare
//!                                  ├─ identical ─► delete temp    (Unchanged)
//!                                  └─ different ─► diff + prompt
//!                                                   ├─ "yes" ─► rename temp over baseline (Updated)
//!                                                   └─ other ─► delete temp              (Discarded)
//! ```

use crate::SnapshotContext;
use crate::commands::{changes_banner, present_diff};
use crate::diff::compare_manifests;
use crate::output;
use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};
use std::path::Path;
use tracing::{debug, info};

/// Question asked before replacing the baseline.
pub const PROMPT: &str = "Replace old hash file with new one? (type 'yes', anything else is no): ";

/// How a check run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// No baseline existed; the candidate became the baseline
    Created,
    /// The candidate matched the baseline exactly
    Unchanged,
    /// Differences were confirmed and the baseline was replaced
    Updated,
    /// Differences were declined and the baseline was left alone
    Discarded,
}

impl CheckOutcome {
    /// Status line reported to the user
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Created => "Hash file created",
            Self::Unchanged => "No changes detected",
            Self::Updated => "Hash file verification complete, hash file updated",
            Self::Discarded => "Hash file verification complete, no changes applied",
        }
    }
}

/// Run a check against the real terminal and print the outcome.
///
/// # Errors
///
/// Returns an error if any file cannot be read or a manifest cannot be
/// written, renamed or removed.
pub fn execute(ctx: &SnapshotContext, assume_yes: bool) -> Result<CheckOutcome> {
    let mut stdin = io::stdin().lock();
    let mut stdout = io::stdout().lock();

    let outcome = run(ctx, assume_yes, &mut stdin, &mut stdout)?;
    drop(stdout);

    output::status(outcome.message());
    Ok(outcome)
}

/// Run one snapshot/compare cycle.
///
/// The diff and the confirmation prompt are written to `out`; the answer is
/// read from `input`. With `assume_yes` the prompt is answered automatically.
///
/// # Errors
///
/// Returns an error if any file cannot be read or a manifest cannot be
/// written, renamed or removed. A file that cannot be read aborts the run
/// before any manifest is written.
pub fn run(
    ctx: &SnapshotContext,
    assume_yes: bool,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<CheckOutcome> {
    ctx.recover_interrupted_run()?;

    let candidate = ctx.build_candidate()?;
    let baseline_path = ctx.baseline_path();

    if !baseline_path.exists() {
        candidate.write_to(&baseline_path)?;
        info!(path = %baseline_path.display(), files = candidate.len(), "Baseline created");
        return Ok(CheckOutcome::Created);
    }

    let temp_path = ctx.temp_path();
    candidate.write_to(&temp_path)?;

    let result = resolve(ctx, &baseline_path, &temp_path, assume_yes, input, out);
    if result.is_err()
        && let Err(e) = discard(&temp_path)
    {
        tracing::warn!(error = %e, "Could not remove temporary manifest after failure");
    }
    result
}

/// Compare the written candidate with the baseline and settle the outcome
fn resolve(
    ctx: &SnapshotContext,
    baseline_path: &Path,
    temp_path: &Path,
    assume_yes: bool,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<CheckOutcome> {
    let baseline_text = read_manifest_text(baseline_path)?;
    let candidate_text = read_manifest_text(temp_path)?;

    let diff = compare_manifests(&baseline_text, &candidate_text)
        .with_context(|| format!("Cannot compare against {}", baseline_path.display()))?;

    if diff.is_identical() {
        discard(temp_path)?;
        return Ok(CheckOutcome::Unchanged);
    }

    writeln!(out, "{}", changes_banner(ctx.colorize))?;
    present_diff(ctx, &baseline_text, &candidate_text, &diff, out)?;

    if confirm(assume_yes, input, out)? {
        promote(temp_path, baseline_path)?;
        info!(summary = %diff, "Baseline updated");
        Ok(CheckOutcome::Updated)
    } else {
        discard(temp_path)?;
        info!("Candidate discarded");
        Ok(CheckOutcome::Discarded)
    }
}

/// Ask whether to replace the baseline.
///
/// Only an exact, case-insensitive `yes` counts; the line terminator is the
/// only thing stripped. End of input is a decline.
///
/// # Errors
///
/// Returns an error if writing the prompt or reading the answer fails.
pub fn confirm(assume_yes: bool, input: &mut dyn BufRead, out: &mut dyn Write) -> Result<bool> {
    write!(out, "{PROMPT}")?;

    if assume_yes {
        writeln!(out, "yes")?;
        out.flush()?;
        return Ok(true);
    }
    out.flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer).context("Failed to read answer")? == 0 {
        writeln!(out)?;
        debug!("End of input at confirmation prompt");
        return Ok(false);
    }

    Ok(is_affirmative(&answer))
}

/// Whether a raw answer line means yes
#[must_use]
pub fn is_affirmative(line: &str) -> bool {
    let answer = line.strip_suffix('\n').unwrap_or(line);
    let answer = answer.strip_suffix('\r').unwrap_or(answer);
    answer.eq_ignore_ascii_case("yes")
}

fn read_manifest_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest {}", path.display()))
}

/// Atomically replace the baseline with the fully written candidate
fn promote(temp_path: &Path, baseline_path: &Path) -> Result<()> {
    std::fs::rename(temp_path, baseline_path).with_context(|| {
        format!(
            "Failed to move {} to {}",
            temp_path.display(),
            baseline_path.display()
        )
    })
}

fn discard(temp_path: &Path) -> Result<()> {
    match std::fs::remove_file(temp_path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => {
            Err(e).with_context(|| format!("Failed to remove {}", temp_path.display()))
        }
    }
}
