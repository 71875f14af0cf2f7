//! Command implementations.
//!
//! Each command exposes a `run` function that works against injected readers
//! and writers (used by tests) and an `execute` wrapper bound to the real
//! terminal.

/// Snapshot, compare, confirm and promote
pub mod check;
/// Print the candidate manifest
pub mod show;
/// Read-only comparison against the baseline
pub mod status;

use crate::SnapshotContext;
use crate::diff::{ManifestDiff, UnifiedDiffConfig, generate_unified_diff};
use crate::output::{self, Verbosity};
use anyhow::Result;
use colored::Colorize;
use std::io::Write;

/// Print the unified diff and change summary for two manifest texts.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn present_diff(
    ctx: &SnapshotContext,
    baseline_text: &str,
    candidate_text: &str,
    diff: &ManifestDiff,
    out: &mut dyn Write,
) -> Result<()> {
    let config = UnifiedDiffConfig::from_config(&ctx.config.diff, ctx.colorize);

    generate_unified_diff(
        baseline_text,
        candidate_text,
        &ctx.config.manifest.baseline_file,
        &ctx.config.manifest.temp_file,
        &config,
        out,
    )?;

    if output::get_verbosity() == Verbosity::Verbose {
        diff.write_report(config.colorize, out)?;
    }

    let summary = format!("Summary: {diff}");
    if config.colorize {
        writeln!(out, "{}", summary.bold())?;
    } else {
        writeln!(out, "{summary}")?;
    }

    Ok(())
}

/// Headline printed when the manifests differ.
pub(crate) fn changes_banner(colorize: bool) -> String {
    let banner = "!!!!!!!!!!!!!!!!!!!!!!!!!! Changes detected !!!!!!!!!!!!!!!!!!!!!!!!!!";
    if colorize {
        banner.red().bold().to_string()
    } else {
        banner.to_string()
    }
}
