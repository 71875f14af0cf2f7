use crate::SnapshotContext;
use crate::commands::{changes_banner, present_diff};
use crate::diff::{ManifestDiff, compare_manifests};
use crate::output;
use anyhow::{Context, Result};
use std::io::{self, Write};

/// Result of a read-only comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusOutcome {
    /// There is no baseline to compare against
    NoBaseline,
    /// The tree matches the baseline
    Clean,
    /// The tree differs from the baseline
    Dirty(ManifestDiff),
}

/// Compare the tree against the baseline and print the result.
///
/// Returns `true` when differences were found.
///
/// # Errors
///
/// Returns an error if any file cannot be read or the baseline is corrupt.
pub fn execute(ctx: &SnapshotContext) -> Result<bool> {
    let mut stdout = io::stdout().lock();
    let outcome = run(ctx, &mut stdout)?;
    drop(stdout);

    match &outcome {
        StatusOutcome::NoBaseline => output::status(&format!(
            "No hash file found ({}); run `hashcheck check` to create one",
            ctx.config.manifest.baseline_file
        )),
        StatusOutcome::Clean => output::status("No changes detected"),
        StatusOutcome::Dirty(diff) => {
            output::status(&format!("{} path(s) differ from the hash file", diff.change_count()));
        }
    }

    Ok(matches!(outcome, StatusOutcome::Dirty(_)))
}

/// Compare a fresh candidate against the baseline without writing any file.
///
/// # Errors
///
/// Returns an error if any file cannot be read or the baseline is corrupt.
pub fn run(ctx: &SnapshotContext, out: &mut dyn Write) -> Result<StatusOutcome> {
    ctx.recover_interrupted_run()?;

    let baseline_path = ctx.baseline_path();
    if !baseline_path.exists() {
        return Ok(StatusOutcome::NoBaseline);
    }

    let candidate_text = ctx.build_candidate()?.render();
    let baseline_text = std::fs::read_to_string(&baseline_path)
        .with_context(|| format!("Failed to read manifest {}", baseline_path.display()))?;

    let diff = compare_manifests(&baseline_text, &candidate_text)
        .with_context(|| format!("Cannot compare against {}", baseline_path.display()))?;

    if diff.is_identical() {
        return Ok(StatusOutcome::Clean);
    }

    writeln!(out, "{}", changes_banner(ctx.colorize))?;
    present_diff(ctx, &baseline_text, &candidate_text, &diff, out)?;

    Ok(StatusOutcome::Dirty(diff))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::check;
    use crate::config::Config;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn test_status_is_read_only() -> Result<()> {
        let dir = TempDir::new()?;
        let ctx = SnapshotContext::with_config(dir.path().to_path_buf(), Config::default());

        let mut out = Vec::new();
        assert_eq!(run(&ctx, &mut out)?, StatusOutcome::NoBaseline);
        assert!(!ctx.baseline_path().exists());

        fs::write(dir.path().join("a"), "a")?;
        check::run(&ctx, false, &mut Cursor::new(Vec::new()), &mut Vec::new())?;
        assert_eq!(run(&ctx, &mut out)?, StatusOutcome::Clean);

        let before = fs::read(ctx.baseline_path())?;
        fs::write(dir.path().join("a"), "changed")?;

        match run(&ctx, &mut out)? {
            StatusOutcome::Dirty(diff) => {
                assert_eq!(diff.changed.len(), 1);
                assert!(diff.changed[0].content_changed());
            }
            other => panic!("expected differences, got {other:?}"),
        }

        assert_eq!(fs::read(ctx.baseline_path())?, before);
        assert!(!ctx.temp_path().exists());
        Ok(())
    }
}
