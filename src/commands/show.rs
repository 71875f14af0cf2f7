use crate::SnapshotContext;
use anyhow::Result;
use std::io::{self, Write};

/// Print the manifest the current tree would produce.
///
/// # Errors
///
/// Returns an error if any file cannot be read.
pub fn execute(ctx: &SnapshotContext) -> Result<()> {
    let mut stdout = io::stdout().lock();
    run(ctx, &mut stdout)?;
    Ok(())
}

/// Write the candidate manifest text to `out` without touching any file.
///
/// Returns the number of records written.
///
/// # Errors
///
/// Returns an error if any file cannot be read or writing fails.
pub fn run(ctx: &SnapshotContext, out: &mut dyn Write) -> Result<usize> {
    ctx.recover_interrupted_run()?;

    let manifest = ctx.build_candidate()?;
    out.write_all(manifest.render().as_bytes())?;
    out.flush()?;

    Ok(manifest.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_show_prints_manifest_without_writing() -> Result<()> {
        let dir = TempDir::new()?;
        fs::write(dir.path().join("z"), "z")?;
        fs::write(dir.path().join("a"), "a")?;
        let ctx = SnapshotContext::with_config(dir.path().to_path_buf(), Config::default());

        let mut out = Vec::new();
        let count = run(&ctx, &mut out)?;
        let text = String::from_utf8(out)?;

        assert_eq!(count, 2);
        let paths: Vec<&str> = text.lines().filter_map(|l| l.rsplit(' ').next()).collect();
        assert_eq!(paths, vec!["./a", "./z"]);
        assert!(!ctx.baseline_path().exists());
        assert!(!ctx.temp_path().exists());
        Ok(())
    }
}
