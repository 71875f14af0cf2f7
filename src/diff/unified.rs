use anyhow::Result;
use colored::Colorize;
use similar::{Algorithm, ChangeTag, TextDiff};
use std::io::Write;
use tracing::{Level, info, span};

/// Configuration for unified diff generation
pub struct UnifiedDiffConfig {
    /// Number of context lines around changes (0 shows changed lines only)
    pub context_lines: usize,
    /// Diff algorithm to use (Myers, Patience)
    pub algorithm: Algorithm,
    /// Whether to colorize the output
    pub colorize: bool,
}

/// Generate a unified diff between two manifest texts.
///
/// Produces `diff -u`-style output:
/// - File headers (`--- old` and `+++ new`)
/// - Hunk headers (`@@ -10,7 +10,9 @@`)
/// - Context lines (unchanged, prefixed with space)
/// - Deletion lines (prefixed with `-`, colored red)
/// - Addition lines (prefixed with `+`, colored green)
///
/// Returns the number of inserted plus deleted lines.
///
/// # Errors
///
/// Returns an error if writing to the output writer fails.
pub fn generate_unified_diff(
    old_content: &str,
    new_content: &str,
    old_label: &str,
    new_label: &str,
    config: &UnifiedDiffConfig,
    writer: &mut dyn Write,
) -> Result<usize> {
    let span = span!(
        Level::DEBUG,
        "diff_generation",
        old = old_label,
        new = new_label,
        algorithm = ?config.algorithm,
        context = config.context_lines
    );
    let _guard = span.enter();

    let diff = TextDiff::configure()
        .algorithm(config.algorithm)
        .diff_lines(old_content, new_content);

    let old_header = format!("--- {old_label}");
    let new_header = format!("+++ {new_label}");

    if config.colorize {
        writeln!(writer, "{}", old_header.red())?;
        writeln!(writer, "{}", new_header.green())?;
    } else {
        writeln!(writer, "{old_header}")?;
        writeln!(writer, "{new_header}")?;
    }

    let mut total_changes = 0;

    for hunk in diff
        .unified_diff()
        .context_radius(config.context_lines)
        .iter_hunks()
    {
        let hunk_header = hunk.header().to_string();

        if config.colorize {
            writeln!(writer, "{}", hunk_header.cyan())?;
        } else {
            writeln!(writer, "{hunk_header}")?;
        }

        for change in hunk.iter_changes() {
            let line = change.value().trim_end_matches(['\n', '\r']);

            match change.tag() {
                ChangeTag::Delete => {
                    total_changes += 1;
                    let line = format!("-{line}");
                    if config.colorize {
                        writeln!(writer, "{}", line.red())?;
                    } else {
                        writeln!(writer, "{line}")?;
                    }
                }
                ChangeTag::Insert => {
                    total_changes += 1;
                    let line = format!("+{line}");
                    if config.colorize {
                        writeln!(writer, "{}", line.green())?;
                    } else {
                        writeln!(writer, "{line}")?;
                    }
                }
                ChangeTag::Equal => writeln!(writer, " {line}")?,
            }
        }
    }

    info!(changes = total_changes, "Diff generation complete");

    Ok(total_changes)
}
