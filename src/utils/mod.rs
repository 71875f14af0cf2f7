//! Utility functions and helpers.
//!
//! - [`hash`]: streaming content digests
//! - [`paths`]: manifest path rendering and lossy UTF-8 decoding
//!
//! # Examples
//!
//! ```
//! use hashcheck::utils::hash::hash_bytes;
//!
//! let digest = hash_bytes(b"hello");
//! assert_eq!(digest.len(), 32);
//! ```

/// Streaming MD5 and XXH3-128 content hashing
pub mod hash;
/// Manifest path rendering
pub mod paths;

use anyhow::{Context, Result};
use glob::Pattern;
use std::path::Path;

/// Compile ignore patterns from configuration.
///
/// # Errors
///
/// Returns an error if any pattern is not a valid glob.
pub fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| Pattern::new(p).with_context(|| format!("Invalid ignore pattern: {p}")))
        .collect()
}

/// Determines if a root-relative path should be ignored.
///
/// A pattern matches either the whole relative path or any single component,
/// so `*.log` skips log files at every depth and `target` prunes every
/// directory of that name.
#[must_use]
pub fn should_ignore(path: &Path, patterns: &[Pattern]) -> bool {
    if patterns.is_empty() {
        return false;
    }

    let path_str = path.to_string_lossy();

    patterns.iter().any(|pattern| {
        pattern.matches(&path_str)
            || path
                .components()
                .any(|c| pattern.matches(&c.as_os_str().to_string_lossy()))
    })
}
