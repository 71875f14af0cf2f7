//! Manifest comparison and diff presentation.
//!
//! Detection and display are separate:
//! - [`compare`] decides whether two manifests differ and lists the affected paths
//! - [`unified`] renders the line-level unified diff shown to the user

/// Manifest comparison with per-path breakdown
pub mod compare;
/// Unified diff generation for text files
pub mod unified;

pub use compare::{ManifestDiff, RecordChange, compare_manifests};
pub use unified::{UnifiedDiffConfig, generate_unified_diff};

use crate::config::{DiffAlgorithm, DiffConfig};
use similar::Algorithm;

/// Convert `DiffAlgorithm` config enum to `similar::Algorithm`
#[must_use]
pub const fn config_to_algorithm(algo: DiffAlgorithm) -> Algorithm {
    match algo {
        DiffAlgorithm::Myers => Algorithm::Myers,
        DiffAlgorithm::Patience => Algorithm::Patience,
    }
}

impl UnifiedDiffConfig {
    /// Build from the `[diff]` configuration section
    #[must_use]
    pub const fn from_config(config: &DiffConfig, colorize: bool) -> Self {
        Self {
            context_lines: config.context_lines,
            algorithm: config_to_algorithm(config.algorithm),
            colorize: colorize && config.color,
        }
    }
}
