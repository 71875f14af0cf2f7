//! Command-line interface definitions for hashcheck.
//!
//! The definitions are shared between the main binary and xtask (for man page
//! generation).
//!
//! Note: Field-level documentation is provided via clap attributes, so we
//! allow missing_docs for this module to avoid redundant documentation.

#![allow(missing_docs)]

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Main CLI structure for hashcheck.
#[derive(Parser)]
#[command(
    name = "hashcheck",
    version = crate::VERSION,
    about = "Detect changes in a directory tree using a hash manifest",
    long_about = "Records the modification time and content hash of every file below a \
                  directory in a hidden manifest, and on later runs reports any difference \
                  and offers to update the manifest."
)]
pub struct Cli {
    /// Subcommand to execute (defaults to `check`)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory to snapshot (defaults to the current directory)
    #[arg(short = 'C', long = "dir", global = true, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Configuration file to use
    #[arg(
        short,
        long,
        global = true,
        value_name = "PATH",
        env = "HASHCHECK_CONFIG_PATH"
    )]
    pub config: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

/// All available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Create the hash file, or compare against it and offer to update it
    Check {
        /// Replace the hash file without asking when changes are found
        #[arg(short, long)]
        yes: bool,
    },

    /// Compare against the hash file without writing anything
    Status {
        /// Exit with status 1 when changes are found
        #[arg(long)]
        exit_code: bool,
    },

    /// Print the manifest for the current tree without writing anything
    Show,

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
