use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::{Generator, generate};
use hashcheck::cli::{Cli, Commands};
use hashcheck::output::{self, Verbosity};
use hashcheck::{SnapshotContext, commands};
use std::io::{self, IsTerminal};
use std::process;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "HASHCHECK_LOG";

fn main() {
    match run() {
        Ok(code) => process::exit(code),
        Err(e) => {
            output::error(&format!("{e:#}"));
            process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);
    output::set_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose));
    output::set_color(!cli.no_color);

    let command = cli.command.unwrap_or(Commands::Check { yes: false });

    if let Commands::Completion { shell } = command {
        print_completions(shell, &mut Cli::command());
        return Ok(0);
    }

    let mut ctx = SnapshotContext::new(cli.dir, cli.config.as_deref())?;
    ctx.colorize = !cli.no_color && ctx.config.diff.color && io::stdout().is_terminal();
    output::set_color(!cli.no_color && ctx.config.diff.color);

    match command {
        Commands::Check { yes } => {
            commands::check::execute(&ctx, yes)?;
        }
        Commands::Status { exit_code } => {
            let dirty = commands::status::execute(&ctx)?;
            if dirty && exit_code {
                return Ok(1);
            }
        }
        Commands::Show => commands::show::execute(&ctx)?,
        Commands::Completion { .. } => {}
    }

    Ok(0)
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "hashcheck=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn print_completions<G: Generator>(g: G, cmd: &mut clap::Command) {
    generate(g, cmd, cmd.get_name().to_string(), &mut io::stdout());
}
