//! Tether — mirror a project onto a remote host and run commands there,
//! reusing one authenticated connection per host.
//!
//! # Usage
//!
//! ```text
//! tether run <host> [--copy-back <path>]... [--] [command...]
//! tether session <host>
//! tether init
//! tether clean <host>
//! tether status <host> [--json]
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    clean::CleanArgs, init::InitArgs, run::RunArgs, session::SessionArgs, status::StatusArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "tether",
    version,
    about = "Mirror a project to a remote host and run commands there",
    long_about = None,
)]
struct Cli {
    /// Force debug-level logging. `TETHER_LOG` still wins when set.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sync the project to the host, run hooks, then run a command there.
    Run(RunArgs),

    /// Hold a foreground control master for later invocations to reuse.
    Session(SessionArgs),

    /// Write a starter .tether.yml into the current directory.
    Init(InitArgs),

    /// Delete this project's mirror on the remote host.
    Clean(CleanArgs),

    /// Show fingerprint, paths, and session liveness for a host.
    Status(StatusArgs),
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// All diagnostics go to stderr; stdout belongs to the remote command.
fn init_tracing(debug: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let fallback = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env("TETHER_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);
    match cli.command {
        Commands::Run(args) => args.run(),
        Commands::Session(args) => args.run(),
        Commands::Init(args) => args.run(),
        Commands::Clean(args) => args.run(),
        Commands::Status(args) => args.run(),
    }
}
