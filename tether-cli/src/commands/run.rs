//! `tether run <host> [--] [command...]` — the full sync-and-execute pass.
//!
//! Acquire a session, mirror the project, run `on change` hooks when the
//! sync changed anything, run the user command (or open an interactive
//! session when none was given), optionally pull artifacts back, release.
//! The session is released on every path; the remote command's exit code
//! becomes this process's exit code.

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Args;

use tether_core::config::{self, ProjectConfig};
use tether_core::{fingerprint, Fingerprint, HostIdentity};
use tether_session::{acquire, exec, ExecClass, ExecOutcome, Session, StdoutRouting};
use tether_sync::{copy_back, mirror, registry, SyncOptions};

use super::TransportArgs;

/// Sync, hooks, command, optional copy-back. One session for the lot.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Remote endpoint (`host` or `user@host`).
    pub host: String,

    /// Command to run in the remote mirror, after `--`. Empty opens an
    /// interactive session there.
    #[arg(last = true)]
    pub command: Vec<String>,

    /// Remote path (relative to the mirror root) to pull back into
    /// `copyback-<host>/` after the command; repeatable.
    #[arg(long = "copy-back", value_name = "PATH")]
    pub copy_back: Vec<String>,

    /// Fail immediately on a missing destination parent instead of
    /// creating it and retrying once.
    #[arg(long)]
    pub no_mkdir_retry: bool,

    /// Open an interactive session when the remote shell cannot find the
    /// command (exit 127).
    #[arg(long)]
    pub shell_on_unknown: bool,

    /// Transfer program for the mirror passes.
    #[arg(long, value_name = "PROG", default_value = "rsync")]
    pub rsync_program: String,

    #[command(flatten)]
    pub transport: TransportArgs,
}

impl RunArgs {
    pub fn run(self) -> Result<()> {
        let cwd = std::env::current_dir().context("cannot determine working directory")?;
        let config = config::load_at(&cwd)
            .context("failed to load .tether.yml")?
            .unwrap_or_default();

        let host = HostIdentity::from(self.host.clone());
        let fp = fingerprint::resolve(Some(&config), &fingerprint::local_hostname(), &cwd);
        let remote_path = fingerprint::remote_mirror_path(&fp);
        tracing::debug!(%host, %fp, %remote_path, "resolved project mirror");

        let sync_options = SyncOptions {
            rsync_program: self.rsync_program.clone(),
            mkdir_retry: !self.no_mkdir_retry,
        };

        let mut session = acquire(&host, &self.transport.acquire_options())
            .context("failed to establish control session")?;
        let result = drive(&self, &session, &config, &cwd, &fp, &remote_path, &sync_options);
        session.release();

        let outcome = result?;
        if !outcome.success() {
            tracing::warn!(exit_code = outcome.exit_code, "remote command failed");
            std::process::exit(outcome.exit_code);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Orchestration
// ---------------------------------------------------------------------------

/// Everything between acquire and release. Errors bubble out so the caller
/// can release before reporting them.
fn drive(
    args: &RunArgs,
    session: &Session,
    config: &ProjectConfig,
    cwd: &Path,
    fp: &Fingerprint,
    remote_path: &str,
    sync_options: &SyncOptions,
) -> Result<ExecOutcome> {
    let sync = mirror(session, cwd, remote_path, &config.ignore, sync_options)
        .context("mirror sync failed")?;
    if sync.first_creation {
        registry::record(session, fp, cwd)
            .context("failed to record the new mirror in the remote registry")?;
    }

    if sync.changed_files {
        run_hooks(session, remote_path, &config.on_change)?;
    } else if !config.on_change.is_empty() {
        tracing::debug!("no changes, skipping on-change hooks");
    }

    let command = args.command.join(" ");
    let mut outcome = exec::run(session, remote_path, &command, StdoutRouting::Inherit)
        .context("failed to run remote command")?;
    if !command.is_empty()
        && outcome.class == ExecClass::RemoteUnknownCommand
        && args.shell_on_unknown
    {
        tracing::warn!(%command, "remote command unknown, opening a session instead");
        outcome = exec::run(session, remote_path, "", StdoutRouting::Inherit)
            .context("failed to open interactive session")?;
    }

    if !args.copy_back.is_empty() {
        let dest = cwd.join(format!("copyback-{}", session.host()));
        copy_back(session, remote_path, &args.copy_back, &dest, sync_options)
            .context("copy-back failed")?;
    }

    Ok(outcome)
}

fn run_hooks(session: &Session, remote_path: &str, hooks: &[String]) -> Result<()> {
    for hook in hooks {
        tracing::info!(command = %hook, "running on-change hook");
        let outcome = exec::run(session, remote_path, hook, StdoutRouting::ToStderr)
            .with_context(|| format!("failed to run hook '{hook}'"))?;
        if !outcome.success() {
            bail!("hook '{hook}' failed with exit code {}", outcome.exit_code);
        }
    }
    Ok(())
}
