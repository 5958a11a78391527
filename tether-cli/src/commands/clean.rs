//! `tether clean <host>` — delete this project's remote mirror.
//!
//! Recovers from artifacts that were transmitted before a pattern landed in
//! the ignore list: remove the whole mirror, then let the next run rebuild
//! it from scratch.

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use tether_core::{config, fingerprint, HostIdentity};
use tether_session::{acquire, exec, StdoutRouting};

use super::TransportArgs;

#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Remote endpoint (`host` or `user@host`).
    pub host: String,

    #[command(flatten)]
    pub transport: TransportArgs,
}

impl CleanArgs {
    pub fn run(self) -> Result<()> {
        let cwd = std::env::current_dir().context("cannot determine working directory")?;
        let config = config::load_at(&cwd)
            .context("failed to load .tether.yml")?
            .unwrap_or_default();
        let host = HostIdentity::from(self.host);
        let fp = fingerprint::resolve(Some(&config), &fingerprint::local_hostname(), &cwd);
        let remote_path = fingerprint::remote_mirror_path(&fp);

        let mut session = acquire(&host, &self.transport.acquire_options())
            .context("failed to establish control session")?;
        // The mirror dir may already be gone, so the compound runs from `~`.
        let result = exec::run(
            &session,
            "~",
            &format!("rm -rf {remote_path}"),
            StdoutRouting::ToStderr,
        );
        session.release();

        let outcome = result.context("failed to run remote removal")?;
        if !outcome.success() {
            bail!("failed to remove '{remote_path}' (exit {})", outcome.exit_code);
        }
        println!("{} Removed {remote_path} on '{host}'", "✓".green().bold());
        Ok(())
    }
}
