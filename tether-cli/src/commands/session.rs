//! `tether session <host>` — hold a foreground control master.
//!
//! Establish the session, print where the socket is, then block until the
//! master exits. Later `tether run` invocations against the same host find
//! the socket and skip authentication entirely.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use tether_core::HostIdentity;
use tether_session::acquire;

use super::TransportArgs;

#[derive(Args, Debug)]
pub struct SessionArgs {
    /// Remote endpoint (`host` or `user@host`).
    pub host: String,

    #[command(flatten)]
    pub transport: TransportArgs,
}

impl SessionArgs {
    pub fn run(self) -> Result<()> {
        let host = HostIdentity::from(self.host);
        let mut session = acquire(&host, &self.transport.acquire_options())
            .context("failed to establish control session")?;

        if !session.owns_master() {
            println!(
                "{} session for '{host}' already live at {}",
                "✓".green().bold(),
                session.socket_path().display()
            );
            return Ok(());
        }

        println!(
            "{} session for '{host}' established, socket at {}",
            "✓".green().bold(),
            session.socket_path().display()
        );
        println!("  Leave this running; press Ctrl-C to end the session.");

        let status = session.wait_master().context("control master wait failed")?;
        session.release();
        if let Some(status) = status {
            if !status.success() {
                tracing::warn!(%host, %status, "control master exited abnormally");
                std::process::exit(255);
            }
        }
        Ok(())
    }
}
