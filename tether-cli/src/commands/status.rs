//! `tether status <host>` — where things are and whether a session is live.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use tether_core::{config, fingerprint, HostIdentity};
use tether_session::paths;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Remote endpoint (`host` or `user@host`).
    pub host: String,

    /// Control socket path override.
    #[arg(long, value_name = "PATH")]
    pub socket: Option<PathBuf>,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct StatusReport {
    host: String,
    fingerprint: String,
    remote_path: String,
    socket_path: String,
    session_live: bool,
    config_present: bool,
}

impl StatusArgs {
    pub fn run(self) -> Result<()> {
        let cwd = std::env::current_dir().context("cannot determine working directory")?;
        let config = config::load_at(&cwd).context("failed to load .tether.yml")?;
        let host = HostIdentity::from(self.host);
        let fp = fingerprint::resolve(config.as_ref(), &fingerprint::local_hostname(), &cwd);
        let socket_path = match self.socket {
            Some(path) => path,
            None => paths::default_socket_path(&host).context("cannot derive socket path")?,
        };

        let report = StatusReport {
            host: host.to_string(),
            fingerprint: fp.to_string(),
            remote_path: fingerprint::remote_mirror_path(&fp),
            socket_path: socket_path.display().to_string(),
            session_live: socket_path.exists(),
            config_present: config.is_some(),
        };

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to serialize status")?
            );
            return Ok(());
        }

        print_human(&report);
        Ok(())
    }
}

fn print_human(report: &StatusReport) {
    println!("tether v{} | host '{}'", env!("CARGO_PKG_VERSION"), report.host);
    println!("  fingerprint  {}", report.fingerprint);
    println!("  remote path  {}", report.remote_path);

    let liveness = if report.session_live {
        "live".green().bold().to_string()
    } else {
        "absent".bright_black().to_string()
    };
    println!("  socket       {} ({liveness})", report.socket_path);

    let presence = if report.config_present {
        "present".green().to_string()
    } else {
        "none".bright_black().to_string()
    };
    println!("  config       {} ({presence})", config::CONFIG_FILE_NAME);

    if !report.session_live {
        println!("Run 'tether session {}' to hold a connection open.", report.host);
    }
}
