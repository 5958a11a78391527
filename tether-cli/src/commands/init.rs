//! `tether init` — drop a starter config into the project.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use tether_core::config;

#[derive(Args, Debug)]
pub struct InitArgs {}

impl InitArgs {
    pub fn run(self) -> Result<()> {
        let cwd = std::env::current_dir().context("cannot determine working directory")?;
        let path = config::write_starter_at(&cwd)
            .with_context(|| format!("cannot write {}", config::CONFIG_FILE_NAME))?;

        println!("{} Wrote {}", "✓".green().bold(), path.display());
        println!("  Edit the ignore and 'on change' lists, then `tether run <host>`.");
        Ok(())
    }
}
