pub mod clean;
pub mod init;
pub mod run;
pub mod session;
pub mod status;

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use tether_session::AcquireOptions;

/// Transport flags shared by every session-touching command.
#[derive(Args, Debug)]
pub struct TransportArgs {
    /// Control socket path override.
    #[arg(long, value_name = "PATH")]
    pub socket: Option<PathBuf>,

    /// Transport program spawned for the master and reused for every exec.
    #[arg(long, value_name = "PROG", default_value = "ssh")]
    pub ssh_program: String,

    /// Seconds to wait for the control socket to appear.
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    pub connect_timeout: u64,
}

impl TransportArgs {
    pub fn acquire_options(&self) -> AcquireOptions {
        AcquireOptions {
            ssh_program: self.ssh_program.clone(),
            socket_path: self.socket.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout),
        }
    }
}
