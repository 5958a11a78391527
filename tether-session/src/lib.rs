//! Persistent control sessions and remote execution.
//!
//! One authenticated `ssh -M` connection per host, represented by a control
//! socket file; every remote command and transfer multiplexes over it. The
//! [`manager`] module owns the master's lifecycle, [`exec`] runs commands
//! through an established session.

mod error;
pub mod exec;
pub mod manager;
pub mod paths;

pub use error::SessionError;
pub use exec::{
    classify, run, run_captured, CapturedOutput, ExecClass, ExecOutcome, StdoutRouting,
};
pub use manager::{acquire, AcquireOptions, Session};
