//! Change-aware mirroring of a local tree onto a remote host.
//!
//! The transfer itself is delegated to the external delta-transfer tool,
//! pointed at an established control session. This crate interprets the
//! tool's streams: the itemized change report on stdout drives hook
//! triggering and first-creation detection, the error text on stderr
//! drives the single missing-parent retry.

pub mod classify;
mod error;
pub mod mirror;
pub mod registry;
pub mod report;

pub use error::SyncError;
pub use mirror::{copy_back, mirror, SyncOptions, SyncOutcome};
