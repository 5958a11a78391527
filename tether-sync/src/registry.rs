//! Remote-side registry of mirrors.
//!
//! Every successful first sync appends one line to `~/.tether/registry` on
//! the remote host so a later `clean` or an operator can map a fingerprint
//! back to the local root it came from. Records are tab-separated and
//! append-only; nothing ever reads them back on this side.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use tether_core::quote::backslash_quote;
use tether_core::Fingerprint;
use tether_session::{exec, Session, StdoutRouting};

use crate::error::SyncError;

/// Registry file under the remote mirror root.
pub const REGISTRY_FILE: &str = "~/.tether/registry";

/// `<fingerprint>\t<local_root>\t<rfc3339>`.
fn format_record(fingerprint: &Fingerprint, local_root: &Path, timestamp: DateTime<Utc>) -> String {
    format!(
        "{fingerprint}\t{}\t{}",
        local_root.display(),
        timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
    )
}

/// Remote command that appends one record. The record is quoted for the
/// remote login shell; the transport layer quotes the whole compound again,
/// so the bytes land in the file exactly as formatted.
fn append_command(fingerprint: &Fingerprint, local_root: &Path, timestamp: DateTime<Utc>) -> String {
    let record = format_record(fingerprint, local_root, timestamp);
    format!("printf '%s\\n' {} >> {REGISTRY_FILE}", backslash_quote(&record))
}

/// Append a registry record with an explicit timestamp.
pub fn record_at(
    session: &Session,
    fingerprint: &Fingerprint,
    local_root: &Path,
    timestamp: DateTime<Utc>,
) -> Result<(), SyncError> {
    let command = append_command(fingerprint, local_root, timestamp);
    let outcome = exec::run(session, "~", &command, StdoutRouting::ToStderr)?;
    if !outcome.success() {
        return Err(SyncError::Remote {
            action: "registry append",
            exit_code: outcome.exit_code,
        });
    }
    tracing::debug!(%fingerprint, "registry record appended");
    Ok(())
}

/// Append a registry record stamped with the current time.
pub fn record(
    session: &Session,
    fingerprint: &Fingerprint,
    local_root: &Path,
) -> Result<(), SyncError> {
    record_at(session, fingerprint, local_root, Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fp() -> Fingerprint {
        Fingerprint::from("AB12CD34EF561122")
    }

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 25, 9, 30, 0).unwrap()
    }

    #[test]
    fn record_is_tab_separated_rfc3339() {
        let record = format_record(&fp(), Path::new("/home/alice/proj"), ts());
        assert_eq!(record, "AB12CD34EF561122\t/home/alice/proj\t2026-08-25T09:30:00Z");
    }

    #[test]
    fn append_command_quotes_record_for_remote_shell() {
        let command = append_command(&fp(), Path::new("/home/alice/proj"), ts());
        assert!(command.starts_with("printf '%s\\n' "));
        assert!(command.ends_with(" >> ~/.tether/registry"));
        // Tabs inside the record are escaped so the remote shell keeps them.
        assert!(command.contains("AB12CD34EF561122\\\t/home/alice/proj"));
    }

    #[test]
    fn append_command_escapes_spaced_roots() {
        let command = append_command(&fp(), Path::new("/home/alice/my proj"), ts());
        assert!(command.contains("my\\ proj"));
    }
}
