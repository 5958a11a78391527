//! Itemized transfer report interpretation.
//!
//! With itemized changes requested, the transfer tool prints one line per
//! changed entry and nothing at all when the trees already match, so "any
//! output" is the change signal. Each line starts with an 11-column flags
//! field; a brand-new entry shows `+` in every attribute column, and the
//! destination root itself appears as `./`. The root-creation record is
//! the only reliable sign that the mirror directory did not exist before
//! this transfer.

/// True when the report holds at least one change record.
pub fn has_changes(report: &str) -> bool {
    !report.trim().is_empty()
}

/// True when `line` records the creation of the destination root itself
/// (a directory-creation flags field naming `./`).
pub fn is_root_creation_line(line: &str) -> bool {
    let mut fields = line.split_whitespace();
    let (Some(flags), Some(name)) = (fields.next(), fields.next()) else {
        return false;
    };
    let attrs = match flags.strip_prefix("cd") {
        Some(rest) => rest,
        None => return false,
    };
    !attrs.is_empty() && attrs.bytes().all(|b| b == b'+') && name == "./"
}

/// True when any line of `report` is the root-creation record.
pub fn saw_root_creation(report: &str) -> bool {
    report.lines().any(is_root_creation_line)
}

/// Number of change records, for summary logging.
pub fn entry_count(report: &str) -> usize {
    report.lines().filter(|line| !line.trim().is_empty()).count()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
