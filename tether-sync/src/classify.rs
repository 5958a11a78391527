//! Transfer failure classification.
//!
//! The transfer tool reports failures as free text. The one class we react
//! to is "the destination's parent directory does not exist", which the
//! receiving side reports as a failed mkdir. Substring matching on tool
//! output is fragile across versions and locales, so it lives behind this
//! one function and nothing else in the workspace inspects the text.

/// True when `stderr` reports the destination parent missing.
pub fn is_missing_parent(stderr: &str) -> bool {
    stderr.contains("mkdir") && stderr.contains("No such file or directory")
}
