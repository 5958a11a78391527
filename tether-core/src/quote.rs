//! POSIX shell backslash-quoting.
//!
//! Remote commands travel as one word inside `bash -lc <word>`; the word
//! must parse back to exactly the string we built locally. This module
//! reproduces the backslash-quoting character set of bash 5.0: every
//! character below code point 128 that bash's own quoter escapes gets a
//! preceding backslash, everything else is copied verbatim.
//!
//! Bytes above 127 (i.e. all multi-byte UTF-8) pass through unescaped;
//! none of them are special to the shell.

/// Characters that must be preceded by a backslash to survive word
/// splitting and expansion. Matches the bash 5.0 set: tab, newline, space,
/// `! " $ & ' ( ) * , ; < > ? [ \ ] ^` backtick `{ | }`.
const BACKSLASH_SET: &[u8] = b"\t\n !\"$&'()*,;<>?[\\]^`{|}";

/// Quote `input` as a single shell word.
///
/// The empty string becomes `''`, the shortest spelling of an empty word a
/// POSIX shell accepts.
pub fn backslash_quote(input: &str) -> String {
    if input.is_empty() {
        return "''".to_string();
    }

    let mut out = String::with_capacity(input.len() * 2);
    for c in input.chars() {
        if c.is_ascii() && BACKSLASH_SET.contains(&(c as u8)) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
