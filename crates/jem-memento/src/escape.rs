//! Reversible escaping of reserved characters inside raw payloads.

use crate::error::{MementoError, Result};
use crate::sigil::{is_reserved, ESCAPE};

/// Escapes every reserved character of `raw`.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    escape_into(&mut out, raw);
    out
}

pub fn escape_into(buf: &mut String, raw: &str) {
    for c in raw.chars() {
        if is_reserved(c) {
            buf.push(ESCAPE);
        }
        buf.push(c);
    }
}

/// Inverse of [`escape`].
///
/// An escape character may precede any character (not only reserved ones); the only failure is
/// an escape character with nothing after it.
pub fn unescape(token: &str) -> Result<String> {
    if !token.contains(ESCAPE) {
        return Ok(token.to_owned());
    }

    let mut out = String::with_capacity(token.len());
    let mut chars = token.chars();
    while let Some(c) = chars.next() {
        if c != ESCAPE {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(escaped) => out.push(escaped),
            None => return Err(MementoError::DanglingEscape),
        }
    }
    Ok(out)
}
