//! Pull scanner splitting a memento into `(sigil, raw payload)` tokens.

use crate::error::Result;
use crate::escape::unescape;
use crate::sigil::Sigil;

/// One sigil and the raw payload up to the next unescaped sigil.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// `None` only for text preceding the first sigil of the input.
    pub sigil: Option<Sigil>,
    /// Payload with its escapes intact.
    pub raw: &'a str,
    /// Byte offset of the token (its sigil) in the input.
    pub offset: usize,
}

impl<'a> Token<'a> {
    #[inline]
    pub fn is(&self, sigil: Sigil) -> bool {
        self.sigil == Some(sigil)
    }

    pub fn unescaped(&self) -> Result<String> {
        unescape(self.raw)
    }
}

/// Splits a memento at unescaped sigils without building any intermediate tree.
///
/// Never fails: escapes are validated only when a payload is unescaped, and a truncated input
/// just ends the iteration.
#[derive(Debug, Clone)]
pub struct MementoTokenizer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> MementoTokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// The unconsumed part of the input.
    pub fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn sigil_at(&self, at: usize) -> Option<(Sigil, usize)> {
        let bytes = self.input.as_bytes();
        let sigil = Sigil::from_byte(*bytes.get(at)?)?;
        // `=/` opens a classpath attribute block; at the very start `=` is always the project.
        if sigil == Sigil::Project && at > 0 && bytes.get(at + 1) == Some(&b'/') {
            return Some((Sigil::ClasspathAttribute, 2));
        }
        Some((sigil, 1))
    }
}

impl<'a> Iterator for MementoTokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if self.pos >= self.input.len() {
            return None;
        }

        let offset = self.pos;
        let sigil = match self.sigil_at(offset) {
            Some((sigil, width)) => {
                self.pos += width;
                Some(sigil)
            }
            None => None,
        };

        // All sigils are ASCII, so scanning bytes never splits a UTF-8 sequence at a boundary we
        // slice on.
        let bytes = self.input.as_bytes();
        let start = self.pos;
        let mut end = start;
        while end < bytes.len() {
            let b = bytes[end];
            if b == b'\\' {
                end += 2;
                continue;
            }
            if Sigil::from_byte(b).is_some() {
                break;
            }
            end += 1;
        }
        let end = end.min(bytes.len());

        self.pos = end;
        Some(Token {
            sigil,
            raw: &self.input[start..end],
            offset,
        })
    }
}
