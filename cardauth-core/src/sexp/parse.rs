//! Recursive-descent parser for canonical and advanced S-expressions.
//!
//! Grammar:
//!
//! ```text
//! document := ws* list ws*
//! list     := '(' ws* (value ws*)* ')'
//! value    := list | atom
//! atom     := DIGITS ':' RAW{DIGITS}
//!           | TOKEN
//!           | '#' HEXDIGITS '#'
//!           | '"' QUOTED '"'
//!           | '|' BASE64 '|'
//! ```

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::{Sexp, SexpError, MAX_DEPTH};

/// Characters allowed inside a bare token, besides ASCII alphanumerics.
const TOKEN_PUNCTUATION: &[u8] = b"-./_:*+=";

pub(super) fn is_token_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || TOKEN_PUNCTUATION.contains(&byte)
}

pub(super) fn is_token_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || TOKEN_PUNCTUATION.contains(&byte)
}

pub(super) struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    pub(super) fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    pub(super) fn parse_document(mut self) -> Result<Sexp, SexpError> {
        self.skip_whitespace();
        match self.peek() {
            None => return Err(SexpError::Empty),
            Some(b'(') => {}
            Some(byte) => {
                return Err(SexpError::UnexpectedByte {
                    offset: self.pos,
                    byte,
                })
            }
        }

        let value = self.parse_list(1)?;

        self.skip_whitespace();
        if self.pos != self.input.len() {
            return Err(SexpError::TrailingData { offset: self.pos });
        }
        Ok(value)
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn unexpected_end(&self) -> SexpError {
        SexpError::UnexpectedEnd {
            offset: self.input.len(),
        }
    }

    /// Parse a list; the cursor sits on its opening parenthesis.
    fn parse_list(&mut self, depth: usize) -> Result<Sexp, SexpError> {
        if depth > MAX_DEPTH {
            return Err(SexpError::TooDeep { max: MAX_DEPTH });
        }
        self.pos += 1;

        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(self.unexpected_end()),
                Some(b')') => {
                    self.pos += 1;
                    return Ok(Sexp::List(items));
                }
                Some(b'(') => items.push(self.parse_list(depth + 1)?),
                Some(_) => items.push(self.parse_atom()?),
            }
        }
    }

    fn parse_atom(&mut self) -> Result<Sexp, SexpError> {
        let offset = self.pos;
        let bytes = match self.input[offset] {
            b'0'..=b'9' => self.parse_length_prefixed()?,
            b'#' => self.parse_hex()?,
            b'"' => self.parse_quoted()?,
            b'|' => self.parse_base64()?,
            byte if is_token_start(byte) => self.parse_token(),
            byte => return Err(SexpError::UnexpectedByte { offset, byte }),
        };
        Ok(Sexp::Atom(bytes))
    }

    fn parse_length_prefixed(&mut self) -> Result<Vec<u8>, SexpError> {
        let start = self.pos;
        let mut len: usize = 0;
        while let Some(digit @ b'0'..=b'9') = self.peek() {
            len = len
                .checked_mul(10)
                .and_then(|l| l.checked_add(usize::from(digit - b'0')))
                .ok_or(SexpError::InvalidLength { offset: start })?;
            self.pos += 1;
        }

        if self.peek() != Some(b':') {
            return Err(SexpError::InvalidLength { offset: start });
        }
        self.pos += 1;

        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.input.len())
            .ok_or_else(|| self.unexpected_end())?;
        let bytes = self.input[self.pos..end].to_vec();
        self.pos = end;
        Ok(bytes)
    }

    fn parse_token(&mut self) -> Vec<u8> {
        let start = self.pos;
        while self.peek().is_some_and(is_token_byte) {
            self.pos += 1;
        }
        self.input[start..self.pos].to_vec()
    }

    /// Collect the body of a `delim ... delim` atom with whitespace removed.
    fn delimited_body(&mut self, delim: u8) -> Result<Vec<u8>, SexpError> {
        self.pos += 1;
        let mut body = Vec::new();
        loop {
            match self.peek() {
                None => return Err(self.unexpected_end()),
                Some(b) if b == delim => {
                    self.pos += 1;
                    return Ok(body);
                }
                Some(b) if b.is_ascii_whitespace() => {}
                Some(b) => body.push(b),
            }
            self.pos += 1;
        }
    }

    fn parse_hex(&mut self) -> Result<Vec<u8>, SexpError> {
        let offset = self.pos;
        let body = self.delimited_body(b'#')?;
        hex::decode(body).map_err(|_| SexpError::InvalidHex { offset })
    }

    fn parse_base64(&mut self) -> Result<Vec<u8>, SexpError> {
        let offset = self.pos;
        let body = self.delimited_body(b'|')?;
        STANDARD
            .decode(body)
            .map_err(|_| SexpError::InvalidBase64 { offset })
    }

    fn parse_quoted(&mut self) -> Result<Vec<u8>, SexpError> {
        self.pos += 1;
        let mut bytes = Vec::new();
        loop {
            let byte = self.peek().ok_or_else(|| self.unexpected_end())?;
            self.pos += 1;
            match byte {
                b'"' => return Ok(bytes),
                b'\\' => self.parse_escape(&mut bytes)?,
                byte => bytes.push(byte),
            }
        }
    }

    /// Decode one escape inside a quoted string; the cursor sits just past
    /// the backslash. Line continuations produce no bytes.
    fn parse_escape(&mut self, bytes: &mut Vec<u8>) -> Result<(), SexpError> {
        let offset = self.pos;
        let escaped = self.peek().ok_or_else(|| self.unexpected_end())?;
        self.pos += 1;
        match escaped {
            b'n' => bytes.push(b'\n'),
            b'r' => bytes.push(b'\r'),
            b't' => bytes.push(b'\t'),
            b'b' => bytes.push(0x08),
            b'f' => bytes.push(0x0c),
            b'v' => bytes.push(0x0b),
            b'"' | b'\'' | b'\\' => bytes.push(escaped),
            b'0'..=b'7' => {
                let mut value = u16::from(escaped - b'0');
                for _ in 0..2 {
                    let digit = self.peek().ok_or_else(|| self.unexpected_end())?;
                    if !(b'0'..=b'7').contains(&digit) {
                        return Err(SexpError::UnexpectedByte {
                            offset: self.pos,
                            byte: digit,
                        });
                    }
                    value = value * 8 + u16::from(digit - b'0');
                    self.pos += 1;
                }
                let byte = u8::try_from(value)
                    .map_err(|_| SexpError::UnexpectedByte { offset, byte: escaped })?;
                bytes.push(byte);
            }
            b'x' => {
                let input = self.input;
                let digits = input
                    .get(self.pos..self.pos + 2)
                    .ok_or_else(|| self.unexpected_end())?;
                let decoded =
                    hex::decode(digits).map_err(|_| SexpError::InvalidHex { offset: self.pos })?;
                bytes.extend_from_slice(&decoded);
                self.pos += 2;
            }
            b'\n' | b'\r' => {
                let pair = if escaped == b'\n' { b'\r' } else { b'\n' };
                if self.peek() == Some(pair) {
                    self.pos += 1;
                }
            }
            byte => return Err(SexpError::UnexpectedByte { offset, byte }),
        }
        Ok(())
    }
}
