//! Human-readable renderings of S-expressions.

use std::fmt::{self, Write};

use super::parse::{is_token_byte, is_token_start};
use super::{Sexp, SexpError};

fn is_printable(bytes: &[u8]) -> bool {
    bytes.iter().all(|b| (0x20..=0x7e).contains(b))
}

fn is_token(bytes: &[u8]) -> bool {
    match bytes.split_first() {
        Some((first, rest)) => is_token_start(*first) && rest.iter().all(|b| is_token_byte(*b)),
        None => false,
    }
}

pub(super) fn write_advanced_atom(f: &mut impl Write, bytes: &[u8]) -> fmt::Result {
    if is_token(bytes) {
        // Token bytes are ASCII.
        bytes.iter().try_for_each(|b| f.write_char(char::from(*b)))
    } else if is_printable(bytes) {
        f.write_char('"')?;
        for b in bytes {
            if matches!(*b, b'"' | b'\\') {
                f.write_char('\\')?;
            }
            f.write_char(char::from(*b))?;
        }
        f.write_char('"')
    } else {
        f.write_char('#')?;
        bytes.iter().try_for_each(|b| write!(f, "{b:02X}"))?;
        f.write_char('#')
    }
}

/// A `String` sink that silently stops accepting input at `capacity` bytes.
struct Bounded {
    buf: String,
    capacity: usize,
}

impl Write for Bounded {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        // Only ASCII is ever written, so byte and char counts agree.
        let room = self.capacity.saturating_sub(self.buf.len());
        self.buf.push_str(&s[..s.len().min(room)]);
        Ok(())
    }
}

/// Render `expr` for diagnostics, hex-encoding key material.
///
/// The output keeps the canonical structure (parentheses and `len:`
/// prefixes). An atom is written as uppercase two-digit hex when it is a
/// parameter value (a non-leading element of a list whose tag is a single
/// byte, such as `n`, `e` or `q`) or when it holds non-printable bytes.
/// Everything else is written verbatim.
///
/// At most `capacity` characters are produced; longer renderings are cut
/// off.
///
/// # Errors
///
/// Returns [`SexpError::Encoding`] if nothing could be rendered.
pub fn hex_transcript(expr: &Sexp, capacity: usize) -> Result<String, SexpError> {
    let mut out = Bounded {
        buf: String::new(),
        capacity,
    };
    write_transcript(&mut out, expr, false).map_err(|_| SexpError::Encoding)?;

    if out.buf.is_empty() {
        return Err(SexpError::Encoding);
    }
    Ok(out.buf)
}

fn write_transcript(out: &mut Bounded, expr: &Sexp, parameter: bool) -> fmt::Result {
    match expr {
        Sexp::Atom(bytes) => {
            write!(out, "{}:", bytes.len())?;
            if parameter || !is_printable(bytes) {
                bytes.iter().try_for_each(|b| write!(out, "{b:02X}"))
            } else {
                bytes.iter().try_for_each(|b| out.write_char(char::from(*b)))
            }
        }
        Sexp::List(items) => {
            let parameter_list = matches!(items.first(), Some(Sexp::Atom(tag)) if tag.len() == 1);
            out.write_char('(')?;
            for (i, item) in items.iter().enumerate() {
                write_transcript(out, item, parameter_list && i > 0)?;
            }
            out.write_char(')')
        }
    }
}
