//! S-expressions as used for public key material.
//!
//! Key files hold a single list such as
//!
//! ```text
//! (10:public-key(3:rsa(1:n129:...)(1:e3:...)))
//! ```
//!
//! in the canonical, length-prefixed encoding, or the same tree in the
//! human-readable advanced form:
//!
//! ```text
//! (public-key (rsa (n #00C0FFEE...#) (e #010001#)))
//! ```
//!
//! Both forms parse into the same [`Sexp`] value. The parser is a
//! recursive-descent parser over explicit field boundaries, so payload bytes
//! can never be mistaken for structure.
//!
//! # Example
//!
//! ```
//! use cardauth_core::sexp::Sexp;
//!
//! let key = Sexp::parse(b"(public-key (rsa (n #00C5#) (e #03#)))").unwrap();
//! assert_eq!(key.tag(), Some(&b"public-key"[..]));
//! assert_eq!(key.find_token(b"e").and_then(|e| e.atom_at(1)), Some(&[3u8][..]));
//! ```

mod error;
mod parse;
mod render;

use std::fmt;

pub use error::SexpError;
pub use render::hex_transcript;

/// Maximum list nesting accepted by the parser.
pub const MAX_DEPTH: usize = 64;

/// A parsed S-expression: either a raw byte string or a list.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Sexp {
    /// A byte string. Tokens, quoted strings, hex and base64 atoms all end up here.
    Atom(Vec<u8>),
    /// A parenthesized list of expressions.
    List(Vec<Sexp>),
}

impl Sexp {
    /// Parse a complete expression in canonical or advanced form.
    ///
    /// The input must contain exactly one list, optionally surrounded by
    /// whitespace.
    ///
    /// # Errors
    ///
    /// Returns a [`SexpError`] describing the first offending byte.
    pub fn parse(input: &[u8]) -> Result<Self, SexpError> {
        parse::Parser::new(input).parse_document()
    }

    /// Build a list from its elements.
    #[must_use]
    pub fn list(items: impl IntoIterator<Item = Sexp>) -> Self {
        Self::List(items.into_iter().collect())
    }

    /// The atom's bytes, if this is an atom.
    #[must_use]
    pub fn as_atom(&self) -> Option<&[u8]> {
        match self {
            Self::Atom(bytes) => Some(bytes),
            Self::List(_) => None,
        }
    }

    /// The list's elements, if this is a list.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Sexp]> {
        match self {
            Self::List(items) => Some(items),
            Self::Atom(_) => None,
        }
    }

    #[must_use]
    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Element `index` of a list.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Sexp> {
        self.as_list().and_then(|items| items.get(index))
    }

    /// Element `index` of a list, if that element is an atom.
    #[must_use]
    pub fn atom_at(&self, index: usize) -> Option<&[u8]> {
        self.get(index).and_then(Sexp::as_atom)
    }

    /// The leading atom of a list, which names it.
    #[must_use]
    pub fn tag(&self) -> Option<&[u8]> {
        self.atom_at(0)
    }

    /// Depth-first search for the first list (this one included) whose tag
    /// is `name`.
    #[must_use]
    pub fn find_token(&self, name: &[u8]) -> Option<&Sexp> {
        let items = self.as_list()?;
        if self.tag() == Some(name) {
            return Some(self);
        }
        items.iter().find_map(|item| item.find_token(name))
    }

    /// Serialize into the canonical encoding.
    #[must_use]
    pub fn to_canonical(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write_canonical(&mut out);
        out
    }

    fn write_canonical(&self, out: &mut Vec<u8>) {
        match self {
            Self::Atom(bytes) => {
                out.extend_from_slice(bytes.len().to_string().as_bytes());
                out.push(b':');
                out.extend_from_slice(bytes);
            }
            Self::List(items) => {
                out.push(b'(');
                for item in items {
                    item.write_canonical(out);
                }
                out.push(b')');
            }
        }
    }
}

impl From<&str> for Sexp {
    fn from(value: &str) -> Self {
        Self::Atom(value.as_bytes().to_vec())
    }
}

impl From<&[u8]> for Sexp {
    fn from(value: &[u8]) -> Self {
        Self::Atom(value.to_vec())
    }
}

impl From<Vec<u8>> for Sexp {
    fn from(value: Vec<u8>) -> Self {
        Self::Atom(value)
    }
}

/// Renders the advanced form: bare tokens where possible, quoted printable
/// strings, `#hex#` for everything else.
impl fmt::Display for Sexp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atom(bytes) => render::write_advanced_atom(f, bytes),
            Self::List(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    fmt::Display::fmt(item, f)?;
                }
                f.write_str(")")
            }
        }
    }
}

impl fmt::Debug for Sexp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sexp({self})")
    }
}
