//! Identity table lines.
//!
//! One record per line: `SERIALNO USERNAME [ignored...] [# comment]`.

use std::io::{self, BufRead};

/// Characters separating the fields of a table line.
const FIELD_SEPARATORS: [char; 4] = [' ', '\t', '\r', '\n'];

/// A (card serial number, account name) pair from the identity table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityRecord {
    pub serialno: String,
    pub username: String,
}

impl IdentityRecord {
    /// Parse one table line.
    ///
    /// Everything from the first `#` on is a comment. Returns `None` for
    /// lines with fewer than two fields; fields past the second are ignored.
    #[must_use]
    pub fn parse_line(line: &str) -> Option<Self> {
        let content = line.split_once('#').map_or(line, |(content, _)| content);
        let mut fields = content
            .split(FIELD_SEPARATORS)
            .filter(|field| !field.is_empty());

        let serialno = fields.next()?;
        let username = fields.next()?;
        Some(Self {
            serialno: serialno.to_owned(),
            username: username.to_owned(),
        })
    }
}

/// Lazy iterator over the records of an identity table.
///
/// Lines that are blank, comment-only, too short or not valid UTF-8 are
/// skipped. Read errors are yielded as they occur.
#[derive(Debug)]
pub struct Records<R> {
    lines: io::Split<R>,
}

impl<R: BufRead> Iterator for Records<R> {
    type Item = io::Result<IdentityRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e)),
            };
            let Ok(line) = String::from_utf8(line) else {
                continue;
            };
            if let Some(record) = IdentityRecord::parse_line(&line) {
                return Some(Ok(record));
            }
        }
    }
}

/// Iterate the records readable from `reader`.
pub fn records<R: BufRead>(reader: R) -> Records<R> {
    Records {
        lines: reader.split(b'\n'),
    }
}
