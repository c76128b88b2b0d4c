//! Serial number to account lookups over an identity table.

use std::io::{self, BufRead};

use super::record::{records, IdentityRecord};
use super::{DirectoryError, UniqueMatch};

/// Something that can hand out a fresh reader over the identity table.
///
/// Every query calls [`IdentitySource::open`] again and scans from the
/// start, so a source must be re-readable.
pub trait IdentitySource {
    type Reader: BufRead;

    /// Open the table for one scan.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the table cannot be opened.
    fn open(&self) -> io::Result<Self::Reader>;
}

impl<'a> IdentitySource for &'a str {
    type Reader = &'a [u8];

    fn open(&self) -> io::Result<Self::Reader> {
        Ok(self.as_bytes())
    }
}

/// Queries mapping card serial numbers to account names.
///
/// There is no index: each query is a single linear scan of the source.
#[derive(Debug, Clone)]
pub struct Directory<S> {
    source: S,
}

impl<S: IdentitySource> Directory<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Whether the table holds the exact pair (`serialno`, `username`).
    ///
    /// Stops reading at the first matching record.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the table cannot be opened or read.
    pub fn contains(&self, serialno: &str, username: &str) -> io::Result<bool> {
        for record in records(self.source.open()?) {
            let record = record?;
            if record.serialno == serialno && record.username == username {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// The one account name bound to `serialno`.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::NotFound` if the serial is absent,
    /// `DirectoryError::Ambiguous` if it maps to several distinct accounts,
    /// and `DirectoryError::Io` if the table cannot be read.
    pub fn resolve_username(&self, serialno: &str) -> Result<String, DirectoryError> {
        self.resolve(|record| (record.serialno == serialno).then_some(record.username))
    }

    /// The one card serial number bound to `username`.
    ///
    /// # Errors
    ///
    /// As for [`Self::resolve_username`], keyed by account name.
    pub fn resolve_serial(&self, username: &str) -> Result<String, DirectoryError> {
        self.resolve(|record| (record.username == username).then_some(record.serialno))
    }

    fn resolve(
        &self,
        mut select: impl FnMut(IdentityRecord) -> Option<String>,
    ) -> Result<String, DirectoryError> {
        let mut matches = UniqueMatch::new();
        for record in records(self.source.open()?) {
            if let Some(candidate) = select(record?) {
                matches.observe(candidate);
                // Nothing later in the table can make the answer unique again.
                if matches.is_ambiguous() {
                    break;
                }
            }
        }
        matches.finish()
    }
}
