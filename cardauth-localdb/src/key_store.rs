//! Public keys on disk, one file per card serial number.

use std::io;
use std::path::{Path, PathBuf};

use cardauth_core::sexp::{Sexp, SexpError};

/// Errors that can occur while loading a card's public key.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum KeyStoreError {
    /// The serial number cannot be used as a file name.
    #[error("invalid serial number {0:?}")]
    InvalidSerial(String),

    /// No key is stored for the card, or the key file is empty.
    #[error("no key at {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read key {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("malformed key {}: {source}", .path.display())]
    Parse { path: PathBuf, source: SexpError },
}

/// Directory of key files named after card serial numbers.
#[derive(Debug, Clone)]
pub struct KeyStore {
    root: PathBuf,
}

impl KeyStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the key file for `serialno`.
    ///
    /// # Errors
    ///
    /// Returns `KeyStoreError::InvalidSerial` for serials that are empty or
    /// could name a file outside the store.
    pub fn key_path(&self, serialno: &str) -> Result<PathBuf, KeyStoreError> {
        let unsafe_name = serialno.is_empty()
            || serialno.contains("..")
            || serialno.contains(['/', '\\', '\0'])
            || serialno == ".";
        if unsafe_name {
            return Err(KeyStoreError::InvalidSerial(serialno.to_owned()));
        }
        Ok(self.root.join(serialno))
    }

    /// Load and parse the public key stored for `serialno`.
    ///
    /// # Errors
    ///
    /// Returns `KeyStoreError::NotFound` if there is no key (or an empty
    /// one), `KeyStoreError::Io` if the file cannot be read, and
    /// `KeyStoreError::Parse` if it does not hold a valid expression.
    pub fn lookup_public_key(&self, serialno: &str) -> Result<Sexp, KeyStoreError> {
        let path = self.key_path(serialno).map_err(|e| {
            tracing::error!(serialno, root = %self.root.display(), "failed to construct key file path");
            e
        })?;

        let content = match std::fs::read(&path) {
            Ok(content) if content.is_empty() => {
                tracing::error!(path = %path.display(), "key file is empty");
                return Err(KeyStoreError::NotFound { path });
            }
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::error!(path = %path.display(), "no key file for card");
                return Err(KeyStoreError::NotFound { path });
            }
            Err(source) => {
                tracing::error!(path = %path.display(), error = %source, "failed to read key file");
                return Err(KeyStoreError::Io { path, source });
            }
        };

        Sexp::parse(&content).map_err(|source| {
            tracing::error!(path = %path.display(), error = %source, "failed to parse key file");
            KeyStoreError::Parse { path, source }
        })
    }
}
