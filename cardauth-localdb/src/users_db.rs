//! The users table as a file on disk.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use cardauth_core::usersdb::IdentitySource;

/// An identity table file, reopened for every directory query.
#[derive(Debug, Clone)]
pub struct UsersDbFile {
    path: PathBuf,
}

impl UsersDbFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IdentitySource for UsersDbFile {
    type Reader = BufReader<File>;

    fn open(&self) -> io::Result<Self::Reader> {
        let file = File::open(&self.path).map_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e, "failed to open users database");
            e
        })?;
        Ok(BufReader::new(file))
    }
}
