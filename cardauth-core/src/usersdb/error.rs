//! Identity directory error types.

use std::io;

/// Errors returned by directory lookups.
///
/// Closed set: callers may match it exhaustively.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// No record matches.
    #[error("no matching identity record")]
    NotFound,

    /// Records name two or more distinct counterparts; the table needs fixing.
    #[error("identity records are ambiguous")]
    Ambiguous,

    /// The identity table could not be read.
    #[error("identity table unreadable: {0}")]
    Io(#[from] io::Error),
}
