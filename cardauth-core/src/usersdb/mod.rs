//! Identity directory: which card belongs to which account.
//!
//! The table is line oriented:
//!
//! ```text
//! # serialno                      username
//! D2760001240102000005000012340000 alice
//! D2760001240102000005000056780000 bob     # spare card
//! ```
//!
//! A lookup succeeds only when exactly one distinct counterpart matches.
//! Ambiguity is always reported, never resolved by taking the first match.
//!
//! # Example
//!
//! ```
//! use cardauth_core::usersdb::{Directory, DirectoryError};
//!
//! let directory = Directory::new("CARD001 alice\nCARD001 carol\n");
//! assert!(directory.contains("CARD001", "carol").unwrap());
//! assert!(matches!(
//!     directory.resolve_username("CARD001"),
//!     Err(DirectoryError::Ambiguous)
//! ));
//! ```

mod directory;
mod error;
mod lookup;
mod record;

pub use directory::{Directory, IdentitySource};
pub use error::DirectoryError;
pub use lookup::UniqueMatch;
pub use record::{records, IdentityRecord, Records};
