//! Core of smartcard challenge-response authentication.
//!
//! This crate is intentionally IO-free:
//! - No filesystem operations
//! - No logging
//!
//! Storage is injected through traits:
//! - [`usersdb::IdentitySource`] - the serial number to account table
//!
//! Key files are read by the caller and handed in as bytes for
//! [`sexp::Sexp::parse`].
//!
//! # Example
//!
//! ```ignore
//! use cardauth_core::{challenge::PendingChallenge, key::PublicKey, sexp::Sexp};
//!
//! let key = PublicKey::from_sexp(&Sexp::parse(&key_file)?)?;
//! let attempt = PendingChallenge::issue();
//! let response = card.sign(attempt.challenge())?;
//! let verdict = attempt.verify(&key, &response)?;
//! ```

pub mod challenge;
pub mod key;
pub mod sexp;
pub mod usersdb;

pub use challenge::{Challenge, PendingChallenge, Verdict, VerifyError, CHALLENGE_LEN};
pub use key::{ClassifyError, KeyAlgorithm, KeyError, PublicKey};
pub use sexp::{hex_transcript, Sexp, SexpError};
pub use usersdb::{Directory, DirectoryError, IdentityRecord, IdentitySource};
