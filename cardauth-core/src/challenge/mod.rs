//! Challenge-response protocol.
//!
//! The flow for one authentication attempt is:
//!
//! 1. [`PendingChallenge::issue`] draws a fresh [`Challenge`].
//! 2. The card signs [`PendingChallenge::challenge`].
//! 3. [`PendingChallenge::verify`] checks the response against the card's
//!    [`PublicKey`](crate::key::PublicKey) and consumes the attempt.
//!
//! A mismatching signature is reported as [`Verdict::Rejected`]; only
//! responses that cannot be interpreted at all are a [`VerifyError`].
//!
//! There is no way to verify against a challenge the caller made up. The
//! signature check itself is private:
//!
//! ```compile_fail
//! use cardauth_core::challenge::verify;
//! ```
//!
//! and a [`Challenge`] cannot be built from chosen bytes:
//!
//! ```compile_fail
//! let challenge = cardauth_core::challenge::Challenge::from_bytes(&[0u8; 20]);
//! ```
//!
//! Diagnostics that replay a recorded exchange use [`offline`], which makes
//! no freshness claim.

mod attempt;
mod error;
mod nonce;
pub mod offline;
mod verify;

pub use attempt::PendingChallenge;
pub use error::VerifyError;
pub use nonce::{Challenge, CHALLENGE_LEN};
pub use verify::Verdict;

pub(crate) use verify::verify;
