//! Response checks outside an authentication attempt.
//!
//! The challenge comes from the caller, so nothing here shows that it was
//! fresh or that this process issued it: a response the card produced once
//! is accepted every time it is replayed. Use this to inspect a recorded
//! exchange. Logins go through [`PendingChallenge`](super::PendingChallenge).

use crate::key::PublicKey;

use super::{verify, Challenge, Verdict, VerifyError};

/// Check `response` as the card's signature over a caller-supplied
/// `challenge`.
///
/// Gives no freshness or replay guarantee.
///
/// # Errors
///
/// Returns `VerifyError::InvalidChallengeLength` unless `challenge` is
/// [`CHALLENGE_LEN`](super::CHALLENGE_LEN) bytes, and
/// `VerifyError::MalformedSignature` for responses that are not signatures.
pub fn verify_response(
    key: &PublicKey,
    challenge: &[u8],
    response: &[u8],
) -> Result<Verdict, VerifyError> {
    let challenge = Challenge::from_bytes(challenge)?;
    verify(key, &challenge, response)
}
