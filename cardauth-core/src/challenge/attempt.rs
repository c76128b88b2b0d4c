//! Per-attempt challenge state.

use crate::key::PublicKey;

use super::{verify, Challenge, Verdict, VerifyError};

/// A challenge that has been issued and is waiting for the card's answer.
///
/// Holding a `PendingChallenge` is the only way to reach [`Self::verify`],
/// and verifying consumes it, so every attempt checks exactly one fresh
/// challenge exactly once. The nonce is wiped when the value is dropped,
/// whichever way the attempt ends.
#[derive(Debug)]
#[must_use = "an issued challenge should be sent to the card and verified"]
pub struct PendingChallenge {
    challenge: Challenge,
}

impl PendingChallenge {
    /// Start an attempt with a freshly generated challenge.
    pub fn issue() -> Self {
        Self {
            challenge: Challenge::generate(),
        }
    }

    /// The bytes to hand to the card for signing.
    #[must_use]
    pub fn challenge(&self) -> &[u8] {
        self.challenge.as_bytes()
    }

    /// Finish the attempt by checking the card's `response`.
    ///
    /// # Errors
    ///
    /// See [`verify`](super::verify).
    pub fn verify(self, key: &PublicKey, response: &[u8]) -> Result<Verdict, VerifyError> {
        verify(key, &self.challenge, response)
    }
}
