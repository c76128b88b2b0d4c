//! Challenge nonces.

use rand::rngs::OsRng;
use rand::RngCore;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::VerifyError;

/// Length of a challenge: the output size of SHA-1, the digest the RSA
/// path declares for it.
pub const CHALLENGE_LEN: usize = 20;

/// A random nonce the card must sign.
///
/// Not `Clone`: one challenge belongs to one attempt. The
/// bytes are wiped when the value is dropped.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Challenge([u8; CHALLENGE_LEN]);

impl Challenge {
    /// Draw a fresh challenge from the operating system's CSPRNG.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; CHALLENGE_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Wrap caller-supplied bytes. Only the offline check may do this;
    /// authentication always uses [`Challenge::generate`].
    pub(crate) fn from_bytes(bytes: &[u8]) -> Result<Self, VerifyError> {
        let bytes: [u8; CHALLENGE_LEN] =
            bytes
                .try_into()
                .map_err(|_| VerifyError::InvalidChallengeLength {
                    expected: CHALLENGE_LEN,
                    actual: bytes.len(),
                })?;
        Ok(Self(bytes))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; CHALLENGE_LEN] {
        &self.0
    }
}

impl PartialEq for Challenge {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for Challenge {}

impl std::fmt::Debug for Challenge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Challenge([REDACTED])")
    }
}
