//! Verification keys built from classified key expressions.

use rsa::traits::PublicKeyParts;
use rsa::{BigUint, RsaPublicKey};

use crate::sexp::Sexp;

use super::algorithm::{ClassifyError, KeyAlgorithm};

/// Ed25519 public keys are 32 bytes, optionally prefixed by libgcrypt's
/// `0x40` native-point marker.
const ED25519_KEY_LEN: usize = 32;
const NATIVE_POINT_PREFIX: u8 = 0x40;

/// Errors that can occur while building a [`PublicKey`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum KeyError {
    /// The expression is not a supported key.
    #[error(transparent)]
    Classify(#[from] ClassifyError),

    /// A parameter required by the algorithm is absent.
    #[error("key is missing parameter `{0}`")]
    MissingParameter(&'static str),

    /// A parameter is present but does not form a valid key.
    #[error("key parameter `{0}` is invalid")]
    InvalidParameter(&'static str),
}

/// A classified public key, ready for signature verification.
///
/// The variant is fixed at construction: a key that classified as RSA can
/// only ever be checked on the RSA path.
#[derive(Clone, PartialEq, Eq)]
pub enum PublicKey {
    Rsa(RsaPublicKey),
    Ed25519(ed25519_dalek::VerifyingKey),
}

impl PublicKey {
    /// Classify `key` and extract its verification parameters.
    ///
    /// RSA keys need `n` and `e`; Ed25519 keys need `q`.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::Classify` if the expression is not a supported key,
    /// `KeyError::MissingParameter` or `KeyError::InvalidParameter` if its
    /// parameters do not form a valid key.
    pub fn from_sexp(key: &Sexp) -> Result<Self, KeyError> {
        match KeyAlgorithm::classify(key)? {
            KeyAlgorithm::Rsa => {
                let n = parameter(key, "n")?;
                let e = parameter(key, "e")?;
                let key = RsaPublicKey::new(BigUint::from_bytes_be(n), BigUint::from_bytes_be(e))
                    .map_err(|_| KeyError::InvalidParameter("n"))?;
                Ok(Self::Rsa(key))
            }
            KeyAlgorithm::Ed25519 => {
                let q = parameter(key, "q")?;
                let point = match q {
                    [NATIVE_POINT_PREFIX, rest @ ..] if rest.len() == ED25519_KEY_LEN => rest,
                    _ => q,
                };
                let bytes: [u8; ED25519_KEY_LEN] = point
                    .try_into()
                    .map_err(|_| KeyError::InvalidParameter("q"))?;
                let key = ed25519_dalek::VerifyingKey::from_bytes(&bytes)
                    .map_err(|_| KeyError::InvalidParameter("q"))?;
                Ok(Self::Ed25519(key))
            }
        }
    }

    /// The algorithm family this key belongs to.
    #[must_use]
    pub fn algorithm(&self) -> KeyAlgorithm {
        match self {
            Self::Rsa(_) => KeyAlgorithm::Rsa,
            Self::Ed25519(_) => KeyAlgorithm::Ed25519,
        }
    }

    /// Key size in bits.
    #[must_use]
    pub fn bits(&self) -> usize {
        match self {
            Self::Rsa(key) => key.n().bits(),
            Self::Ed25519(_) => 256,
        }
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rsa(key) => write!(f, "PublicKey(rsa, {} bits)", key.n().bits()),
            Self::Ed25519(key) => {
                // First 4 bytes are enough to tell keys apart in logs.
                let bytes = key.as_bytes();
                write!(
                    f,
                    "PublicKey(Ed25519, {:02x}{:02x}{:02x}{:02x}...)",
                    bytes[0], bytes[1], bytes[2], bytes[3]
                )
            }
        }
    }
}

/// The value of the `(name VALUE)` list inside the algorithm parameters.
fn parameter<'a>(key: &'a Sexp, name: &'static str) -> Result<&'a [u8], KeyError> {
    key.get(1)
        .and_then(|params| params.find_token(name.as_bytes()))
        .and_then(|param| param.atom_at(1))
        .ok_or(KeyError::MissingParameter(name))
}
