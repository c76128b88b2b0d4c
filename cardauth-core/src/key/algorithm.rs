//! Key algorithm classification.

use std::fmt;

use crate::sexp::Sexp;

/// Tag of the outer list of every public key expression.
pub const PUBLIC_KEY_TAG: &[u8] = b"public-key";

/// OID that libgcrypt accepts as an alias for the Ed25519 curve.
const ED25519_OID: &[u8] = b"1.3.6.1.4.1.11591.15.1";

/// Errors that can occur while classifying a key expression.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ClassifyError {
    /// The expression is an atom or an empty list.
    #[error("empty key expression")]
    Empty,

    /// The expression lacks the expected structure.
    #[error("malformed key expression: {0}")]
    Malformed(&'static str),

    /// The algorithm name is neither `rsa` nor `ecc`.
    #[error("unsupported key algorithm `{0}`")]
    Unsupported(String),

    /// An `ecc` key that is not an EdDSA key on Ed25519.
    #[error("unsupported ecc key on curve `{curve}`: only Ed25519 with the eddsa flag is accepted")]
    UnsupportedCurve { curve: String },
}

/// Signature algorithm families accepted for smartcard keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAlgorithm {
    /// RSA, verified with PKCS#1 v1.5 over a SHA-1 sized challenge.
    Rsa,
    /// EdDSA on Curve25519, verified over the raw challenge bytes.
    Ed25519,
}

impl KeyAlgorithm {
    /// Determine the algorithm family of a `(public-key (ALGO ...))` expression.
    ///
    /// An `ecc` key is only accepted when it carries the `eddsa` flag and
    /// names the Ed25519 curve.
    ///
    /// # Errors
    ///
    /// Returns a [`ClassifyError`] for empty or malformed expressions and
    /// for every algorithm other than the two supported ones.
    pub fn classify(key: &Sexp) -> Result<Self, ClassifyError> {
        match key.as_list() {
            Some(items) if !items.is_empty() => {}
            _ => return Err(ClassifyError::Empty),
        }
        if key.tag() != Some(PUBLIC_KEY_TAG) {
            return Err(ClassifyError::Malformed("missing public-key tag"));
        }

        let params = key
            .get(1)
            .filter(|params| params.is_list())
            .ok_or(ClassifyError::Malformed("missing algorithm parameters"))?;
        let name = params
            .tag()
            .ok_or(ClassifyError::Malformed("missing algorithm name"))?;

        match name {
            b"rsa" => Ok(Self::Rsa),
            b"ecc" => classify_ecc(params),
            other => Err(ClassifyError::Unsupported(
                String::from_utf8_lossy(other).into_owned(),
            )),
        }
    }

    /// Short name, as shown in logs and diagnostics.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rsa => "rsa",
            Self::Ed25519 => "Ed25519",
        }
    }
}

impl fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn classify_ecc(params: &Sexp) -> Result<KeyAlgorithm, ClassifyError> {
    let eddsa = params
        .find_token(b"flags")
        .and_then(Sexp::as_list)
        .is_some_and(|flags| flags[1..].iter().any(|f| f.as_atom() == Some(&b"eddsa"[..])));
    let curve = params.find_token(b"curve").and_then(|c| c.atom_at(1));

    match curve {
        Some(curve) if eddsa && is_ed25519(curve) => Ok(KeyAlgorithm::Ed25519),
        _ => Err(ClassifyError::UnsupportedCurve {
            curve: curve
                .map(|c| String::from_utf8_lossy(c).into_owned())
                .unwrap_or_default(),
        }),
    }
}

fn is_ed25519(curve: &[u8]) -> bool {
    curve.eq_ignore_ascii_case(b"Ed25519") || curve == ED25519_OID
}
