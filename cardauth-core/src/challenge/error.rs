//! Challenge and verification error types.

/// Errors that prevent a signature check from running at all.
///
/// A signature that simply does not match is not an error; it is
/// [`super::Verdict::Rejected`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum VerifyError {
    /// The response cannot be turned into a signature for the key's algorithm.
    #[error("malformed signature: {0}")]
    MalformedSignature(&'static str),

    /// Raw challenge bytes of the wrong length.
    #[error("invalid challenge length: expected {expected} bytes, got {actual}")]
    InvalidChallengeLength { expected: usize, actual: usize },
}
