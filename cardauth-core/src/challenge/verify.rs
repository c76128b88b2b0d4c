//! Signature verification per key algorithm.

use rsa::traits::PublicKeyParts;
use rsa::{BigUint, Pkcs1v15Sign, RsaPublicKey};
use sha1::Sha1;

use crate::key::PublicKey;

use super::{Challenge, VerifyError};

/// Ed25519 signatures are always `R || S`, 32 bytes each.
const ED25519_SIGNATURE_LEN: usize = 64;

/// Outcome of a signature check that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected,
}

impl Verdict {
    #[must_use]
    pub fn is_accepted(self) -> bool {
        self == Self::Accepted
    }
}

/// Check `response` as the card's signature over `challenge`.
///
/// - RSA: PKCS#1 v1.5 with a SHA-1 `DigestInfo`. The challenge is used as
///   the digest value itself and is not hashed again. The response is an
///   unsigned big-endian integer.
/// - Ed25519: plain EdDSA over the challenge bytes, checked with
///   `verify_strict`.
///
/// Reachable only through [`super::PendingChallenge::verify`] and
/// [`super::offline::verify_response`].
///
/// # Errors
///
/// Returns `VerifyError::MalformedSignature` when the response cannot be
/// read as a signature at all. A well-formed signature that does not match
/// yields `Ok(Verdict::Rejected)`.
pub(crate) fn verify(
    key: &PublicKey,
    challenge: &Challenge,
    response: &[u8],
) -> Result<Verdict, VerifyError> {
    match key {
        PublicKey::Rsa(key) => verify_rsa(key, challenge.as_bytes(), response),
        PublicKey::Ed25519(key) => verify_ed25519(key, challenge.as_bytes(), response),
    }
}

fn verify_rsa(key: &RsaPublicKey, digest: &[u8], response: &[u8]) -> Result<Verdict, VerifyError> {
    if response.is_empty() {
        return Err(VerifyError::MalformedSignature("empty response"));
    }

    // Cards may drop leading zero bytes; normalize through the integer.
    let s = BigUint::from_bytes_be(response);
    if &s >= key.n() {
        return Ok(Verdict::Rejected);
    }
    let raw = s.to_bytes_be();
    let mut signature = vec![0u8; key.size()];
    let offset = signature.len() - raw.len();
    signature[offset..].copy_from_slice(&raw);

    Ok(match key.verify(Pkcs1v15Sign::new::<Sha1>(), digest, &signature) {
        Ok(()) => Verdict::Accepted,
        Err(_) => Verdict::Rejected,
    })
}

fn verify_ed25519(
    key: &ed25519_dalek::VerifyingKey,
    message: &[u8],
    response: &[u8],
) -> Result<Verdict, VerifyError> {
    let bytes: [u8; ED25519_SIGNATURE_LEN] = response
        .try_into()
        .map_err(|_| VerifyError::MalformedSignature("Ed25519 signature must be 64 bytes"))?;
    let signature = ed25519_dalek::Signature::from_bytes(&bytes);

    Ok(match key.verify_strict(message, &signature) {
        Ok(()) => Verdict::Accepted,
        Err(_) => Verdict::Rejected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signer, SigningKey};
    use rand::rngs::OsRng;
    use rsa::RsaPrivateKey;
    use std::sync::OnceLock;

    fn rsa_private() -> &'static RsaPrivateKey {
        static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
        KEY.get_or_init(|| RsaPrivateKey::new(&mut OsRng, 1024).unwrap())
    }

    fn rsa_sign(challenge: &Challenge) -> Vec<u8> {
        rsa_private()
            .sign(Pkcs1v15Sign::new::<Sha1>(), challenge.as_bytes())
            .unwrap()
    }

    fn rsa_public() -> PublicKey {
        PublicKey::Rsa(rsa_private().to_public_key())
    }

    #[test]
    fn test_rsa_accepts_valid_signature() {
        let challenge = Challenge::generate();
        let response = rsa_sign(&challenge);
        assert_eq!(verify(&rsa_public(), &challenge, &response), Ok(Verdict::Accepted));
    }

    #[test]
    fn test_rsa_rejects_flipped_bit() {
        let challenge = Challenge::generate();
        let mut response = rsa_sign(&challenge);
        let last = response.len() - 1;
        response[last] ^= 0x01;
        assert_eq!(verify(&rsa_public(), &challenge, &response), Ok(Verdict::Rejected));
    }

    #[test]
    fn test_rsa_rejects_other_challenge() {
        let response = rsa_sign(&Challenge::generate());
        let verdict = verify(&rsa_public(), &Challenge::generate(), &response).unwrap();
        assert!(!verdict.is_accepted());
    }

    #[test]
    fn test_rsa_leading_zeros_are_insignificant() {
        let challenge = Challenge::generate();
        let mut response = vec![0u8, 0u8];
        response.extend(rsa_sign(&challenge));
        assert_eq!(verify(&rsa_public(), &challenge, &response), Ok(Verdict::Accepted));
    }

    #[test]
    fn test_rsa_empty_response_is_malformed() {
        assert!(matches!(
            verify(&rsa_public(), &Challenge::generate(), &[]),
            Err(VerifyError::MalformedSignature(_))
        ));
    }

    #[test]
    fn test_rsa_response_above_modulus_rejected() {
        let response = vec![0xFF; 129];
        assert_eq!(
            verify(&rsa_public(), &Challenge::generate(), &response),
            Ok(Verdict::Rejected)
        );
    }

    #[test]
    fn test_ed25519_accepts_raw_signature() {
        let signing = SigningKey::generate(&mut OsRng);
        let key = PublicKey::Ed25519(signing.verifying_key());
        let challenge = Challenge::generate();
        let response = signing.sign(challenge.as_bytes()).to_bytes();
        assert_eq!(verify(&key, &challenge, &response), Ok(Verdict::Accepted));
    }

    #[test]
    fn test_ed25519_rejects_flipped_bit() {
        let signing = SigningKey::generate(&mut OsRng);
        let key = PublicKey::Ed25519(signing.verifying_key());
        let challenge = Challenge::generate();
        let mut response = signing.sign(challenge.as_bytes()).to_bytes();
        response[0] ^= 0x80;
        assert_eq!(verify(&key, &challenge, &response), Ok(Verdict::Rejected));
    }

    #[test]
    fn test_ed25519_wrong_length_is_malformed() {
        let signing = SigningKey::generate(&mut OsRng);
        let key = PublicKey::Ed25519(signing.verifying_key());
        for len in [0, 63, 65] {
            assert!(matches!(
                verify(&key, &Challenge::generate(), &vec![0u8; len]),
                Err(VerifyError::MalformedSignature(_))
            ));
        }
    }

    #[test]
    fn test_rsa_signature_does_not_pass_ed25519() {
        let signing = SigningKey::generate(&mut OsRng);
        let key = PublicKey::Ed25519(signing.verifying_key());
        let challenge = Challenge::generate();
        let result = verify(&key, &challenge, &rsa_sign(&challenge));
        assert!(matches!(result, Err(VerifyError::MalformedSignature(_))));
    }
}
