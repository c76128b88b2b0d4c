//! Key inspection and offline challenge-response checks.

use std::io::Write;

use anyhow::{Context, Result};
use cardauth_core::challenge::{offline, Challenge, Verdict, CHALLENGE_LEN};
use cardauth_core::key::PublicKey;
use cardauth_core::sexp::hex_transcript;
use cardauth_localdb::KeyStore;

use super::Outcome;
use crate::utils::parse_hex;

/// Print the key stored for `serialno`, optionally with a hex transcript.
pub fn show_key(
    keys: &KeyStore,
    serialno: &str,
    transcript_capacity: Option<usize>,
    out: &mut impl Write,
) -> Result<Outcome> {
    let expr = keys.lookup_public_key(serialno)?;
    writeln!(out, "{expr}")?;
    if let Some(capacity) = transcript_capacity {
        let transcript = hex_transcript(&expr, capacity).context("Failed to render key")?;
        writeln!(out, "{transcript}")?;
    }

    let key = PublicKey::from_sexp(&expr)
        .with_context(|| format!("Key for card {serialno} is not usable"))?;
    writeln!(out, "algorithm: {} ({} bits)", key.algorithm(), key.bits())?;
    Ok(Outcome::Success)
}

/// Print a fresh challenge in hex.
pub fn challenge(out: &mut impl Write) -> Result<Outcome> {
    let challenge = Challenge::generate();
    writeln!(out, "{}", hex::encode(challenge.as_bytes()))?;
    Ok(Outcome::Success)
}

/// Check a card's `response` to `challenge_hex` against its stored key.
///
/// The challenge is whatever the operator passes in, so an accepted
/// response says nothing about freshness.
pub fn verify(
    keys: &KeyStore,
    serialno: &str,
    challenge_hex: &str,
    response_hex: &str,
    out: &mut impl Write,
) -> Result<Outcome> {
    let challenge = parse_hex(challenge_hex).context("Invalid --challenge")?;
    if challenge.len() != CHALLENGE_LEN {
        anyhow::bail!(
            "Invalid --challenge: expected {CHALLENGE_LEN} bytes, got {}",
            challenge.len()
        );
    }
    let response = parse_hex(response_hex).context("Invalid --response")?;

    let expr = keys.lookup_public_key(serialno)?;
    let key = PublicKey::from_sexp(&expr)
        .with_context(|| format!("Key for card {serialno} is not usable"))?;
    tracing::debug!(serialno, algorithm = %key.algorithm(), "verifying response");

    match offline::verify_response(&key, &challenge, &response)
        .context("Cannot verify response")?
    {
        Verdict::Accepted => {
            writeln!(out, "accepted")?;
            Ok(Outcome::Success)
        }
        Verdict::Rejected => {
            writeln!(out, "rejected")?;
            Ok(Outcome::Negative)
        }
    }
}
