//! Shared utility functions.

use anyhow::{Context, Result};

/// Decode a hex argument. Whitespace, `:` separators and a leading `0x` are
/// ignored so values can be pasted from most tools.
pub fn parse_hex(input: &str) -> Result<Vec<u8>> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let cleaned: String = digits
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .collect();
    hex::decode(&cleaned).with_context(|| format!("invalid hex value {input:?}"))
}
