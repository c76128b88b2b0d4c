//! Users table queries.

use std::io::Write;

use anyhow::{Context, Result};
use cardauth_core::usersdb::{Directory, IdentitySource};

use super::Outcome;

/// Report whether `serialno` is registered for `username`.
pub fn check<S: IdentitySource>(
    directory: &Directory<S>,
    serialno: &str,
    username: &str,
    out: &mut impl Write,
) -> Result<Outcome> {
    let registered = directory
        .contains(serialno, username)
        .context("Failed to read users database")?;
    if registered {
        writeln!(out, "{serialno} is registered for {username}")?;
        Ok(Outcome::Success)
    } else {
        writeln!(out, "{serialno} is not registered for {username}")?;
        Ok(Outcome::Negative)
    }
}

/// Print the account a card serial number belongs to.
pub fn whois<S: IdentitySource>(
    directory: &Directory<S>,
    serialno: &str,
    out: &mut impl Write,
) -> Result<Outcome> {
    let username = directory
        .resolve_username(serialno)
        .with_context(|| format!("Cannot resolve card {serialno}"))?;
    writeln!(out, "{username}")?;
    Ok(Outcome::Success)
}

/// Print the card serial number an account uses.
pub fn serial<S: IdentitySource>(
    directory: &Directory<S>,
    username: &str,
    out: &mut impl Write,
) -> Result<Outcome> {
    let serialno = directory
        .resolve_serial(username)
        .with_context(|| format!("Cannot resolve user {username}"))?;
    writeln!(out, "{serialno}")?;
    Ok(Outcome::Success)
}
