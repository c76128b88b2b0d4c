//! CLI commands.

use std::process::ExitCode;

pub mod directory;
pub mod key;

pub use directory::{check, serial, whois};
pub use key::{challenge, show_key, verify};

/// How a command that ran without error turned out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Registered, resolved or accepted.
    Success,
    /// Not registered, or the signature was rejected.
    Negative,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success => ExitCode::SUCCESS,
            Outcome::Negative => ExitCode::from(2),
        }
    }
}
