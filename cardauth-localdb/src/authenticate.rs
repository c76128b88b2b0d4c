//! Smartcard login against the local key store and users table.
//!
//! One call to [`Authenticator::authenticate`] runs a full attempt:
//!
//! 1. Check (or look up) the account bound to the card's serial number.
//! 2. Load and classify the card's public key.
//! 3. Issue a challenge, have the card sign it, verify the signature.
//!
//! A signature that does not verify is [`Decision::Rejected`], which is an
//! ordinary outcome. Everything that stops the attempt earlier is an
//! [`AuthError`].

use std::io;

use cardauth_core::challenge::{PendingChallenge, VerifyError};
use cardauth_core::key::{KeyError, PublicKey};
use cardauth_core::sexp::hex_transcript;
use cardauth_core::usersdb::{Directory, DirectoryError, IdentitySource};

use crate::config::{LocalDbConfig, DEFAULT_TRANSCRIPT_CAPACITY};
use crate::key_store::{KeyStore, KeyStoreError};
use crate::users_db::UsersDbFile;

/// The card side of the protocol: signs challenges with the card's key.
pub trait CardSigner {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Sign `challenge` with the private key on the card.
    ///
    /// RSA cards return the raw signature integer, Ed25519 cards the
    /// 64-byte `R || S` signature.
    fn sign(&mut self, challenge: &[u8]) -> Result<Vec<u8>, Self::Error>;
}

/// Outcome of an attempt that ran to the signature check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Accepted { username: String },
    Rejected { username: String },
}

impl Decision {
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    /// The account the attempt was made for.
    #[must_use]
    pub fn username(&self) -> &str {
        match self {
            Self::Accepted { username } | Self::Rejected { username } => username,
        }
    }
}

/// Flat classification of [`AuthError`], for callers that map failures to
/// status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Ambiguous,
    Io,
    Parse,
    Classification,
    Verification,
    Card,
}

/// Errors that stop an authentication attempt before a decision.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AuthError {
    /// The card is not registered, or not for the requested account.
    #[error("card {serialno} is not registered{}", .username.as_deref().map(|u| format!(" for {u}")).unwrap_or_default())]
    NotFound {
        serialno: String,
        username: Option<String>,
    },

    /// The users table maps the card to several accounts.
    #[error("card {serialno} maps to more than one account")]
    Ambiguous { serialno: String },

    /// The users table could not be read.
    #[error("users database unreadable: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    KeyStore(#[from] KeyStoreError),

    #[error("unusable card key: {0}")]
    Classification(#[from] KeyError),

    #[error("cannot verify card response: {0}")]
    Verification(#[from] VerifyError),

    #[error("card failed to sign: {0}")]
    Card(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl AuthError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Ambiguous { .. } => ErrorKind::Ambiguous,
            Self::Io(_) => ErrorKind::Io,
            Self::KeyStore(e) => match e {
                KeyStoreError::InvalidSerial(_) | KeyStoreError::NotFound { .. } => {
                    ErrorKind::NotFound
                }
                KeyStoreError::Io { .. } => ErrorKind::Io,
                KeyStoreError::Parse { .. } => ErrorKind::Parse,
            },
            Self::Classification(e) => match e {
                KeyError::MissingParameter(_) | KeyError::InvalidParameter(_) => ErrorKind::Parse,
                _ => ErrorKind::Classification,
            },
            Self::Verification(_) => ErrorKind::Verification,
            Self::Card(_) => ErrorKind::Card,
        }
    }
}

/// Runs authentication attempts for the local database method.
#[derive(Debug, Clone)]
pub struct Authenticator<S> {
    directory: Directory<S>,
    keys: KeyStore,
    transcript_capacity: usize,
}

impl Authenticator<UsersDbFile> {
    /// Build an authenticator over the files named in `config`.
    #[must_use]
    pub fn from_config(config: &LocalDbConfig) -> Self {
        Self {
            directory: Directory::new(UsersDbFile::new(&config.users_db)),
            keys: KeyStore::new(&config.key_dir),
            transcript_capacity: config.transcript_capacity,
        }
    }
}

impl<S: IdentitySource> Authenticator<S> {
    pub fn new(directory: Directory<S>, keys: KeyStore) -> Self {
        Self {
            directory,
            keys,
            transcript_capacity: DEFAULT_TRANSCRIPT_CAPACITY,
        }
    }

    #[must_use]
    pub fn directory(&self) -> &Directory<S> {
        &self.directory
    }

    #[must_use]
    pub fn key_store(&self) -> &KeyStore {
        &self.keys
    }

    /// Decide which account the card may log in as.
    ///
    /// With a `username`, the exact (serial, username) pair must be in the
    /// table. Without one, the serial must map to exactly one account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotFound`, `AuthError::Ambiguous` or
    /// `AuthError::Io`.
    pub fn authorize(&self, serialno: &str, username: Option<&str>) -> Result<String, AuthError> {
        let not_found = || AuthError::NotFound {
            serialno: serialno.to_owned(),
            username: username.map(str::to_owned),
        };

        let username = match username {
            Some(username) => {
                if !self.directory.contains(serialno, username)? {
                    tracing::warn!(serialno, username, "card is not registered for user");
                    return Err(not_found());
                }
                username.to_owned()
            }
            None => match self.directory.resolve_username(serialno) {
                Ok(username) => username,
                Err(DirectoryError::NotFound) => {
                    tracing::warn!(serialno, "card is not registered");
                    return Err(not_found());
                }
                Err(DirectoryError::Ambiguous) => {
                    tracing::warn!(serialno, "card maps to more than one user");
                    return Err(AuthError::Ambiguous {
                        serialno: serialno.to_owned(),
                    });
                }
                Err(DirectoryError::Io(e)) => return Err(AuthError::Io(e)),
            },
        };
        tracing::debug!(serialno, username = %username, "card authorized for user");
        Ok(username)
    }

    /// Load and classify the public key registered for the card.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::KeyStore` if the key cannot be loaded and
    /// `AuthError::Classification` if it is not a usable key.
    pub fn load_key(&self, serialno: &str) -> Result<PublicKey, AuthError> {
        let expr = self.keys.lookup_public_key(serialno)?;
        if tracing::enabled!(tracing::Level::TRACE) {
            if let Ok(transcript) = hex_transcript(&expr, self.transcript_capacity) {
                tracing::trace!(serialno, key = %transcript, "loaded key");
            }
        }

        let key = PublicKey::from_sexp(&expr).map_err(|e| {
            tracing::warn!(serialno, error = %e, "card key is unusable");
            e
        })?;
        tracing::debug!(serialno, algorithm = %key.algorithm(), bits = key.bits(), "card key loaded");
        Ok(key)
    }

    /// Run one complete authentication attempt.
    ///
    /// The card is only asked to sign once the account and key are known to
    /// be good.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] if the attempt cannot reach a decision. A
    /// wrong signature is `Ok(Decision::Rejected { .. })`.
    pub fn authenticate<C: CardSigner>(
        &self,
        serialno: &str,
        username: Option<&str>,
        card: &mut C,
    ) -> Result<Decision, AuthError> {
        let username = self.authorize(serialno, username)?;
        let key = self.load_key(serialno)?;

        let attempt = PendingChallenge::issue();
        let response = card.sign(attempt.challenge()).map_err(|e| {
            tracing::warn!(serialno, error = %e, "card failed to sign challenge");
            AuthError::Card(Box::new(e))
        })?;
        let verdict = attempt.verify(&key, &response).map_err(|e| {
            tracing::warn!(serialno, error = %e, "card response is malformed");
            e
        })?;

        if verdict.is_accepted() {
            tracing::info!(serialno, username = %username, "smartcard authentication accepted");
            Ok(Decision::Accepted { username })
        } else {
            tracing::warn!(serialno, username = %username, "smartcard signature rejected");
            Ok(Decision::Rejected { username })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    /// A card that must never be asked to sign.
    struct UnreachableCard;

    impl CardSigner for UnreachableCard {
        type Error = Infallible;

        fn sign(&mut self, _challenge: &[u8]) -> Result<Vec<u8>, Self::Error> {
            panic!("card should not be asked to sign");
        }
    }

    fn authenticator(table: &'static str, keys: &std::path::Path) -> Authenticator<&'static str> {
        Authenticator::new(Directory::new(table), KeyStore::new(keys))
    }

    #[test]
    fn test_authorize_explicit_user() {
        let dir = tempfile::tempdir().unwrap();
        let auth = authenticator("CARD001 alice\n", dir.path());
        assert_eq!(auth.authorize("CARD001", Some("alice")).unwrap(), "alice");

        let err = auth.authorize("CARD001", Some("bob")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "card CARD001 is not registered for bob");
    }

    #[test]
    fn test_authorize_resolves_user() {
        let dir = tempfile::tempdir().unwrap();
        let auth = authenticator("CARD001 alice\nCARD002 bob\nCARD002 carol\n", dir.path());
        assert_eq!(auth.authorize("CARD001", None).unwrap(), "alice");
        assert_eq!(
            auth.authorize("CARD002", None).unwrap_err().kind(),
            ErrorKind::Ambiguous
        );
        let err = auth.authorize("CARD003", None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "card CARD003 is not registered");
    }

    #[test]
    fn test_unknown_card_never_signs() {
        let dir = tempfile::tempdir().unwrap();
        let auth = authenticator("CARD001 alice\n", dir.path());
        let err = auth
            .authenticate("CARD999", None, &mut UnreachableCard)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_missing_key_never_signs() {
        let dir = tempfile::tempdir().unwrap();
        let auth = authenticator("CARD001 alice\n", dir.path());
        let err = auth
            .authenticate("CARD001", Some("alice"), &mut UnreachableCard)
            .unwrap_err();
        assert!(matches!(err, AuthError::KeyStore(KeyStoreError::NotFound { .. })));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_unsupported_key_never_signs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("CARD001"),
            "(public-key (ecc (curve \"NIST P-256\") (q #04AB#)))",
        )
        .unwrap();
        let auth = authenticator("CARD001 alice\n", dir.path());
        let err = auth
            .authenticate("CARD001", None, &mut UnreachableCard)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Classification);
    }

    #[test]
    fn test_key_with_bad_parameters_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("CARD001"), "(public-key (rsa (n #00C5313A#)))").unwrap();
        std::fs::write(
            dir.path().join("CARD002"),
            "(public-key (ecc (curve Ed25519) (flags eddsa) (q #40AB#)))",
        )
        .unwrap();
        let auth = authenticator("CARD001 alice\nCARD002 bob\n", dir.path());

        let missing = auth.load_key("CARD001").unwrap_err();
        assert!(matches!(
            missing,
            AuthError::Classification(KeyError::MissingParameter("e"))
        ));
        assert_eq!(missing.kind(), ErrorKind::Parse);

        let invalid = auth
            .authenticate("CARD002", None, &mut UnreachableCard)
            .unwrap_err();
        assert_eq!(invalid.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_malformed_key_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("CARD001"), "(public-key (rsa (n #0#)))").unwrap();
        let auth = authenticator("CARD001 alice\n", dir.path());
        assert_eq!(
            auth.load_key("CARD001").unwrap_err().kind(),
            ErrorKind::Parse
        );
    }

    #[test]
    fn test_from_config() {
        let config = LocalDbConfig {
            key_dir: "/srv/keys".into(),
            users_db: "/srv/users".into(),
            transcript_capacity: 128,
        };
        let auth = Authenticator::from_config(&config);
        assert_eq!(auth.key_store().root(), std::path::Path::new("/srv/keys"));
        assert_eq!(
            auth.directory().source().path(),
            std::path::Path::new("/srv/users")
        );
        assert_eq!(auth.transcript_capacity, 128);
    }

    #[test]
    fn test_decision_accessors() {
        let accepted = Decision::Accepted {
            username: "alice".into(),
        };
        assert!(accepted.is_accepted());
        assert_eq!(accepted.username(), "alice");

        let rejected = Decision::Rejected {
            username: "bob".into(),
        };
        assert!(!rejected.is_accepted());
        assert_eq!(rejected.username(), "bob");
    }
}
