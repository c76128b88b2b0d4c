//! Test harness: a throwaway key directory and users table plus software
//! cards that sign like the real thing.

use std::convert::Infallible;
use std::path::PathBuf;
use std::sync::OnceLock;

use cardauth_core::sexp::Sexp;
use cardauth_localdb::{Authenticator, CardSigner, LocalDbConfig, UsersDbFile};
use ed25519_dalek::{Signer, SigningKey};
use rand::rngs::OsRng;
use rsa::traits::PublicKeyParts;
use rsa::{Pkcs1v15Sign, RsaPrivateKey};
use sha1::Sha1;
use tempfile::TempDir;

/// Shared RSA key; generating one per test is slow in debug builds.
pub fn rsa_key() -> &'static RsaPrivateKey {
    static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
    KEY.get_or_init(|| RsaPrivateKey::new(&mut OsRng, 1024).expect("RSA key generation"))
}

pub fn rsa_public_sexp(key: &RsaPrivateKey) -> Sexp {
    let mut n = key.n().to_bytes_be();
    // Key files written by gpg carry a leading zero so n reads as positive.
    n.insert(0, 0);
    Sexp::list([
        "public-key".into(),
        Sexp::list([
            "rsa".into(),
            Sexp::list(["n".into(), n.into()]),
            Sexp::list(["e".into(), key.e().to_bytes_be().into()]),
        ]),
    ])
}

pub fn ed25519_public_sexp(key: &SigningKey) -> Sexp {
    let mut q = vec![0x40];
    q.extend_from_slice(key.verifying_key().as_bytes());
    Sexp::list([
        "public-key".into(),
        Sexp::list([
            "ecc".into(),
            Sexp::list(["curve".into(), "Ed25519".into()]),
            Sexp::list(["flags".into(), "eddsa".into()]),
            Sexp::list(["q".into(), q.into()]),
        ]),
    ])
}

/// Key directory and users table in a temp dir.
pub struct TestDb {
    #[allow(dead_code)]
    pub dir: TempDir,
    pub config: LocalDbConfig,
}

impl TestDb {
    pub fn new(users: &str) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let key_dir = dir.path().join("keys");
        std::fs::create_dir(&key_dir).expect("create key dir");
        let users_db = dir.path().join("users");
        std::fs::write(&users_db, users).expect("write users table");

        let config = LocalDbConfig {
            key_dir,
            users_db,
            ..LocalDbConfig::default()
        };
        Self { dir, config }
    }

    /// Store `key` for `serialno` in the human-readable form.
    pub fn add_key(&self, serialno: &str, key: &Sexp) -> PathBuf {
        let path = self.config.key_dir.join(serialno);
        std::fs::write(&path, format!("{key}\n")).expect("write key file");
        path
    }

    pub fn authenticator(&self) -> Authenticator<UsersDbFile> {
        Authenticator::from_config(&self.config)
    }
}

/// Software RSA card. With `tamper` set it flips one bit of every signature.
pub struct RsaCard {
    pub key: &'static RsaPrivateKey,
    pub tamper: bool,
    pub signed: usize,
}

impl RsaCard {
    pub fn new(key: &'static RsaPrivateKey) -> Self {
        Self {
            key,
            tamper: false,
            signed: 0,
        }
    }
}

impl CardSigner for RsaCard {
    type Error = rsa::Error;

    fn sign(&mut self, challenge: &[u8]) -> Result<Vec<u8>, Self::Error> {
        self.signed += 1;
        let mut signature = self.key.sign(Pkcs1v15Sign::new::<Sha1>(), challenge)?;
        if self.tamper {
            let last = signature.len() - 1;
            signature[last] ^= 0x01;
        }
        Ok(signature)
    }
}

/// Software Ed25519 card.
pub struct Ed25519Card {
    pub key: SigningKey,
    pub tamper: bool,
}

impl CardSigner for Ed25519Card {
    type Error = Infallible;

    fn sign(&mut self, challenge: &[u8]) -> Result<Vec<u8>, Self::Error> {
        let mut signature = self.key.sign(challenge).to_bytes();
        if self.tamper {
            signature[10] ^= 0x04;
        }
        Ok(signature.to_vec())
    }
}

/// A card that has been pulled from the reader.
pub struct RemovedCard;

impl CardSigner for RemovedCard {
    type Error = std::io::Error;

    fn sign(&mut self, _challenge: &[u8]) -> Result<Vec<u8>, Self::Error> {
        Err(std::io::Error::new(
            std::io::ErrorKind::NotConnected,
            "card removed",
        ))
    }
}
