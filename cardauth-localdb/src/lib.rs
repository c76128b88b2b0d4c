//! The "local database" smartcard auth method.
//!
//! Keys and account bindings live in plain files:
//! - `key_dir/SERIALNO` holds the card's public key as an S-expression
//! - `users_db` maps card serial numbers to account names
//!
//! [`Authenticator`] ties them to the challenge-response protocol from
//! [`cardauth_core`]. The card itself is reached through [`CardSigner`].

pub mod authenticate;
pub mod config;
pub mod key_store;
pub mod users_db;

pub use authenticate::{AuthError, Authenticator, CardSigner, Decision, ErrorKind};
pub use config::{ConfigError, LocalDbConfig};
pub use key_store::{KeyStore, KeyStoreError};
pub use users_db::UsersDbFile;
