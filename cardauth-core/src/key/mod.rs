//! Public key classification and construction.
//!
//! A key file holds a `(public-key (ALGO ...))` expression. [`KeyAlgorithm::classify`]
//! decides which verification path applies; [`PublicKey::from_sexp`] goes one
//! step further and extracts the parameters into a key that can verify.

mod algorithm;
mod public;

pub use algorithm::{ClassifyError, KeyAlgorithm, PUBLIC_KEY_TAG};
pub use public::{KeyError, PublicKey};
