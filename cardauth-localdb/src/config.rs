//! Configuration for the local database auth method.
//!
//! ```toml
//! key_dir = "/etc/poldi/localdb/keys"
//! users_db = "/etc/poldi/localdb/users"
//! transcript_capacity = 4098
//! ```
//!
//! Every field is optional.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const DEFAULT_KEY_DIR: &str = "/etc/poldi/localdb/keys";
pub const DEFAULT_USERS_DB: &str = "/etc/poldi/localdb/users";
pub const DEFAULT_TRANSCRIPT_CAPACITY: usize = 4098;

/// Where keys and the users table live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocalDbConfig {
    /// Directory holding one key file per card serial number.
    pub key_dir: PathBuf,
    /// The serial number to account table.
    pub users_db: PathBuf,
    /// Upper bound for hex transcripts of key material.
    pub transcript_capacity: usize,
}

impl Default for LocalDbConfig {
    fn default() -> Self {
        Self {
            key_dir: PathBuf::from(DEFAULT_KEY_DIR),
            users_db: PathBuf::from(DEFAULT_USERS_DB),
            transcript_capacity: DEFAULT_TRANSCRIPT_CAPACITY,
        }
    }
}

impl LocalDbConfig {
    /// Read and parse a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Read` if the file cannot be read and
    /// `ConfigError::Parse` if it is not valid config.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse config from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for invalid TOML or unknown keys.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = LocalDbConfig::from_toml("").unwrap();
        assert_eq!(config, LocalDbConfig::default());
        assert_eq!(config.key_dir, Path::new("/etc/poldi/localdb/keys"));
        assert_eq!(config.users_db, Path::new("/etc/poldi/localdb/users"));
        assert_eq!(config.transcript_capacity, 4098);
    }

    #[test]
    fn test_partial_config() {
        let config = LocalDbConfig::from_toml("key_dir = \"/srv/keys\"\n").unwrap();
        assert_eq!(config.key_dir, Path::new("/srv/keys"));
        assert_eq!(config.users_db, Path::new(DEFAULT_USERS_DB));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = LocalDbConfig::from_toml("keydir = \"/srv/keys\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cardauth.toml");
        std::fs::write(&path, "users_db = \"/srv/users\"\ntranscript_capacity = 64\n").unwrap();

        let config = LocalDbConfig::load(&path).unwrap();
        assert_eq!(config.users_db, Path::new("/srv/users"));
        assert_eq!(config.transcript_capacity, 64);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let err = LocalDbConfig::load(&missing).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("missing.toml"));

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "key_dir = [").unwrap();
        let err = LocalDbConfig::load(&broken).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
