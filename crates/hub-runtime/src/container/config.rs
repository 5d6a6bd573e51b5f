//! # Hub Configuration
//!
//! Defaults overridden by environment variables.
//!
//! ## Security Requirements
//!
//! - `access_key` and `hmac_secret` MUST be set in production
//! - An empty access key authorizes nobody

use std::path::PathBuf;
use std::str::FromStr;

use hub_01_account_actions::AccountConfig;

/// Complete hub configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HubConfig {
    /// Security configuration.
    pub security: SecurityConfig,
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Account component configuration.
    pub accounts: AccountConfig,
}

impl HubConfig {
    /// Load configuration from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `HUB_ACCESS_KEY`: shared secret checked by the access gate
    /// - `HUB_HMAC_SECRET`: secret for credential generation
    /// - `HUB_STORAGE`: `memory` or `rocksdb` (default: memory)
    /// - `HUB_DATA_DIR`: RocksDB directory (default: ./data)
    /// - `HUB_MAX_CONFLICT_RETRIES`: optimistic retry bound (default: 5)
    /// - `HUB_DEFAULT_QUOTA`: balance of new accounts (default: 500)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(key) = lookup("HUB_ACCESS_KEY") {
            config.security.access_key = key;
        }
        if let Some(secret) = lookup("HUB_HMAC_SECRET") {
            config.security.hmac_secret = secret;
        }
        if let Some(backend) = lookup("HUB_STORAGE") {
            config.storage.backend = backend.parse()?;
        }
        if let Some(dir) = lookup("HUB_DATA_DIR") {
            config.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(retries) = lookup("HUB_MAX_CONFLICT_RETRIES") {
            config.accounts.max_conflict_retries =
                parse_var("HUB_MAX_CONFLICT_RETRIES", &retries)?;
        }
        if let Some(quota) = lookup("HUB_DEFAULT_QUOTA") {
            config.accounts.default_quota = parse_var("HUB_DEFAULT_QUOTA", &quota)?;
        }

        Ok(config)
    }

    /// Validate configuration for production readiness.
    ///
    /// # Returns
    ///
    /// Returns `Err` if:
    /// - the access key is empty
    /// - the HMAC secret is empty
    pub fn validate_for_production(&self) -> Result<(), ConfigError> {
        if self.security.access_key.is_empty() {
            return Err(ConfigError::InsecureAccessKey);
        }
        if self.security.hmac_secret.is_empty() {
            return Err(ConfigError::InsecureHmacSecret);
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        var,
        value: value.to_string(),
    })
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Access key is not set.
    InsecureAccessKey,
    /// HMAC secret is not set.
    InsecureHmacSecret,
    /// An environment variable could not be parsed.
    InvalidValue { var: &'static str, value: String },
    /// The selected storage backend could not be opened or is not compiled in.
    StorageUnavailable(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InsecureAccessKey => write!(
                f,
                "SECURITY VIOLATION: access key is empty. \
                 Set HUB_ACCESS_KEY environment variable."
            ),
            ConfigError::InsecureHmacSecret => write!(
                f,
                "SECURITY VIOLATION: HMAC secret is empty. \
                 Set HUB_HMAC_SECRET environment variable."
            ),
            ConfigError::InvalidValue { var, value } => {
                write!(f, "invalid value for {var}: {value:?}")
            }
            ConfigError::StorageUnavailable(reason) => {
                write!(f, "storage backend unavailable: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Security configuration.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SecurityConfig {
    /// Shared secret presented by callers. MUST NOT be empty in production.
    pub access_key: String,
    /// Secret keying the credential generator. MUST NOT be empty in production.
    pub hmac_secret: String,
}

impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("access_key", &"<redacted>")
            .field("hmac_secret", &"<redacted>")
            .finish()
    }
}

/// Which store implementation backs the components.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StorageBackend {
    #[default]
    Memory,
    RocksDb,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "rocksdb" => Ok(StorageBackend::RocksDb),
            _ => Err(ConfigError::InvalidValue {
                var: "HUB_STORAGE",
                value: s.to_string(),
            }),
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Data directory for RocksDB.
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            data_dir: PathBuf::from("./data"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hub_01_account_actions::{DEFAULT_MAX_CONFLICT_RETRIES, DEFAULT_QUOTA};
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = HubConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.data_dir, PathBuf::from("./data"));
        assert_eq!(config.accounts.max_conflict_retries, DEFAULT_MAX_CONFLICT_RETRIES);
        assert_eq!(config.accounts.default_quota, DEFAULT_QUOTA);
    }

    #[test]
    fn test_environment_overrides() {
        let config = HubConfig::from_lookup(lookup(&[
            ("HUB_ACCESS_KEY", "k"),
            ("HUB_HMAC_SECRET", "s"),
            ("HUB_STORAGE", "RocksDB"),
            ("HUB_DATA_DIR", "/var/lib/hub"),
            ("HUB_MAX_CONFLICT_RETRIES", "9"),
            ("HUB_DEFAULT_QUOTA", "1000"),
        ]))
        .unwrap();

        assert_eq!(config.security.access_key, "k");
        assert_eq!(config.storage.backend, StorageBackend::RocksDb);
        assert_eq!(config.storage.data_dir, PathBuf::from("/var/lib/hub"));
        assert_eq!(config.accounts.max_conflict_retries, 9);
        assert_eq!(config.accounts.default_quota, 1000);
    }

    #[test]
    fn test_unparseable_values_are_rejected() {
        let err = HubConfig::from_lookup(lookup(&[("HUB_DEFAULT_QUOTA", "lots")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                var: "HUB_DEFAULT_QUOTA",
                value: "lots".to_string()
            }
        );
        assert!(HubConfig::from_lookup(lookup(&[("HUB_STORAGE", "s3")])).is_err());
    }

    #[test]
    fn test_validate_rejects_empty_secrets() {
        let mut config = HubConfig::default();
        assert_eq!(
            config.validate_for_production(),
            Err(ConfigError::InsecureAccessKey)
        );

        config.security.access_key = "key".to_string();
        assert_eq!(
            config.validate_for_production(),
            Err(ConfigError::InsecureHmacSecret)
        );

        config.security.hmac_secret = "secret".to_string();
        assert!(config.validate_for_production().is_ok());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mut config = HubConfig::default();
        config.security.access_key = "super-secret-key".to_string();
        assert!(!format!("{config:?}").contains("super-secret-key"));
    }
}
