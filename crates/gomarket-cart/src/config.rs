//! # Cart Configuration
//!
//! Configuration for the cart store.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     GOMARKET_CART_KEY=@GoMarketplace:products                          │
//! │     GOMARKET_DB_PATH=/data/storage.db                                  │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/gomarket-storefront/cart.toml (Linux)                    │
//! │     ~/Library/Application Support/com.gomarket.storefront/cart.toml    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # cart.toml
//! storage_key = "@GoMarketplace:products"
//! database_path = "/data/user/0/com.gomarket/storage.db"
//! command_buffer = 32
//! write_on_noop = false
//! hydrate_policy = "fallback_to_empty"   # fallback_to_empty | strict
//! ```

use std::path::{Path, PathBuf};

use gomarket_core::DEFAULT_STORAGE_KEY;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// SQLite file name inside the platform data directory.
const DATABASE_FILE_NAME: &str = "storage.db";

// =============================================================================
// Config Error
// =============================================================================

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment override could not be parsed.
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },

    /// A loaded configuration breaks a rule.
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// The platform has no usable data directory.
    #[error("Could not determine app data directory")]
    NoDataDir,

    /// Config file could not be read.
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for `CartConfig`.
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

// =============================================================================
// Hydrate Policy
// =============================================================================

/// What to do when the saved snapshot cannot be read back at start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HydratePolicy {
    /// Log a warning and start with an empty cart. The next mutation
    /// overwrites the unreadable snapshot.
    #[default]
    FallbackToEmpty,

    /// Keep the unreadable snapshot untouched: every mutation fails with
    /// `CartError::HydrationFailed` and nothing is written.
    Strict,
}

impl std::fmt::Display for HydratePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HydratePolicy::FallbackToEmpty => write!(f, "fallback_to_empty"),
            HydratePolicy::Strict => write!(f, "strict"),
        }
    }
}

impl std::str::FromStr for HydratePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fallback_to_empty" => Ok(HydratePolicy::FallbackToEmpty),
            "strict" => Ok(HydratePolicy::Strict),
            other => Err(ConfigError::InvalidValue {
                key: "hydrate_policy".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

// =============================================================================
// Cart Config
// =============================================================================

/// Cart store configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CartConfig {
    /// Storage key the snapshot is written under.
    pub storage_key: String,

    /// SQLite file; `None` means `storage.db` in the platform data dir.
    /// `":memory:"` keeps everything in RAM.
    pub database_path: Option<PathBuf>,

    /// Capacity of the command queue in front of the service task.
    pub command_buffer: usize,

    /// Rewrite the snapshot even when increment/decrement matched no item.
    pub write_on_noop: bool,

    /// Behavior when the saved snapshot is unreadable.
    pub hydrate_policy: HydratePolicy,
}

impl Default for CartConfig {
    fn default() -> Self {
        CartConfig {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            database_path: None,
            command_buffer: 32,
            write_on_noop: false,
            hydrate_policy: HydratePolicy::FallbackToEmpty,
        }
    }
}

impl CartConfig {
    /// Config with an in-memory database, for tests and previews.
    pub fn in_memory() -> Self {
        CartConfig {
            database_path: Some(PathBuf::from(":memory:")),
            ..Self::default()
        }
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`cart.toml`), if it exists
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading cart config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML config file. Missing fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid("storage_key must not be empty".into()));
        }

        // tokio's mpsc::channel panics on zero capacity
        if self.command_buffer == 0 {
            return Err(ConfigError::Invalid(
                "command_buffer must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Returns the configured database path, or the platform default.
    pub fn resolve_database_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.database_path {
            return Ok(path.clone());
        }

        directories::ProjectDirs::from("com", "gomarket", "storefront")
            .map(|dirs| dirs.data_dir().join(DATABASE_FILE_NAME))
            .ok_or(ConfigError::NoDataDir)
    }

    /// Applies `GOMARKET_*` environment variable overrides.
    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from any key lookup.
    fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("GOMARKET_CART_KEY") {
            debug!(storage_key = %key, "Overriding storage key from environment");
            self.storage_key = key;
        }

        if let Some(path) = lookup("GOMARKET_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database_path = Some(PathBuf::from(path));
        }

        if let Some(value) = lookup("GOMARKET_COMMAND_BUFFER") {
            self.command_buffer = value.parse().map_err(|_| ConfigError::InvalidValue {
                key: "GOMARKET_COMMAND_BUFFER".to_string(),
                value: value.clone(),
            })?;
        }

        if let Some(value) = lookup("GOMARKET_WRITE_ON_NOOP") {
            self.write_on_noop = match value.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "GOMARKET_WRITE_ON_NOOP".to_string(),
                        value,
                    })
                }
            };
        }

        if let Some(value) = lookup("GOMARKET_HYDRATE_POLICY") {
            self.hydrate_policy = value.parse()?;
        }

        Ok(())
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "gomarket", "storefront")
            .map(|dirs| dirs.config_dir().join("cart.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = CartConfig::default();
        assert_eq!(config.storage_key, "@GoMarketplace:products");
        assert_eq!(config.command_buffer, 32);
        assert!(!config.write_on_noop);
        assert_eq!(config.hydrate_policy, HydratePolicy::FallbackToEmpty);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_hydrate_policy_parsing() {
        assert_eq!(
            "strict".parse::<HydratePolicy>().unwrap(),
            HydratePolicy::Strict
        );
        assert_eq!(
            "FALLBACK_TO_EMPTY".parse::<HydratePolicy>().unwrap(),
            HydratePolicy::FallbackToEmpty
        );
        assert!("sometimes".parse::<HydratePolicy>().is_err());
        assert!("fallback".parse::<HydratePolicy>().is_err());
        assert_eq!(HydratePolicy::Strict.to_string(), "strict");
    }

    #[test]
    fn test_validation() {
        let mut config = CartConfig::default();

        config.storage_key = "  ".to_string();
        assert!(config.validate().is_err());

        config.storage_key = "@Test:cart".to_string();
        config.command_buffer = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let mut config = CartConfig::default();
        config
            .apply_overrides(lookup_from(&[
                ("GOMARKET_CART_KEY", "@Other:cart"),
                ("GOMARKET_DB_PATH", "/tmp/cart.db"),
                ("GOMARKET_COMMAND_BUFFER", "8"),
                ("GOMARKET_WRITE_ON_NOOP", "yes"),
                ("GOMARKET_HYDRATE_POLICY", "strict"),
            ]))
            .unwrap();

        assert_eq!(config.storage_key, "@Other:cart");
        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/cart.db")));
        assert_eq!(config.command_buffer, 8);
        assert!(config.write_on_noop);
        assert_eq!(config.hydrate_policy, HydratePolicy::Strict);
    }

    #[test]
    fn test_invalid_override() {
        let mut config = CartConfig::default();
        let err = config
            .apply_overrides(lookup_from(&[("GOMARKET_COMMAND_BUFFER", "lots")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err = config
            .apply_overrides(lookup_from(&[("GOMARKET_WRITE_ON_NOOP", "maybe")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_from_file_partial() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.toml");
        std::fs::write(&path, "write_on_noop = true\nhydrate_policy = \"strict\"\n").unwrap();

        let config = CartConfig::from_file(&path).unwrap();
        assert!(config.write_on_noop);
        assert_eq!(config.hydrate_policy, HydratePolicy::Strict);
        assert_eq!(config.storage_key, "@GoMarketplace:products");
    }

    #[test]
    fn test_from_file_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.toml");
        std::fs::write(&path, "command_buffer = \"many\"").unwrap();

        assert!(matches!(
            CartConfig::from_file(&path),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = CartConfig {
            database_path: Some(PathBuf::from("/data/storage.db")),
            ..CartConfig::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("hydrate_policy = \"fallback_to_empty\""));

        let parsed: CartConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_resolve_database_path() {
        let config = CartConfig::in_memory();
        assert_eq!(
            config.resolve_database_path().unwrap(),
            PathBuf::from(":memory:")
        );
    }
}
