//! Configuration management for kennel.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::net::SocketAddr;
use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::storage::{WriteMode, DEFAULT_EXTENSION};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "kennel";

/// Default records directory name, under the data directory.
const RECORDS_DIR_NAME: &str = "records";

/// Environment variable prefix.
const ENV_PREFIX: &str = "KENNEL_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `KENNEL_`, `__` between sections)
/// 2. TOML config file at `~/.config/kennel/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration.
    pub server: ServerConfig,
    /// Record storage configuration.
    pub storage: StorageConfig,
    /// Page rendering configuration.
    pub render: RenderConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to listen on.
    pub bind_address: String,
    /// Largest request body accepted, in bytes.
    pub max_body_bytes: usize,
}

/// Record storage configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding record files.
    /// Defaults to `~/.local/share/kennel/records`
    pub data_dir: Option<PathBuf>,
    /// Extension of record files, without the dot.
    pub extension: String,
    /// How record files are written.
    pub write_mode: WriteMode,
}

/// Page rendering configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Directory containing `view.html` (or `dog.html`) and `edit.html`.
    /// The built-in templates are used when unset.
    pub templates_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            max_body_bytes: 1024 * 1024,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None, // Will be resolved to default at runtime
            extension: DEFAULT_EXTENSION.to_string(),
            write_mode: WriteMode::Atomic,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.server.bind_address.parse::<SocketAddr>().is_err() {
            return Err(Error::ConfigValidation {
                message: format!(
                    "bind_address '{}' is not a socket address",
                    self.server.bind_address
                ),
            });
        }

        if self.server.max_body_bytes == 0 {
            return Err(Error::ConfigValidation {
                message: "max_body_bytes must be greater than 0".to_string(),
            });
        }

        // The extension becomes part of every record path.
        let extension = &self.storage.extension;
        if extension.is_empty() || !extension.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(Error::ConfigValidation {
                message: format!("extension '{extension}' must be non-empty ASCII alphanumeric"),
            });
        }

        Ok(())
    }

    /// Get the records directory, resolving defaults if not set.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(RECORDS_DIR_NAME))
    }
}

#[cfg(test)]
mod tests {
    use figment::Jail;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.bind_address, "127.0.0.1:8080");
        assert_eq!(config.storage.extension, "dog");
        assert_eq!(config.storage.write_mode, WriteMode::Atomic);
        assert!(config.render.templates_dir.is_none());
    }

    #[test]
    fn test_default_server_config() {
        let server = ServerConfig::default();
        assert_eq!(server.max_body_bytes, 1_048_576);
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_bad_bind_address() {
        let mut config = Config::default();
        config.server.bind_address = "localhost".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("bind_address"));
    }

    #[test]
    fn test_validate_zero_body_limit() {
        let mut config = Config::default();
        config.server.max_body_bytes = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("max_body_bytes"));
    }

    #[test]
    fn test_validate_extension() {
        for bad in ["", ".dog", "d/g", "tar.gz", "d g"] {
            let mut config = Config::default();
            config.storage.extension = bad.to_string();

            let err = config.validate().unwrap_err().to_string();
            assert!(err.contains("extension"), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_data_dir_default() {
        let config = Config::default();
        let path = config.data_dir();

        assert!(path.ends_with("kennel/records"));
    }

    #[test]
    fn test_data_dir_custom() {
        let mut config = Config::default();
        config.storage.data_dir = Some(PathBuf::from("/srv/dogs"));

        assert_eq!(config.data_dir(), PathBuf::from("/srv/dogs"));
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("kennel"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        Jail::expect_with(|_jail| {
            // Loading from a nonexistent path should work (uses defaults)
            let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn test_load_from_toml_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [server]
                bind_address = "0.0.0.0:9000"

                [storage]
                data_dir = "/srv/dogs"
                extension = "txt"
                write_mode = "in_place"

                [render]
                templates_dir = "/srv/templates"
                "#,
            )?;

            let config = Config::load_from(Some(PathBuf::from("config.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.server.bind_address, "0.0.0.0:9000");
            assert_eq!(config.storage.data_dir, Some(PathBuf::from("/srv/dogs")));
            assert_eq!(config.storage.extension, "txt");
            assert_eq!(config.storage.write_mode, WriteMode::InPlace);
            assert_eq!(
                config.render.templates_dir,
                Some(PathBuf::from("/srv/templates"))
            );
            assert_eq!(config.server.max_body_bytes, 1_048_576);
            Ok(())
        });
    }

    #[test]
    fn test_load_env_override() {
        Jail::expect_with(|jail| {
            jail.set_env("KENNEL_SERVER__BIND_ADDRESS", "127.0.0.1:7070");
            jail.set_env("KENNEL_STORAGE__EXTENSION", "pup");

            let config = Config::load_from(Some(PathBuf::from("missing.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.server.bind_address, "127.0.0.1:7070");
            assert_eq!(config.storage.extension, "pup");
            assert_eq!(config.storage.write_mode, WriteMode::Atomic);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_toml() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [server]
                bind_address = "0.0.0.0:9000"
                max_body_bytes = 2048

                [storage]
                extension = "txt"
                "#,
            )?;
            jail.set_env("KENNEL_SERVER__BIND_ADDRESS", "127.0.0.1:7070");

            let config = Config::load_from(Some(PathBuf::from("config.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.server.bind_address, "127.0.0.1:7070");
            assert_eq!(config.server.max_body_bytes, 2048);
            assert_eq!(config.storage.extension, "txt");
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[storage]\nextension = \"../x\"\n")?;

            let err = Config::load_from(Some(PathBuf::from("config.toml"))).unwrap_err();
            assert!(matches!(err, Error::ConfigValidation { .. }));
            Ok(())
        });
    }

    #[test]
    fn test_load_reports_malformed_toml() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[server\n")?;

            let err = Config::load_from(Some(PathBuf::from("config.toml"))).unwrap_err();
            assert!(matches!(err, Error::ConfigLoad(_)));
            Ok(())
        });
    }

    #[test]
    fn test_storage_config_deserialize() {
        let json = r#"{"extension": "pup"}"#;
        let storage: StorageConfig = serde_json::from_str(json).unwrap();
        assert_eq!(storage.extension, "pup");
        assert_eq!(storage.write_mode, WriteMode::Atomic);
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("bind_address"));
        assert!(json.contains("write_mode"));
    }
}
