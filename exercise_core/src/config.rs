//! Configuration file support for extrack.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/extrack/config.toml`.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// HTTP listener configuration
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Which user store backs the service
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    File,
    Memory,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("extrack")
}

fn default_host() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from the standard config path, then apply
    /// environment overrides
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        let mut config = if config_path.exists() {
            Self::load_from(&config_path)?
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Self::default()
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Apply `PORT` from the environment over the configured port
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(port) = std::env::var("PORT") {
            self.apply_port_override(&port)?;
        }
        Ok(())
    }

    fn apply_port_override(&mut self, value: &str) -> Result<()> {
        self.server.port = value
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid PORT {:?}: {}", value, e)))?;
        Ok(())
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("extrack").join("config.toml")
    }

    /// Path of the JSON user document inside the data directory
    pub fn users_path(&self) -> PathBuf {
        self.data.data_dir.join("users.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert!(config.data.data_dir.ends_with("extrack"));
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[server]
port = 8080

[storage]
backend = "memory"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0"); // default
        assert_eq!(config.storage.backend, StorageBackend::Memory);
    }

    #[test]
    fn test_load_from_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        let data_dir = temp_dir.path().join("data");
        let contents = format!(
            "[data]\ndata_dir = {:?}\n\n[server]\nport = 4100\n",
            data_dir.display().to_string()
        );
        std::fs::write(&path, contents).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.server.port, 4100);
        assert_eq!(loaded.server.host, "0.0.0.0");
        assert_eq!(loaded.storage.backend, StorageBackend::File);
        assert_eq!(loaded.data.data_dir, data_dir);
        assert_eq!(loaded.users_path(), data_dir.join("users.json"));
    }

    #[test]
    fn test_malformed_config_is_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[server\nport = ").unwrap();

        assert!(matches!(Config::load_from(&path), Err(Error::Toml(_))));
    }

    #[test]
    fn test_port_override() {
        let mut config = Config::default();
        config.apply_port_override(" 5050 ").unwrap();
        assert_eq!(config.server.port, 5050);

        assert!(matches!(
            config.apply_port_override("not-a-port"),
            Err(Error::Config(_))
        ));
        assert_eq!(config.server.port, 5050);
    }
}
