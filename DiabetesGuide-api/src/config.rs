use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// Server configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PORT must be a number between 1 and 65535, got {0:?}")]
    InvalidPort(String),
}

/// Server settings read from the environment.
///
/// Database settings are read separately by `DatabaseConfig::from_env`.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
    pub data_dir: PathBuf,
    pub environment: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            data_dir: PathBuf::from("data"),
            environment: "development".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load from `PORT`, `DATA_DIR` and `APP_ENV`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .ok()
                .filter(|p| *p != 0)
                .ok_or(ConfigError::InvalidPort(raw))?,
            None => defaults.port,
        };

        Ok(Self {
            port,
            data_dir: lookup("DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            environment: lookup("APP_ENV").unwrap_or(defaults.environment),
        })
    }

    /// Address to listen on (all interfaces)
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    /// Default SQLite file inside the data directory
    pub fn sqlite_path(&self) -> PathBuf {
        self.data_dir.join("diabetes_guide.db")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.sqlite_path(), PathBuf::from("data").join("diabetes_guide.db"));
    }

    #[test]
    fn test_reads_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("DATA_DIR", "/var/lib/dg"),
            ("APP_ENV", "production"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/dg"));
        assert_eq!(config.environment, "production");
        assert_eq!(config.socket_addr().port(), 8080);
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        assert!(ServerConfig::from_lookup(lookup(&[("PORT", "http")])).is_err());
        assert!(ServerConfig::from_lookup(lookup(&[("PORT", "0")])).is_err());
        assert!(ServerConfig::from_lookup(lookup(&[("PORT", "70000")])).is_err());
    }
}
