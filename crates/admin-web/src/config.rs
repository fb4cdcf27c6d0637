//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

use database::location;

/// Admin web server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `ADMIN_ADDR` | Server bind address | `127.0.0.1:8788` |
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:crm.sqlite3?mode=rwc` |
    /// | `CRM_TEMP_STORAGE` | `1` or `true` keeps the database in the OS temp directory | unset |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let addr = lookup("ADMIN_ADDR")
            .unwrap_or_else(|| "127.0.0.1:8788".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let use_temp_dir =
            location::temp_storage_enabled(lookup(location::TEMP_STORAGE_VAR).as_deref());
        let database_url =
            location::resolve_url(lookup("SQLITE_PATH").as_deref(), use_temp_dir);

        Ok(Self {
            addr,
            database_url,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid ADMIN_ADDR format")]
    InvalidAddr,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.addr.to_string(), "127.0.0.1:8788");
        assert_eq!(config.database_url, location::DEFAULT_URL);
    }

    #[test]
    fn test_temp_storage() {
        let temp = config(&[("CRM_TEMP_STORAGE", "1")]).unwrap();
        assert_eq!(temp.database_url, location::temp_dir_url());

        let temp = config(&[("CRM_TEMP_STORAGE", "true")]).unwrap();
        assert_eq!(temp.database_url, location::temp_dir_url());

        let explicit = config(&[
            ("CRM_TEMP_STORAGE", "1"),
            ("SQLITE_PATH", "sqlite:/data/crm.sqlite3?mode=rwc"),
        ])
        .unwrap();
        assert_eq!(explicit.database_url, "sqlite:/data/crm.sqlite3?mode=rwc");
    }

    #[test]
    fn test_invalid_addr() {
        assert!(matches!(
            config(&[("ADMIN_ADDR", "not an address")]),
            Err(ConfigError::InvalidAddr)
        ));
    }
}
