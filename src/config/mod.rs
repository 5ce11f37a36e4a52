//! Configuration module - environment variable parsing

use std::env;
use std::net::SocketAddr;

/// Log output format
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Server binding address
    pub server_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Human-readable or JSON log lines
    pub log_format: LogFormat,

    /// Allowed client origins for CORS (empty = any origin)
    pub client_origins: Vec<String>,

    /// Seed for the world RNG (spawn points, police placement)
    pub world_seed: Option<u64>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Hosting platforms provide PORT, fall back to SERVER_ADDR or default
        let server_addr = match lookup("PORT") {
            Some(port) => format!("0.0.0.0:{}", port),
            None => lookup("SERVER_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
        };

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(_) => return Err(ConfigError::Invalid("LOG_FORMAT")),
        };

        let client_origins = lookup("CLIENT_ORIGIN")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let world_seed = lookup("WORLD_SEED")
            .map(|raw| raw.parse::<u64>().map_err(|_| ConfigError::Invalid("WORLD_SEED")))
            .transpose()?;

        Ok(Self {
            server_addr: server_addr
                .parse()
                .map_err(|_| ConfigError::InvalidAddress)?,
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_format,
            client_origins,
            world_seed,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("Invalid server address format")]
    InvalidAddress,
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
    fn defaults_when_env_is_empty() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.server_addr, "0.0.0.0:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Text);
        assert!(config.client_origins.is_empty());
        assert_eq!(config.world_seed, None);
    }

    #[test]
    fn port_takes_precedence_over_server_addr() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "9000"),
            ("SERVER_ADDR", "127.0.0.1:4000"),
        ]))
        .unwrap();
        assert_eq!(config.server_addr.port(), 9000);
    }

    #[test]
    fn parses_origins_and_seed() {
        let config = Config::from_lookup(lookup_from(&[
            ("CLIENT_ORIGIN", "http://a.test, http://b.test,"),
            ("WORLD_SEED", "42"),
            ("LOG_FORMAT", "json"),
        ]))
        .unwrap();
        assert_eq!(config.client_origins, vec!["http://a.test", "http://b.test"]);
        assert_eq!(config.world_seed, Some(42));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            Config::from_lookup(lookup_from(&[("WORLD_SEED", "abc")])),
            Err(ConfigError::Invalid("WORLD_SEED"))
        ));
        assert!(matches!(
            Config::from_lookup(lookup_from(&[("SERVER_ADDR", "nope")])),
            Err(ConfigError::InvalidAddress)
        ));
        assert!(matches!(
            Config::from_lookup(lookup_from(&[("LOG_FORMAT", "xml")])),
            Err(ConfigError::Invalid("LOG_FORMAT"))
        ));
    }
}
