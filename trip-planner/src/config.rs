//! Server configuration from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Bind address used when `TRIP_PLANNER_ADDR` is unset.
pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";

/// Error reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Runtime settings for the server binary.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Address to listen on.
    pub addr: SocketAddr,

    /// Optional JSON file seeding the route catalog.
    pub routes_file: Option<PathBuf>,

    /// Simulated payment delay.
    pub payment_delay: Duration,

    /// TTL for cached catalog lookups.
    pub cache_ttl: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            routes_file: None,
            payment_delay: Duration::from_secs(2),
            cache_ttl: Duration::from_secs(60),
        }
    }
}

impl ServerConfig {
    /// Read the configuration from process environment variables.
    ///
    /// - `TRIP_PLANNER_ADDR`: bind address (default `127.0.0.1:3000`)
    /// - `TRIP_PLANNER_ROUTES`: catalog seed file
    /// - `TRIP_PLANNER_PAYMENT_DELAY_MS`: payment delay (default 2000)
    /// - `TRIP_PLANNER_CACHE_TTL_SECS`: cache TTL (default 60)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read the configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(value) = get("TRIP_PLANNER_ADDR") {
            config.addr = value.trim().parse().map_err(|e: std::net::AddrParseError| {
                ConfigError::Invalid {
                    var: "TRIP_PLANNER_ADDR",
                    value: value.clone(),
                    reason: e.to_string(),
                }
            })?;
        }
        config.routes_file = get("TRIP_PLANNER_ROUTES").map(PathBuf::from);
        if let Some(value) = get("TRIP_PLANNER_PAYMENT_DELAY_MS") {
            config.payment_delay =
                Duration::from_millis(parse_number("TRIP_PLANNER_PAYMENT_DELAY_MS", &value)?);
        }
        if let Some(value) = get("TRIP_PLANNER_CACHE_TTL_SECS") {
            config.cache_ttl =
                Duration::from_secs(parse_number("TRIP_PLANNER_CACHE_TTL_SECS", &value)?);
        }

        Ok(config)
    }
}

fn parse_number(var: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| vars.get(k).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.addr.to_string(), DEFAULT_ADDR);
        assert_eq!(config.payment_delay, Duration::from_secs(2));
    }

    #[test]
    fn reads_every_variable() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("TRIP_PLANNER_ADDR", "0.0.0.0:8080"),
            ("TRIP_PLANNER_ROUTES", "data/routes.json"),
            ("TRIP_PLANNER_PAYMENT_DELAY_MS", "250"),
            ("TRIP_PLANNER_CACHE_TTL_SECS", " 5 "),
        ]))
        .unwrap();
        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.routes_file, Some(PathBuf::from("data/routes.json")));
        assert_eq!(config.payment_delay, Duration::from_millis(250));
        assert_eq!(config.cache_ttl, Duration::from_secs(5));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[("TRIP_PLANNER_ADDR", "  ")])).unwrap();
        assert_eq!(config.addr.to_string(), DEFAULT_ADDR);
    }

    #[test]
    fn rejects_malformed_values() {
        let err = ServerConfig::from_lookup(lookup(&[("TRIP_PLANNER_ADDR", "localhost")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "TRIP_PLANNER_ADDR", .. }));

        let err = ServerConfig::from_lookup(lookup(&[("TRIP_PLANNER_PAYMENT_DELAY_MS", "-1")]))
            .unwrap_err();
        assert!(err.to_string().starts_with("invalid value for TRIP_PLANNER_PAYMENT_DELAY_MS"));
    }
}
