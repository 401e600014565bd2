//! Server configuration.
//!
//! Everything tunable is resolved once at startup into a [`ServerConfig`] and
//! passed down from there; nothing below the server consults the environment.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::server::error::Error;

/// Line buffer capacity: 80 characters plus the terminator slot.
pub const DEFAULT_LINE_CAPACITY: usize = 81;
/// Method buffer capacity: 6 characters plus the terminator slot.
pub const DEFAULT_METHOD_CAPACITY: usize = 7;
/// Path buffer capacity: 74 characters plus the terminator slot.
pub const DEFAULT_PATH_CAPACITY: usize = 75;
/// Working buffer for JSON documents, in bytes.
pub const DEFAULT_JSON_CAPACITY: usize = 96;

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The address to bind to.
    pub addr: SocketAddr,
    /// The single Thing name accepted under `/things/`.
    pub thing_name: String,
    /// Directory holding `thing.jsn`, `index.htm` and `property/*.jsn`.
    pub document_root: PathBuf,
    /// Boolean properties exposed under `/things/<name>/properties/`.
    pub properties: Vec<String>,
    /// Serve `index.htm` at `/` instead of the Thing Description.
    pub portal: bool,
    /// Give up on a connection that has not been answered within this limit.
    /// `None` blocks for as long as the client keeps the connection open.
    pub read_timeout: Option<Duration>,
    /// Verbose diagnostics.
    pub debug: bool,
    /// Capacity of the line buffer, terminator included.
    pub line_capacity: usize,
    /// Capacity of the method buffer, terminator included.
    pub method_capacity: usize,
    /// Capacity of the path buffer, terminator included.
    pub path_capacity: usize,
    /// Capacity of the JSON working buffer.
    pub json_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 80)),
            thing_name: "wot".to_string(),
            document_root: PathBuf::from("data"),
            properties: vec!["on".to_string()],
            portal: false,
            read_timeout: None,
            debug: false,
            line_capacity: DEFAULT_LINE_CAPACITY,
            method_capacity: DEFAULT_METHOD_CAPACITY,
            path_capacity: DEFAULT_PATH_CAPACITY,
            json_capacity: DEFAULT_JSON_CAPACITY,
        }
    }
}

impl ServerConfig {
    /// Build a configuration from `WOT_*` environment variables, falling back
    /// to the defaults for anything unset.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    ///
    /// Recognized keys: `WOT_LISTEN`, `WOT_THING_NAME`, `WOT_DOCUMENT_ROOT`,
    /// `WOT_PROPERTIES` (comma separated), `WOT_PORTAL`,
    /// `WOT_READ_TIMEOUT_SECS` and `WOT_DEBUG`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let mut config = Self::default();

        if let Some(addr) = lookup("WOT_LISTEN") {
            config.addr = addr
                .parse()
                .map_err(|e| Error::ConfigError(format!("WOT_LISTEN={addr}: {e}")))?;
        }
        if let Some(name) = lookup("WOT_THING_NAME") {
            if name.is_empty() || name.contains('/') {
                return Err(Error::ConfigError(format!("WOT_THING_NAME={name}")));
            }
            config.thing_name = name;
        }
        if let Some(root) = lookup("WOT_DOCUMENT_ROOT") {
            config.document_root = PathBuf::from(root);
        }
        if let Some(properties) = lookup("WOT_PROPERTIES") {
            config.properties = properties
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(portal) = lookup("WOT_PORTAL") {
            config.portal = parse_flag("WOT_PORTAL", &portal)?;
        }
        if let Some(secs) = lookup("WOT_READ_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .map_err(|e| Error::ConfigError(format!("WOT_READ_TIMEOUT_SECS={secs}: {e}")))?;
            config.read_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(debug) = lookup("WOT_DEBUG") {
            config.debug = parse_flag("WOT_DEBUG", &debug)?;
        }

        Ok(config)
    }

    /// Default log filter implied by [`ServerConfig::debug`].
    pub fn log_filter(&self) -> &'static str {
        if self.debug { "debug" } else { "info" }
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, Error> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::ConfigError(format!("{key}={value}: expected a boolean"))),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.addr.port(), 80);
        assert_eq!(config.thing_name, "wot");
        assert_eq!(config.properties, vec!["on".to_string()]);
        assert_eq!(config.read_timeout, None);
        assert_eq!(config.line_capacity, 81);
        assert_eq!(config.log_filter(), "info");
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("WOT_LISTEN", "127.0.0.1:8080"),
            ("WOT_THING_NAME", "lamp"),
            ("WOT_PROPERTIES", "on, fan ,"),
            ("WOT_PORTAL", "yes"),
            ("WOT_READ_TIMEOUT_SECS", "5"),
            ("WOT_DEBUG", "1"),
        ]))
        .unwrap();

        assert_eq!(config.addr, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.thing_name, "lamp");
        assert_eq!(config.properties, vec!["on".to_string(), "fan".to_string()]);
        assert!(config.portal);
        assert_eq!(config.read_timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.log_filter(), "debug");
    }

    #[test]
    fn test_zero_timeout_means_blocking() {
        let config = ServerConfig::from_lookup(lookup(&[("WOT_READ_TIMEOUT_SECS", "0")])).unwrap();
        assert_eq!(config.read_timeout, None);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            ServerConfig::from_lookup(lookup(&[("WOT_LISTEN", "nowhere")])),
            Err(Error::ConfigError(_))
        ));
        assert!(matches!(
            ServerConfig::from_lookup(lookup(&[("WOT_PORTAL", "maybe")])),
            Err(Error::ConfigError(_))
        ));
        assert!(matches!(
            ServerConfig::from_lookup(lookup(&[("WOT_THING_NAME", "a/b")])),
            Err(Error::ConfigError(_))
        ));
    }
}
