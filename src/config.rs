//! Runtime configuration for the server binary.
//!
//! Settings are read from environment variables.  Every variable is
//! optional; see [`EngineConfig::from_env`] for defaults.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_CATALOG_DIR: &str = "catalog";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub bind_addr: SocketAddr,
    /// Directory of catalog JSON files layered over the built-in prices.
    pub catalog_dir: PathBuf,
    /// Where snapshots are written.  `None` keeps them in memory.
    pub snapshot_dir: Option<PathBuf>,
    pub log_format: LogFormat,
}

impl EngineConfig {
    /// Read configuration from the process environment.
    ///
    /// - `SAVINGS_BIND_ADDR` (default `127.0.0.1:3000`)
    /// - `SAVINGS_CATALOG_DIR` (default `catalog`)
    /// - `SAVINGS_SNAPSHOT_DIR` (unset: in-memory snapshots)
    /// - `SAVINGS_LOG_FORMAT`, `compact` or `json` (default `compact`)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let addr = lookup("SAVINGS_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = addr
            .parse()
            .with_context(|| format!("invalid SAVINGS_BIND_ADDR {addr:?}"))?;
        let catalog_dir = PathBuf::from(
            lookup("SAVINGS_CATALOG_DIR").unwrap_or_else(|| DEFAULT_CATALOG_DIR.to_string()),
        );
        let snapshot_dir = lookup("SAVINGS_SNAPSHOT_DIR")
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from);
        let log_format = match lookup("SAVINGS_LOG_FORMAT").as_deref() {
            None | Some("") | Some("compact") => LogFormat::Compact,
            Some("json") => LogFormat::Json,
            Some(other) => anyhow::bail!("invalid SAVINGS_LOG_FORMAT {other:?}, expected compact or json"),
        };
        Ok(Self {
            bind_addr,
            catalog_dir,
            snapshot_dir,
            log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_map(vars: &[(&str, &str)]) -> Result<EngineConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EngineConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = from_map(&[]).unwrap();
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR.parse::<SocketAddr>().unwrap());
        assert_eq!(config.catalog_dir, PathBuf::from("catalog"));
        assert!(config.snapshot_dir.is_none());
        assert_eq!(config.log_format, LogFormat::Compact);
    }

    #[test]
    fn test_overrides() {
        let config = from_map(&[
            ("SAVINGS_BIND_ADDR", "0.0.0.0:8080"),
            ("SAVINGS_SNAPSHOT_DIR", "/var/lib/savings"),
            ("SAVINGS_LOG_FORMAT", "json"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.snapshot_dir, Some(PathBuf::from("/var/lib/savings")));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_values() {
        assert!(from_map(&[("SAVINGS_BIND_ADDR", "localhost")]).is_err());
        assert!(from_map(&[("SAVINGS_LOG_FORMAT", "xml")]).is_err());
    }
}
