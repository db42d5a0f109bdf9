// SPDX-License-Identifier: Apache-2.0

//! Process configuration
//!
//! Everything that used to be ambient (database path, audit log path) lives
//! here and is handed to each component at construction.

use std::net::SocketAddr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const ENV_DATABASE: &str = "SQLDESK_DATABASE";
const ENV_AUDIT_LOG: &str = "SQLDESK_AUDIT_LOG";
const ENV_BIND: &str = "SQLDESK_BIND";
const ENV_LOG_DIR: &str = "SQLDESK_LOG_DIR";
const ENV_SEED_DEMO: &str = "SQLDESK_SEED_DEMO";

const DEFAULT_DATABASE: &str = "test_database.db";
const DEFAULT_AUDIT_LOG: &str = "query_audit.log";
const DEFAULT_BIND: &str = "0.0.0.0:5000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// SQLite database file queried by every request
    pub database_path: PathBuf,
    /// Append-only JSON-lines audit log
    pub audit_log_path: PathBuf,
    pub bind_addr: SocketAddr,
    /// Directory for rolling tracing logs
    pub log_dir: PathBuf,
    /// Create and fill the demo `users`/`orders` tables at startup
    #[serde(default = "default_true")]
    pub seed_demo_data: bool,
}

fn default_true() -> bool {
    true
}

impl GatewayConfig {
    /// Config rooted at the given paths, used by tests and embedders.
    pub fn new(database_path: impl Into<PathBuf>, audit_log_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            audit_log_path: audit_log_path.into(),
            bind_addr: DEFAULT_BIND
                .parse()
                .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], 5000))),
            log_dir: default_log_dir(),
            seed_demo_data: false,
        }
    }

    /// Builds the configuration from the environment, loading `.env` first.
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => debug!("Loaded environment from {:?}", path),
            Err(e) if e.not_found() => {}
            Err(e) => {
                return Err(ConfigError::InvalidValue {
                    key: ".env",
                    message: e.to_string(),
                })
            }
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_path = lookup(ENV_DATABASE)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE));
        let audit_log_path = lookup(ENV_AUDIT_LOG)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_AUDIT_LOG));

        let bind = lookup(ENV_BIND).unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr = bind
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue {
                key: ENV_BIND,
                message: format!("{} ({})", bind, e),
            })?;

        let log_dir = lookup(ENV_LOG_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(default_log_dir);

        let seed_demo_data = match lookup(ENV_SEED_DEMO) {
            None => true,
            Some(raw) => parse_bool(&raw).ok_or_else(|| ConfigError::InvalidValue {
                key: ENV_SEED_DEMO,
                message: format!("expected true/false, got {:?}", raw),
            })?,
        };

        Ok(Self {
            database_path,
            audit_log_path,
            bind_addr,
            log_dir,
            seed_demo_data,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn default_log_dir() -> PathBuf {
    let mut path = dirs::home_dir().unwrap_or_default();
    path.push(".sqldesk");
    path.push("logs");
    path
}
