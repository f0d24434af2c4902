use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "DexRobot PDA";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default listen address for the inspection API.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5080";

/// Environment variable overriding the listen address.
pub const ENV_BIND_ADDR: &str = "DEXROBOT_BIND_ADDR";
/// Environment variable overriding the SQLite database path.
pub const ENV_DB_PATH: &str = "DEXROBOT_DB_PATH";

/// Get the application data directory: ~/DexRobotPDA/, or ./DexRobotPDA
/// when no home directory can be determined (service accounts).
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("DexRobotPDA")
}

/// Default location of the inspection database
pub fn default_db_path() -> PathBuf {
    app_data_dir().join("inspection.db")
}

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "info,dexrobot_pda=debug,tower_http=info"
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid {var}: {value} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Runtime settings for the API server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub db_path: PathBuf,
}

impl ServerConfig {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup; blank values fall back
    /// to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let raw_addr = value(ENV_BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                var: ENV_BIND_ADDR,
                value: raw_addr.clone(),
                reason: e.to_string(),
            })?;

        let db_path = value(ENV_DB_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(default_db_path);

        Ok(Self { bind_addr, db_path })
    }
}
