//! Configuration management via environment variables
//!
//! The only functional tunable is the listening port. Everything else is a
//! fixed constant of the probe.

use std::time::Duration;
use tracing::warn;

/// JSON-RPC endpoint used when the request does not name one
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

/// Listen port used when `PORT` is unset
pub const DEFAULT_PORT: u16 = 9999;

/// Bind address (all interfaces)
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Wait between the two block number samples
pub const SAMPLE_INTERVAL: Duration = Duration::from_secs(30);

/// Environment variable holding the listen port
pub const PORT_ENV: &str = "PORT";

/// Get an environment variable, treating an empty value as unset
pub fn get_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

/// Get an environment variable parsed to a specific type
///
/// Returns `default` if the variable is unset. An unparsable value is logged
/// and also falls back to `default`.
pub fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    match get_env(name) {
        Some(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                warn!(
                    "Environment variable '{}' has invalid value '{}', using default",
                    name, raw
                );
                default
            }
        },
        None => default,
    }
}

/// サーバー起動設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Listen port
    pub port: u16,
}

impl ServerConfig {
    /// Load server configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: get_env_parse(PORT_ENV, DEFAULT_PORT),
        }
    }

    /// `host:port` 形式のバインドアドレス
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
