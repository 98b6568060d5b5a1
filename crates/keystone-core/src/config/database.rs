//! Database connection and startup-wait configuration.

use serde::{Deserialize, Serialize};

/// Database connection pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    /// Idle connection timeout in seconds.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
    /// Refuse to start unless the connection URL requires TLS.
    #[serde(default)]
    pub require_ssl: bool,
    /// Startup wait behavior when the database is not yet reachable.
    #[serde(default)]
    pub startup: StartupConfig,
}

/// Startup wait with exponential backoff.
///
/// The server retries the initial connection until the retry budget or the
/// overall deadline is exhausted, whichever comes first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartupConfig {
    /// Skip the startup wait and fail on the first connection error.
    #[serde(default)]
    pub skip_wait: bool,
    /// Maximum number of connection attempts.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Initial delay between attempts in milliseconds.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Upper bound for the backoff delay in milliseconds.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Overall deadline for the startup wait in seconds.
    #[serde(default = "default_overall_timeout")]
    pub overall_timeout_seconds: u64,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            skip_wait: false,
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            overall_timeout_seconds: default_overall_timeout(),
        }
    }
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_idle_timeout() -> u64 {
    300
}

fn default_max_retries() -> u32 {
    10
}

fn default_base_delay_ms() -> u64 {
    200
}

fn default_max_delay_ms() -> u64 {
    5000
}

fn default_overall_timeout() -> u64 {
    60
}
