//! Runner configuration from the environment

use std::env;

const DEFAULT_REDIS_HOST: &str = "127.0.0.1";
const DEFAULT_REDIS_PORT: u16 = 6379;
const DEFAULT_REDIS_DB: i64 = 0;

/// Broker connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    pub redis_host: String,
    pub redis_port: u16,
    pub redis_db: i64,
}

impl RunnerConfig {
    /// Read `REDIS_HOST`, `REDIS_PORT`, and `REDIS_DB`, falling back to the
    /// defaults for unset or unparseable values
    pub fn from_env() -> Self {
        Self {
            redis_host: env::var("REDIS_HOST").unwrap_or_else(|_| DEFAULT_REDIS_HOST.to_string()),
            redis_port: env::var("REDIS_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_REDIS_PORT),
            redis_db: env::var("REDIS_DB")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_REDIS_DB),
        }
    }

    pub fn redis_url(&self) -> String {
        format!("redis://{}:{}/{}", self.redis_host, self.redis_port, self.redis_db)
    }
}
