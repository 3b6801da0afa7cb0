//! Process configuration, read once from the environment at startup.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

use quill_auth::HashCost;

pub const JWT_SECRET: &str = "QUILL_JWT_SECRET";
pub const TOKEN_TTL_SECS: &str = "QUILL_TOKEN_TTL_SECS";
pub const HASH_MEMORY_KIB: &str = "QUILL_HASH_MEMORY_KIB";
pub const HASH_ITERATIONS: &str = "QUILL_HASH_ITERATIONS";
pub const HASH_PARALLELISM: &str = "QUILL_HASH_PARALLELISM";
pub const STORE_TIMEOUT_MS: &str = "QUILL_STORE_TIMEOUT_MS";
pub const BIND_ADDR: &str = "QUILL_BIND_ADDR";
pub const DATABASE_URL: &str = "DATABASE_URL";

const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be set")]
    Missing { key: &'static str },

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Clone)]
pub struct AppConfig {
    pub jwt_secret: String,
    pub token_ttl: chrono::Duration,
    pub hash_cost: HashCost,
    pub store_timeout: Duration,
    pub bind_addr: SocketAddr,
    /// Postgres stores when set; in-memory stores otherwise.
    pub database_url: Option<String>,
}

impl core::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AppConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("hash_cost", &self.hash_cost)
            .field("store_timeout", &self.store_timeout)
            .field("bind_addr", &self.bind_addr)
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let jwt_secret = match get(JWT_SECRET) {
            Some(secret) => secret,
            None if cfg!(debug_assertions) => {
                tracing::warn!("{JWT_SECRET} not set; using insecure dev default");
                DEV_JWT_SECRET.to_string()
            }
            None => return Err(ConfigError::Missing { key: JWT_SECRET }),
        };

        let ttl_secs: i64 = parse_or(TOKEN_TTL_SECS, get(TOKEN_TTL_SECS), 3600)?;
        if ttl_secs <= 0 {
            return Err(ConfigError::Invalid {
                key: TOKEN_TTL_SECS,
                reason: "must be positive".to_string(),
            });
        }

        let defaults = HashCost::default();
        let hash_cost = HashCost {
            memory_kib: parse_or(HASH_MEMORY_KIB, get(HASH_MEMORY_KIB), defaults.memory_kib)?,
            iterations: parse_or(HASH_ITERATIONS, get(HASH_ITERATIONS), defaults.iterations)?,
            parallelism: parse_or(HASH_PARALLELISM, get(HASH_PARALLELISM), defaults.parallelism)?,
        };

        let store_timeout_ms: u64 = parse_or(STORE_TIMEOUT_MS, get(STORE_TIMEOUT_MS), 5000)?;
        let bind_addr = parse_or(BIND_ADDR, get(BIND_ADDR), SocketAddr::from(([0, 0, 0, 0], 8080)))?;

        Ok(Self {
            jwt_secret,
            token_ttl: chrono::Duration::seconds(ttl_secs),
            hash_cost,
            store_timeout: Duration::from_millis(store_timeout_ms),
            bind_addr,
            database_url: get(DATABASE_URL),
        })
    }
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: core::str::FromStr,
    T::Err: core::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
    }
}
