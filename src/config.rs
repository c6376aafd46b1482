use std::{env, str::FromStr, time::Duration};

use anyhow::{Context, Result, anyhow};

use crate::auth::password::CredentialScheme;

/// Requests per minute per client IP; `0` disables the limiter.
#[derive(Debug, Clone, Copy, Default)]
pub struct RateLimits {
    pub login_per_min: u32,
    pub attendance_per_min: u32,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_addr: String,
    pub db_max_connections: u32,
    pub run_migrations: bool,

    pub credential_scheme: CredentialScheme,

    // Per-employee attendance locks
    pub lock_capacity: u64,
    pub lock_ttl: Duration,

    pub rate_limits: RateLimits,

    pub log_dir: String,
    pub log_level: String,
}

fn var_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{key}={raw:?} is invalid: {e}")),
        Err(_) => Ok(default),
    }
}

impl Config {
    /// Reads configuration from the environment (and `.env` when present).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:8069".to_string()),
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            db_max_connections: var_or("DB_MAX_CONNECTIONS", 5)?,
            run_migrations: var_or("RUN_MIGRATIONS", false)?,

            credential_scheme: var_or("CREDENTIAL_SCHEME", CredentialScheme::Plaintext)?,

            lock_capacity: var_or("LOCK_CAPACITY", 10_000)?,
            lock_ttl: Duration::from_secs(var_or("LOCK_TTL_SECS", 60)?),

            rate_limits: RateLimits {
                login_per_min: var_or("RATE_LOGIN_PER_MIN", 0)?,
                attendance_per_min: var_or("RATE_ATTENDANCE_PER_MIN", 0)?,
            },

            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }
}
