use std::str::FromStr;

use anyhow::{bail, Context};
use axum::http::HeaderValue;
use pulse_core::lifecycle::DEFAULT_REPAIR_LEAD_DAYS;

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable, multi-field lines.
    Pretty,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => bail!("LOG_FORMAT must be 'pretty' or 'json' (got '{other}')"),
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields except the database URL have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Postgres connection string (required).
    pub database_url: String,
    /// Upper bound on pooled connections (default: `20`).
    pub database_max_connections: u32,
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Days between scheduling a repair and its planned date (default: `7`).
    pub repair_lead_days: i64,
    /// Tracing output format (default: pretty).
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                 |
    /// |----------------------------|-------------------------|
    /// | `DATABASE_URL`             | required                |
    /// | `DATABASE_MAX_CONNECTIONS` | `20`                    |
    /// | `HOST`                     | `0.0.0.0`               |
    /// | `PORT`                     | `3000`                  |
    /// | `CORS_ORIGINS`             | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                    |
    /// | `REPAIR_LEAD_DAYS`         | `7`                     |
    /// | `LOG_FORMAT`               | `pretty`                |
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let database_max_connections: u32 =
            env_or("DATABASE_MAX_CONNECTIONS", &pulse_db::DEFAULT_MAX_CONNECTIONS.to_string())?
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a valid u32")?;

        let host = env_or("HOST", "0.0.0.0")?;

        let port: u16 = env_or("PORT", "3000")?
            .parse()
            .context("PORT must be a valid u16")?;

        let cors_origins = parse_origins(&env_or("CORS_ORIGINS", "http://localhost:5173")?)?;

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", "30")?
            .parse()
            .context("REQUEST_TIMEOUT_SECS must be a valid u64")?;

        let repair_lead_days: i64 =
            env_or("REPAIR_LEAD_DAYS", &DEFAULT_REPAIR_LEAD_DAYS.to_string())?
                .parse()
                .context("REPAIR_LEAD_DAYS must be a whole number of days")?;
        if !(0..=365).contains(&repair_lead_days) {
            bail!("REPAIR_LEAD_DAYS must be between 0 and 365 (got {repair_lead_days})");
        }

        let log_format: LogFormat = env_or("LOG_FORMAT", "pretty")?.parse()?;

        Ok(Self {
            database_url,
            database_max_connections,
            host,
            port,
            cors_origins,
            request_timeout_secs,
            repair_lead_days,
            log_format,
        })
    }
}

fn env_or(key: &str, default: &str) -> anyhow::Result<String> {
    match std::env::var(key) {
        Ok(value) => Ok(value),
        Err(std::env::VarError::NotPresent) => Ok(default.to_string()),
        Err(e) => Err(e).with_context(|| format!("{key} is not valid unicode")),
    }
}

/// Split a comma-separated origin list, rejecting values that cannot be
/// used as an `Access-Control-Allow-Origin` header.
fn parse_origins(raw: &str) -> anyhow::Result<Vec<String>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|origin| {
            HeaderValue::from_str(origin)
                .map(|_| origin.to_string())
                .with_context(|| format!("Invalid CORS origin '{origin}'"))
        })
        .collect()
}
