//! Environment-driven application configuration.
//!
//! Required variables abort startup when missing; the process would only
//! fail later and less legibly without them.

use std::env;
use std::fmt;

/// A required environment variable was missing or empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingEnv {
    name: &'static str,
}

impl fmt::Display for MissingEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "environment variable {} must be set", self.name)
    }
}

impl std::error::Error for MissingEnv {}

fn must_get(name: &'static str) -> Result<String, MissingEnv> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(MissingEnv { name }),
    }
}

fn get_or(name: &str, fallback: &str) -> String {
    env::var(name).unwrap_or_else(|_| fallback.to_owned())
}

/// Runtime configuration assembled from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds, e.g. `0.0.0.0:8080`.
    pub server_addr: String,
    /// Postgres connection URL.
    pub database_url: String,
    /// Redis connection URL for the session store.
    pub redis_url: String,
}

impl AppConfig {
    /// Read configuration, failing on any missing required variable.
    ///
    /// Required: `DATABASE_HOST`, `DATABASE_PORT`, `POSTGRES_DB`,
    /// `POSTGRES_USER`, `POSTGRES_PASSWORD`, `REDIS_ADDR`. Optional:
    /// `SERVER_ADDR` (default `0.0.0.0:8080`), `REDIS_PASSWORD`.
    pub fn from_env() -> Result<Self, MissingEnv> {
        let host = must_get("DATABASE_HOST")?;
        let port = must_get("DATABASE_PORT")?;
        let dbname = must_get("POSTGRES_DB")?;
        let user = must_get("POSTGRES_USER")?;
        let password = must_get("POSTGRES_PASSWORD")?;
        let database_url =
            format!("postgres://{user}:{password}@{host}:{port}/{dbname}?sslmode=disable");

        let redis_addr = must_get("REDIS_ADDR")?;
        let redis_url = match env::var("REDIS_PASSWORD") {
            Ok(redis_password) if !redis_password.is_empty() => {
                format!("redis://:{redis_password}@{redis_addr}")
            }
            _ => format!("redis://{redis_addr}"),
        };

        Ok(Self {
            server_addr: get_or("SERVER_ADDR", "0.0.0.0:8080"),
            database_url,
            redis_url,
        })
    }
}
