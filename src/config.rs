use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

use crate::error::AppError;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://campusconnect.db";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Reads settings from the environment (after `.env` has been loaded).
    pub fn load() -> Result<Self, AppError> {
        Ok(Self {
            database_url: try_load("DATABASE_URL", DEFAULT_DATABASE_URL)?,
            host: try_load("HOST", "127.0.0.1")?,
            port: try_load("PORT", "3000")?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn fallback_bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port.saturating_add(1))
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, AppError>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse().map_err(|e| {
        warn!("Invalid {key} value: {e}");
        AppError::Config(format!("invalid {key}: {e}"))
    })
}
