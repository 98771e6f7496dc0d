use std::fmt;
use std::str::FromStr;

use chrono::TimeDelta;

use hbnb_core::AppError;
use hbnb_core::token::DEFAULT_TOKEN_TTL;

const MIN_SECRET_LEN: usize = 16;

/// Which storage backend the server runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    /// PostgreSQL via `DATABASE_URL`.
    Db,
    /// Process-local maps; contents are lost on restart.
    Memory,
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageKind::Db => write!(f, "db"),
            StorageKind::Memory => write!(f, "memory"),
        }
    }
}

impl FromStr for StorageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "db" => Ok(StorageKind::Db),
            "memory" => Ok(StorageKind::Memory),
            _ => Err(format!("Unknown storage type: {s}")),
        }
    }
}

/// Server settings read from `HBNB_*` environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl: TimeDelta,
    pub storage: StorageKind,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    ///
    /// - `HBNB_API_HOST` (default `0.0.0.0`)
    /// - `HBNB_API_PORT` (default `5050`)
    /// - `HBNB_JWT_SECRET` (required, at least 16 bytes)
    /// - `HBNB_JWT_EXPIRY_MINUTES` (default 15)
    /// - `HBNB_TYPE_STORAGE` (`db` or `memory`, default `db`)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let host = lookup("HBNB_API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = match lookup("HBNB_API_PORT") {
            None => 5050,
            Some(raw) => raw.parse().map_err(|_| {
                AppError::ConfigError(format!("Invalid HBNB_API_PORT '{raw}'"))
            })?,
        };

        let jwt_secret = lookup("HBNB_JWT_SECRET")
            .ok_or_else(|| AppError::ConfigError("HBNB_JWT_SECRET must be set".into()))?;
        if jwt_secret.len() < MIN_SECRET_LEN {
            return Err(AppError::ConfigError(format!(
                "HBNB_JWT_SECRET must be at least {MIN_SECRET_LEN} bytes"
            )));
        }

        let token_ttl = match lookup("HBNB_JWT_EXPIRY_MINUTES") {
            None => DEFAULT_TOKEN_TTL,
            Some(raw) => {
                let minutes: i64 = raw.parse().map_err(|_| {
                    AppError::ConfigError(format!("Invalid HBNB_JWT_EXPIRY_MINUTES '{raw}'"))
                })?;
                if minutes <= 0 {
                    return Err(AppError::ConfigError(
                        "HBNB_JWT_EXPIRY_MINUTES must be positive".into(),
                    ));
                }
                TimeDelta::minutes(minutes)
            }
        };

        let storage = match lookup("HBNB_TYPE_STORAGE") {
            None => StorageKind::Db,
            Some(raw) => raw.parse().map_err(AppError::ConfigError)?,
        };

        Ok(Self {
            host,
            port,
            jwt_secret,
            token_ttl,
            storage,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
