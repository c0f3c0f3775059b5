//! Runtime settings loaded from environment variables (a `.env` file is honoured by the server binary).

use crate::error::ConfigError;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/marksheet";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    /// HMAC secret for bearer tokens. Required.
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    /// Token lifetime. `None` issues tokens without an `exp` claim.
    pub token_ttl: Option<Duration>,
    pub db_max_connections: u32,
    /// `dev` turns on per-request HTTP tracing.
    pub app_env: String,
    pub body_limit_bytes: usize,
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`; unset and empty values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let token_ttl = match get("TOKEN_TTL_SECS") {
            Some(raw) => Some(Duration::from_secs(parse("TOKEN_TTL_SECS", &raw)?)),
            None => None,
        };

        Ok(Settings {
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into()),
            jwt_secret,
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: get("PORT").map(|v| parse("PORT", &v)).transpose()?.unwrap_or(DEFAULT_PORT),
            token_ttl,
            db_max_connections: get("DB_MAX_CONNECTIONS")
                .map(|v| parse("DB_MAX_CONNECTIONS", &v))
                .transpose()?
                .unwrap_or(5),
            app_env: get("APP_ENV").unwrap_or_else(|| "production".into()),
            body_limit_bytes: get("BODY_LIMIT_BYTES")
                .map(|v| parse("BODY_LIMIT_BYTES", &v))
                .transpose()?
                .unwrap_or(DEFAULT_BODY_LIMIT),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_dev(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("dev")
    }
}

fn parse<T: FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Invalid {
        key,
        value: raw.to_string(),
    })
}
