use std::env;

use anyhow::Context;
use secrecy::SecretString;

/// Settings the auth and OTP services read at request time.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub otp_ttl_minutes: i64,
}

impl AuthConfig {
    pub fn otp_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.otp_ttl_minutes)
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.token_ttl_hours)
    }
}

/// SMTP relay used to deliver OTP emails.
#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: SecretString,
    pub from_address: String,
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("from_address", &self.from_address)
            .finish()
    }
}

impl SmtpConfig {
    /// `None` when `SMTP_HOST` is unset; the remaining variables are then required.
    pub fn from_env() -> anyhow::Result<Option<Self>> {
        let Ok(host) = env::var("SMTP_HOST") else {
            return Ok(None);
        };
        Ok(Some(Self {
            host,
            port: parse_or("SMTP_PORT", 587),
            username: env::var("SMTP_USERNAME").context("SMTP_USERNAME is not set")?,
            password: SecretString::from(
                env::var("SMTP_PASSWORD").context("SMTP_PASSWORD is not set")?,
            ),
            from_address: env::var("SMTP_FROM").context("SMTP_FROM is not set")?,
        }))
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub host: String,
    pub port: u16,
    pub auth: AuthConfig,
    pub smtp: Option<SmtpConfig>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET is not set")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parse_or("APP_PORT", 3000);
        Ok(Self {
            database_url,
            max_connections: parse_or("DB_MAX_CONNECTIONS", 10),
            host,
            port,
            auth: AuthConfig {
                jwt_secret,
                token_ttl_hours: parse_or("JWT_TTL_HOURS", 24),
                otp_ttl_minutes: parse_or("OTP_TTL_MINUTES", 60),
            },
            smtp: SmtpConfig::from_env()?,
        })
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
