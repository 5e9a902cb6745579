//! Server settings read from the environment.
//!
//! | Variable                  | Default   |
//! |---------------------------|-----------|
//! | `HOST`                    | `0.0.0.0` |
//! | `PORT`                    | `8080`    |
//! | `SESSION_SECRET_KEY`      | required  |
//! | `SESSION_TOKEN_LIFE_TIME` | `30` days |
//!
//! The storage backend is chosen separately through `REPOSITORY_TYPE` or
//! `repository.toml` (see [`crate::db::factory`]).

use std::env;
use std::net::SocketAddr;

use crate::auth::{SessionError, SessionTokens, DEFAULT_TOKEN_LIFETIME_DAYS};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
    #[error("invalid bind address {0}")]
    Address(String),
    #[error(transparent)]
    Session(#[from] SessionError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub session_secret: String,
    pub session_lifetime_days: i64,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = parse_var("PORT", DEFAULT_PORT)?;
        let session_secret = match env::var("SESSION_SECRET_KEY") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => return Err(ConfigError::Missing("SESSION_SECRET_KEY")),
        };
        let session_lifetime_days =
            parse_var("SESSION_TOKEN_LIFE_TIME", DEFAULT_TOKEN_LIFETIME_DAYS)?;

        Ok(Self {
            host,
            port,
            session_secret,
            session_lifetime_days,
        })
    }

    pub fn bind_address(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse().map_err(|_| ConfigError::Address(raw))
    }

    pub fn session_tokens(&self) -> Result<SessionTokens, ConfigError> {
        Ok(SessionTokens::new(
            self.session_secret.as_bytes(),
            self.session_lifetime_days,
        )?)
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        _ => Ok(default),
    }
}
