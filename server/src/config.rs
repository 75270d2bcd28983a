//! Server configuration loaded from the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `LOST_FOUND_BIND_ADDR` | `127.0.0.1:8080` |
//! | `LOST_FOUND_CORS_ORIGINS` | `http://localhost:3939` (comma separated) |
//! | `LOST_FOUND_COOKIE_SECURE` | `false` |
//! | `LOST_FOUND_SESSION_TIMEOUT_SECS` | `1800` |
//! | `LOST_FOUND_SESSION_KEY` | generated per process |
//! | `LOST_FOUND_BCRYPT_COST` | `10` |
//! | `LOST_FOUND_ADMIN_USERNAME` / `LOST_FOUND_ADMIN_PASSWORD` | unset |

use std::time::Duration;

use derive_more::{Display, Error};
use lost_found_security_core::http::security::{DEFAULT_BCRYPT_COST, DEFAULT_SESSION_TIMEOUT};

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3939";

/// Cookie signing keys must carry at least this many bytes.
pub const MIN_SESSION_KEY_LEN: usize = 64;

#[derive(Debug, Display, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[display("invalid value for {name}: {value:?}")]
    InvalidValue {
        name: &'static str,
        value: String,
    },
    #[display("LOST_FOUND_SESSION_KEY must be at least {MIN_SESSION_KEY_LEN} bytes")]
    SessionKeyTooShort,
}

/// Credentials of the administrator seeded at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSeed {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub cors_origins: Vec<String>,
    pub cookie_secure: bool,
    pub session_timeout: Duration,
    /// `None` means a random key is generated at startup.
    pub session_key: Option<Vec<u8>>,
    pub bcrypt_cost: u32,
    pub admin: Option<AdminSeed>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            cors_origins: vec![DEFAULT_CORS_ORIGIN.to_string()],
            cookie_secure: false,
            session_timeout: DEFAULT_SESSION_TIMEOUT,
            session_key: None,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            admin: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let bind_addr = var("LOST_FOUND_BIND_ADDR").unwrap_or(defaults.bind_addr);

        let cors_origins = match var("LOST_FOUND_CORS_ORIGINS") {
            Some(s) => s
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
            None => defaults.cors_origins,
        };

        let cookie_secure = match var("LOST_FOUND_COOKIE_SECURE") {
            Some(s) => parse_bool("LOST_FOUND_COOKIE_SECURE", &s)?,
            None => defaults.cookie_secure,
        };

        let session_timeout = match var("LOST_FOUND_SESSION_TIMEOUT_SECS") {
            Some(s) => Duration::from_secs(parse_number("LOST_FOUND_SESSION_TIMEOUT_SECS", &s)?),
            None => defaults.session_timeout,
        };

        let session_key = match var("LOST_FOUND_SESSION_KEY") {
            Some(s) if s.len() < MIN_SESSION_KEY_LEN => return Err(ConfigError::SessionKeyTooShort),
            Some(s) => Some(s.into_bytes()),
            None => None,
        };

        let bcrypt_cost = match var("LOST_FOUND_BCRYPT_COST") {
            Some(s) => {
                let cost = parse_number("LOST_FOUND_BCRYPT_COST", &s)?;
                if !(4..=31).contains(&cost) {
                    return Err(ConfigError::InvalidValue {
                        name: "LOST_FOUND_BCRYPT_COST",
                        value: s,
                    });
                }
                cost as u32
            }
            None => defaults.bcrypt_cost,
        };

        let admin = match (
            var("LOST_FOUND_ADMIN_USERNAME"),
            var("LOST_FOUND_ADMIN_PASSWORD"),
        ) {
            (Some(username), Some(password)) => Some(AdminSeed { username, password }),
            _ => None,
        };

        Ok(Self {
            bind_addr,
            cors_origins,
            cookie_secure,
            session_timeout,
            session_key,
            bcrypt_cost,
            admin,
        })
    }
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            name,
            value: value.to_string(),
        }),
    }
}

fn parse_number(name: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name,
        value: value.to_string(),
    })
}
