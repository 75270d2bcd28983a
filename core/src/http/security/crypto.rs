//! Password encoding.
//!
//! # Spring Security Equivalent
//! `org.springframework.security.crypto.password.PasswordEncoder`

use std::fmt;

/// Default BCrypt work factor, the same strength Spring's encoder uses.
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Trait for encoding and verifying passwords.
///
/// # Example
/// ```
/// use lost_found_security_core::http::security::crypto::{BCryptPasswordEncoder, PasswordEncoder};
///
/// let encoder = BCryptPasswordEncoder::with_cost(4);
/// let hash = encoder.encode("secret").unwrap();
/// assert!(encoder.matches("secret", &hash));
/// assert!(!encoder.matches("wrong", &hash));
/// ```
pub trait PasswordEncoder: Send + Sync {
    /// Encodes the raw password.
    fn encode(&self, raw_password: &str) -> Result<String, CryptoError>;

    /// Verifies a raw password against an encoded one. Malformed hashes
    /// never match.
    fn matches(&self, raw_password: &str, encoded_password: &str) -> bool;
}

/// BCrypt password encoder.
///
/// # Spring Security Equivalent
/// `BCryptPasswordEncoder`
#[derive(Clone, Debug)]
pub struct BCryptPasswordEncoder {
    cost: u32,
}

impl BCryptPasswordEncoder {
    pub fn new() -> Self {
        Self {
            cost: DEFAULT_BCRYPT_COST,
        }
    }

    /// Cost is clamped to the range BCrypt accepts (4..=31).
    pub fn with_cost(cost: u32) -> Self {
        Self {
            cost: cost.clamp(4, 31),
        }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BCryptPasswordEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordEncoder for BCryptPasswordEncoder {
    fn encode(&self, raw_password: &str) -> Result<String, CryptoError> {
        bcrypt::hash(raw_password, self.cost).map_err(|e| CryptoError(e.to_string()))
    }

    fn matches(&self, raw_password: &str, encoded_password: &str) -> bool {
        bcrypt::verify(raw_password, encoded_password).unwrap_or(false)
    }
}

/// Plain-text encoder, for tests only.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpPasswordEncoder;

impl PasswordEncoder for NoOpPasswordEncoder {
    fn encode(&self, raw_password: &str) -> Result<String, CryptoError> {
        Ok(raw_password.to_string())
    }

    fn matches(&self, raw_password: &str, encoded_password: &str) -> bool {
        raw_password == encoded_password
    }
}

/// Hashing failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CryptoError(pub String);

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Password encoding failed: {}", self.0)
    }
}

impl std::error::Error for CryptoError {}
