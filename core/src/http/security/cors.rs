//! CORS policy.
//!
//! # Spring Equivalent
//! `CorsConfiguration` registered for `/**` through
//! `UrlBasedCorsConfigurationSource`.

use actix_cors::Cors;

/// Origin entry that allows every origin.
pub const ANY_ORIGIN: &str = "*";

/// Cross-origin settings applied to every path.
///
/// Translated into an [`actix_cors::Cors`] middleware, which answers
/// preflight requests before the security middleware runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsConfig {
    allowed_origins: Vec<String>,
    allow_any_method: bool,
    allow_any_header: bool,
    allow_credentials: bool,
    max_age: Option<usize>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CorsConfig {
    /// A restrictive configuration: no origins, no methods, no credentials.
    pub fn new() -> Self {
        Self {
            allowed_origins: Vec::new(),
            allow_any_method: false,
            allow_any_header: false,
            allow_credentials: false,
            max_age: None,
        }
    }

    /// Adds an allowed origin; [`ANY_ORIGIN`] allows every origin.
    pub fn allowed_origin(mut self, origin: &str) -> Self {
        let origin = origin.trim_end_matches('/').to_string();
        if !self.allowed_origins.contains(&origin) {
            self.allowed_origins.push(origin);
        }
        self
    }

    pub fn allow_any_method(mut self) -> Self {
        self.allow_any_method = true;
        self
    }

    pub fn allow_any_header(mut self) -> Self {
        self.allow_any_header = true;
        self
    }

    pub fn allow_credentials(mut self, allow: bool) -> Self {
        self.allow_credentials = allow;
        self
    }

    /// Preflight cache duration in seconds.
    pub fn max_age(mut self, seconds: usize) -> Self {
        self.max_age = Some(seconds);
        self
    }

    pub fn get_allowed_origins(&self) -> &[String] {
        &self.allowed_origins
    }

    pub fn is_allow_credentials(&self) -> bool {
        self.allow_credentials
    }

    /// Builds the middleware. Call once per worker.
    pub fn build(&self) -> Cors {
        let mut cors = Cors::default();
        for origin in &self.allowed_origins {
            cors = if origin == ANY_ORIGIN {
                cors.allow_any_origin()
            } else {
                cors.allowed_origin(origin)
            };
        }
        if self.allow_any_method {
            cors = cors.allow_any_method();
        }
        if self.allow_any_header {
            cors = cors.allow_any_header();
        }
        if self.allow_credentials {
            cors = cors.supports_credentials();
        }
        cors.max_age(self.max_age)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_normalizes_and_dedupes_origins() {
        let config = CorsConfig::new()
            .allowed_origin("http://localhost:3939/")
            .allowed_origin("http://localhost:3939")
            .allow_credentials(true);

        assert_eq!(config.get_allowed_origins(), &["http://localhost:3939".to_string()]);
        assert!(config.is_allow_credentials());
    }

    #[test]
    fn test_default_is_restrictive() {
        let config = CorsConfig::default();
        assert!(config.get_allowed_origins().is_empty());
        assert!(!config.is_allow_credentials());
    }
}
