//! Entry points for building the security pipeline.
//!
//! # Spring Equivalent
//! `HttpSecurity` builder entry points

use crate::http::security::authorizer::RequestMatcherAuthorizer;
use crate::http::security::session::{SessionAuthenticator, SessionConfig};

pub struct AuthenticationManager {}

impl AuthenticationManager {
    /// Session cookie authentication backed by a fresh session registry.
    pub fn session(config: SessionConfig) -> SessionAuthenticator {
        SessionAuthenticator::new(config)
    }
}

pub struct AuthorizationManager {}

impl AuthorizationManager {
    pub fn request_matcher() -> RequestMatcherAuthorizer {
        RequestMatcherAuthorizer::new()
    }
}
