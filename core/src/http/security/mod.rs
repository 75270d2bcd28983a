//! Security module providing authentication and authorization.
//!
//! # Spring Equivalent
//! `org.springframework.security` package
//!
//! # Module Structure
//!
//! - `ant_matcher` - Ant-style URL pattern matching (AntMatcher, RequestMatcher)
//! - `authorizer` - Ordered rule table (RequestMatcherAuthorizer)
//! - `config` - Core traits (Authenticator, Authorizer)
//! - `cors` - Cross-origin policy (CorsConfig)
//! - `crypto` - Password encoding (BCrypt, NoOp)
//! - `extractor` - Actix Web extractors (AuthenticatedUser)
//! - `form_login` - Login/logout endpoints with JSON responses
//! - `manager` - Factory methods (AuthenticationManager, AuthorizationManager)
//! - `middleware` - Security middleware (SecurityTransform)
//! - `session` - Session-based authentication with a server-side registry
//! - `user` - User model
//! - `user_details` - User lookup, management and credential verification

pub use ant_matcher::{AntMatcher, RequestMatcher};
pub use authorizer::{Access, Decision, RequestMatcherAuthorizer};
pub use config::{Authenticator, Authorizer, NextFuture};
pub use cors::CorsConfig;
pub use crypto::{
    BCryptPasswordEncoder, CryptoError, NoOpPasswordEncoder, PasswordEncoder, DEFAULT_BCRYPT_COST,
};
pub use extractor::AuthenticatedUser;
pub use form_login::{
    authentication_failure, authentication_success, FormLoginConfig, FormLoginService,
    INVALID_CREDENTIALS,
};
pub use manager::{AuthenticationManager, AuthorizationManager};
pub use middleware::SecurityTransform;
pub use session::{
    SessionAuthenticator, SessionConfig, SessionError, SessionFixationStrategy, SessionRegistry,
    SessionUser, DEFAULT_COOKIE_NAME, DEFAULT_SESSION_TIMEOUT,
};
pub use user::{User, DEFAULT_ROLE, ROLE_PREFIX};
pub use user_details::{
    DaoAuthenticationProvider, InMemoryUserDetailsService, UserDetailsError, UserDetailsManager,
    UserDetailsService,
};

pub mod ant_matcher;
pub mod authorizer;
mod config;
pub mod cors;
pub mod crypto;
pub mod extractor;
pub mod form_login;
pub mod manager;
pub mod middleware;
pub mod session;
mod user;
pub mod user_details;
