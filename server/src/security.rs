//! The application's security policy.
//!
//! # Spring Security Equivalent
//! ```java
//! http.csrf(AbstractHttpConfigurer::disable)
//!     .cors(Customizer.withDefaults())
//!     .authorizeHttpRequests(auth -> auth
//!         .requestMatchers(HttpMethod.POST,
//!             "/lost-found/register", "/lost-found/login", "/lost-found/logout").permitAll()
//!         .requestMatchers(HttpMethod.GET, "/lost-found/user/details").authenticated()
//!         // ...
//!         .anyRequest().authenticated())
//!     .formLogin(...)
//!     .logout(...);
//! ```

use std::sync::Arc;

use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::Key;
use actix_web::http::Method;
use log::warn;
use lost_found_security_core::http::security::{
    Access, AuthenticationManager, AuthorizationManager, BCryptPasswordEncoder, CorsConfig,
    DaoAuthenticationProvider, FormLoginConfig, FormLoginService, InMemoryUserDetailsService,
    PasswordEncoder, RequestMatcherAuthorizer, SessionAuthenticator, SessionConfig,
    SessionFixationStrategy, DEFAULT_COOKIE_NAME,
};

use crate::config::{ConfigError, ServerConfig};
use crate::model::Role;

pub const LOGIN_URL: &str = "/lost-found/login";
pub const LOGOUT_URL: &str = "/lost-found/logout";

/// Preflight responses may be cached this long (seconds).
const CORS_MAX_AGE: usize = 1800;

/// Ordered access rules; the first matching rule decides.
pub fn authorization_rules() -> RequestMatcherAuthorizer {
    let admin = || Access::has_role(Role::Admin.as_str());
    let student = || Access::has_role(Role::Student.as_str());

    AuthorizationManager::request_matcher()
        .request_matchers(
            Some(Method::POST),
            &["/lost-found/register", LOGIN_URL, LOGOUT_URL],
            Access::PermitAll,
        )
        .request_matchers(
            Some(Method::GET),
            &["/lost-found/user/details"],
            Access::Authenticated,
        )
        .request_matchers(
            Some(Method::GET),
            &["/lost-found/lost-items", "/lost-found/found-items"],
            admin(),
        )
        .request_matchers(
            None,
            &["/lost-found/admin/students", "/lost-found/admin/student/**"],
            admin(),
        )
        .request_matchers(
            Some(Method::POST),
            &["/lost-found/lost-items", "/lost-found/found-items"],
            student(),
        )
        .request_matchers(
            None,
            &["/lost-found/lost-items/user", "/lost-found/found-items/user"],
            student(),
        )
        .request_matchers(None, &["/lost-found/fuzzy/**"], student())
        .request_matchers(
            None,
            &["/lost-found/lost-items/{id}", "/lost-found/found-items/{id}"],
            student(),
        )
        .request_matchers(Some(Method::DELETE), &["/lost-found/lost-items/{id}"], student())
        .any_request(Access::Authenticated)
}

pub fn cors_config(origins: &[String]) -> CorsConfig {
    origins
        .iter()
        .fold(CorsConfig::new(), |cors, origin| cors.allowed_origin(origin))
        .allow_any_method()
        .allow_any_header()
        .allow_credentials(true)
        .max_age(CORS_MAX_AGE)
}

pub fn form_login_config() -> FormLoginConfig {
    FormLoginConfig::new()
        .login_processing_url(LOGIN_URL)
        .logout_url(LOGOUT_URL)
        .delete_cookies(&[DEFAULT_COOKIE_NAME])
}

/// Everything the HTTP pipeline needs, built once and cloned per worker.
#[derive(Clone)]
pub struct SecurityComponents {
    users: InMemoryUserDetailsService,
    encoder: Arc<dyn PasswordEncoder>,
    authenticator: SessionAuthenticator,
    authorizer: RequestMatcherAuthorizer,
    form_login: FormLoginService,
    cors: CorsConfig,
    key: Key,
    cookie_secure: bool,
}

impl SecurityComponents {
    /// Uses BCrypt with the configured cost.
    pub fn new(config: &ServerConfig) -> Result<Self, ConfigError> {
        let encoder = Arc::new(BCryptPasswordEncoder::with_cost(config.bcrypt_cost));
        Self::with_encoder(config, encoder)
    }

    pub fn with_encoder(
        config: &ServerConfig,
        encoder: Arc<dyn PasswordEncoder>,
    ) -> Result<Self, ConfigError> {
        let key = match &config.session_key {
            Some(bytes) => {
                Key::try_from(bytes.as_slice()).map_err(|_| ConfigError::SessionKeyTooShort)?
            }
            None => {
                warn!("LOST_FOUND_SESSION_KEY not set; sessions will not survive a restart");
                Key::generate()
            }
        };

        let users = InMemoryUserDetailsService::new();
        let session_config = SessionConfig::new()
            .fixation_strategy(SessionFixationStrategy::MigrateSession)
            .timeout(config.session_timeout);
        let authenticator = AuthenticationManager::session(session_config);
        let provider =
            DaoAuthenticationProvider::new(Arc::new(users.clone()), Arc::clone(&encoder));
        let form_login =
            FormLoginService::new(form_login_config(), provider, authenticator.clone());

        Ok(Self {
            users,
            encoder,
            authenticator,
            authorizer: authorization_rules(),
            form_login,
            cors: cors_config(&config.cors_origins),
            key,
            cookie_secure: config.cookie_secure,
        })
    }

    pub fn users(&self) -> &InMemoryUserDetailsService {
        &self.users
    }

    pub fn encoder(&self) -> &Arc<dyn PasswordEncoder> {
        &self.encoder
    }

    pub fn authenticator(&self) -> &SessionAuthenticator {
        &self.authenticator
    }

    pub fn authorizer(&self) -> &RequestMatcherAuthorizer {
        &self.authorizer
    }

    pub fn form_login(&self) -> &FormLoginService {
        &self.form_login
    }

    pub fn cors(&self) -> &CorsConfig {
        &self.cors
    }

    pub fn session_middleware(&self) -> SessionMiddleware<CookieSessionStore> {
        self.authenticator
            .config()
            .session_middleware(self.key.clone(), self.cookie_secure)
    }
}
