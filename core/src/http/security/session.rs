//! Session-based authentication.
//!
//! The cookie session (actix-session) only carries an opaque session id.
//! The authenticated principal lives in a server-side [`SessionRegistry`],
//! so invalidating a session at logout takes effect even if a client
//! replays an old cookie.
//!
//! # Spring Security Equivalent
//! `HttpSessionSecurityContextRepository` + `SessionRegistry` +
//! session fixation protection.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

use actix_session::storage::CookieSessionStore;
use actix_session::{Session, SessionExt, SessionMiddleware};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::ServiceRequest;
use actix_web::rt;
use actix_web::rt::task::JoinHandle;
use log::{debug, info};
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use serde::{Deserialize, Serialize};

use crate::http::security::config::Authenticator;
use crate::http::security::User;

/// Name of the session cookie.
pub const DEFAULT_COOKIE_NAME: &str = "JSESSIONID";

/// Idle timeout applied to sessions unless configured otherwise.
pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(30 * 60);

const SESSION_ID_LENGTH: usize = 30;

/// Session fixation protection applied at login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionFixationStrategy {
    /// Issue a new session key and keep the existing attributes.
    #[default]
    MigrateSession,
    /// Issue a new session key and drop the existing attributes.
    NewSession,
    /// Keep the session key (testing only).
    None,
}

/// Session settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    session_id_key: String,
    cookie_name: String,
    fixation_strategy: SessionFixationStrategy,
    timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self {
            session_id_key: "security_session_id".to_string(),
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            fixation_strategy: SessionFixationStrategy::default(),
            timeout: DEFAULT_SESSION_TIMEOUT,
        }
    }

    /// Session attribute holding the registry id.
    pub fn session_id_key(mut self, key: &str) -> Self {
        self.session_id_key = key.to_string();
        self
    }

    pub fn cookie_name(mut self, name: &str) -> Self {
        self.cookie_name = name.to_string();
        self
    }

    pub fn fixation_strategy(mut self, strategy: SessionFixationStrategy) -> Self {
        self.fixation_strategy = strategy;
        self
    }

    /// Idle timeout after which a registered session stops authenticating.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn get_session_id_key(&self) -> &str {
        &self.session_id_key
    }

    pub fn get_cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn get_fixation_strategy(&self) -> SessionFixationStrategy {
        self.fixation_strategy
    }

    pub fn get_timeout(&self) -> Duration {
        self.timeout
    }

    /// Builds the cookie session middleware carrying the session id.
    ///
    /// The cookie is HTTP-only and `SameSite=Lax`; `secure` should be
    /// enabled whenever the service is reached over HTTPS.
    pub fn session_middleware(
        &self,
        key: Key,
        secure: bool,
    ) -> SessionMiddleware<CookieSessionStore> {
        SessionMiddleware::builder(CookieSessionStore::default(), key)
            .cookie_name(self.cookie_name.clone())
            .cookie_http_only(true)
            .cookie_same_site(SameSite::Lax)
            .cookie_secure(secure)
            .build()
    }
}

/// Principal stored for a live session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub username: String,
    pub roles: Vec<String>,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            username: user.get_username().to_string(),
            roles: user.get_roles().to_vec(),
        }
    }
}

impl From<&SessionUser> for User {
    fn from(su: &SessionUser) -> Self {
        User::new(su.username.clone(), String::new()).roles(su.roles.as_slice())
    }
}

struct SessionEntry {
    user: SessionUser,
    last_accessed: Instant,
}

/// Server-side table of authenticated sessions.
///
/// Cheap to clone; all clones share the same table.
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<String, SessionEntry>>>,
    timeout: Duration,
}

impl SessionRegistry {
    pub fn new(timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            timeout,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, SessionEntry>> {
        self.sessions.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, SessionEntry>> {
        self.sessions.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Registers a new session for `user` and returns its id.
    /// Sessions idle past the timeout are dropped first.
    pub fn register(&self, user: &User) -> String {
        let id: String = thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SESSION_ID_LENGTH)
            .map(char::from)
            .collect();
        let mut sessions = self.write();
        let timeout = self.timeout;
        sessions.retain(|_, entry| entry.last_accessed.elapsed() < timeout);
        sessions.insert(
            id.clone(),
            SessionEntry {
                user: SessionUser::from(user),
                last_accessed: Instant::now(),
            },
        );
        id
    }

    /// Returns the session's principal and refreshes its access time.
    /// Expired sessions are removed and resolve to `None`.
    pub fn resolve(&self, id: &str) -> Option<SessionUser> {
        let mut sessions = self.write();
        let expired = match sessions.get_mut(id) {
            None => return None,
            Some(entry) if entry.last_accessed.elapsed() >= self.timeout => true,
            Some(entry) => {
                entry.last_accessed = Instant::now();
                return Some(entry.user.clone());
            }
        };
        if expired {
            debug!("Session expired after {:?} of inactivity", self.timeout);
            sessions.remove(id);
        }
        None
    }

    /// Removes one session. Returns whether it existed.
    pub fn invalidate(&self, id: &str) -> bool {
        self.write().remove(id).is_some()
    }

    /// Removes every session belonging to `username`.
    pub fn invalidate_user(&self, username: &str) -> usize {
        let mut sessions = self.write();
        let before = sessions.len();
        sessions.retain(|_, entry| entry.user.username != username);
        before - sessions.len()
    }

    /// Drops all sessions idle for longer than the timeout.
    pub fn purge_expired(&self) -> usize {
        let mut sessions = self.write();
        let before = sessions.len();
        let timeout = self.timeout;
        sessions.retain(|_, entry| entry.last_accessed.elapsed() < timeout);
        before - sessions.len()
    }

    pub fn active_sessions(&self) -> usize {
        self.read().len()
    }

    /// Purges expired sessions every `period` on the current actix runtime.
    pub fn start_purge_task(&self, period: Duration) -> JoinHandle<()> {
        let registry = self.clone();
        rt::spawn(async move {
            let mut ticker = rt::time::interval(period);
            loop {
                ticker.tick().await;
                let purged = registry.purge_expired();
                if purged > 0 {
                    debug!("Purged {} expired session(s)", purged);
                }
            }
        })
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TIMEOUT)
    }
}

/// Authenticates requests from the session cookie.
///
/// Requires `SessionMiddleware` to wrap the security middleware.
#[derive(Clone)]
pub struct SessionAuthenticator {
    config: SessionConfig,
    registry: SessionRegistry,
}

impl SessionAuthenticator {
    pub fn new(config: SessionConfig) -> Self {
        let registry = SessionRegistry::new(config.get_timeout());
        Self { config, registry }
    }

    /// Shares an existing registry.
    pub fn with_registry(config: SessionConfig, registry: SessionRegistry) -> Self {
        Self { config, registry }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    fn current_id(&self, session: &Session) -> Option<String> {
        session
            .get::<String>(&self.config.session_id_key)
            .ok()
            .flatten()
    }

    /// Resolves the principal bound to this cookie session, if any.
    pub fn current_user(&self, session: &Session) -> Option<User> {
        let id = self.current_id(session)?;
        self.registry.resolve(&id).map(|su| User::from(&su))
    }

    /// Binds `user` to the session, applying fixation protection first.
    pub fn login(&self, session: &Session, user: &User) -> Result<(), SessionError> {
        if let Some(previous) = self.current_id(session) {
            self.registry.invalidate(&previous);
        }

        match self.config.fixation_strategy {
            SessionFixationStrategy::MigrateSession => session.renew(),
            SessionFixationStrategy::NewSession => {
                session.clear();
                session.renew();
            }
            SessionFixationStrategy::None => {}
        }

        let id = self.registry.register(user);
        session
            .insert(self.config.session_id_key.as_str(), &id)
            .map_err(|e| {
                self.registry.invalidate(&id);
                SessionError::InsertError(e.to_string())
            })?;

        info!("Session established for {}", user.get_username());
        Ok(())
    }

    /// Invalidates the server-side session and purges the cookie session.
    /// Returns whether an authenticated session was present.
    pub fn logout(&self, session: &Session) -> bool {
        let was_authenticated = self
            .current_id(session)
            .map(|id| self.registry.invalidate(&id))
            .unwrap_or(false);
        session.purge();
        was_authenticated
    }
}

impl Authenticator for SessionAuthenticator {
    fn get_user(&self, req: &ServiceRequest) -> Option<User> {
        self.current_user(&req.get_session())
    }
}

/// Session-related errors.
#[derive(Debug)]
pub enum SessionError {
    InsertError(String),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::InsertError(e) => write!(f, "Session insert error: {}", e),
        }
    }
}

impl std::error::Error for SessionError {}
