//! User model shared by the authentication provider, the session and the
//! authorization rules.
//!
//! # Spring Equivalent
//! `UserDetails`

use std::fmt;

/// Prefix carried by role authorities.
pub const ROLE_PREFIX: &str = "ROLE_";

/// Role reported at login when the user has no role at all.
pub const DEFAULT_ROLE: &str = "USER";

/// An account known to the security layer.
///
/// Roles are kept bare (`"ADMIN"`, `"STUDENT"`); the `ROLE_` form is only
/// produced by [`User::granted_authorities`].
///
/// # Example
/// ```
/// use lost_found_security_core::http::security::User;
///
/// let user = User::new("alice", "{noop}secret").roles(&["STUDENT"]);
///
/// assert!(user.has_role("STUDENT"));
/// assert_eq!(user.primary_role(), "STUDENT");
/// assert_eq!(user.granted_authorities(), vec!["ROLE_STUDENT".to_string()]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    username: String,
    password: String,
    roles: Vec<String>,
    enabled: bool,
}

impl User {
    /// Creates an enabled user holding an already encoded password.
    pub fn new(username: impl Into<String>, encoded_password: impl Into<String>) -> Self {
        User {
            username: username.into(),
            password: encoded_password.into(),
            roles: Vec::new(),
            enabled: true,
        }
    }

    /// Adds roles, ignoring duplicates. A leading `ROLE_` is stripped.
    pub fn roles<S: AsRef<str>>(mut self, roles: &[S]) -> Self {
        for role in roles {
            let role = normalize_role(role.as_ref());
            if !self.roles.iter().any(|r| r == role) {
                self.roles.push(role.to_string());
            }
        }
        self
    }

    /// Marks the account enabled or disabled.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn get_username(&self) -> &str {
        &self.username
    }

    pub fn get_password(&self) -> &str {
        &self.password
    }

    pub fn get_roles(&self) -> &[String] {
        &self.roles
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns a copy of this user without the password hash.
    ///
    /// Used when the user is placed in a session or request extensions.
    pub fn erase_credentials(&self) -> Self {
        User {
            password: String::new(),
            ..self.clone()
        }
    }

    /// Authorities in `ROLE_<name>` form, in the order roles were added.
    pub fn granted_authorities(&self) -> Vec<String> {
        self.roles
            .iter()
            .map(|r| format!("{}{}", ROLE_PREFIX, r))
            .collect()
    }

    /// The role reported to the client after login: the first granted
    /// authority without its prefix, or [`DEFAULT_ROLE`].
    pub fn primary_role(&self) -> &str {
        self.roles.first().map(String::as_str).unwrap_or(DEFAULT_ROLE)
    }

    pub fn has_role(&self, role: &str) -> bool {
        let role = normalize_role(role);
        self.roles.iter().any(|r| r == role)
    }

    pub fn has_any_role<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        roles.iter().any(|role| self.has_role(role.as_ref()))
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "User {{ username: {}, roles: {:?} }}", self.username, self.roles)
    }
}

fn normalize_role(role: &str) -> &str {
    role.strip_prefix(ROLE_PREFIX).unwrap_or(role)
}
