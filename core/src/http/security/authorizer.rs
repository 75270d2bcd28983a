//! Ordered, request-matcher based authorization.
//!
//! Rules are evaluated top to bottom and the first rule whose matcher
//! accepts the request decides. Requests no rule matches fall through to the
//! `any_request` access (authenticated by default).
//!
//! # Spring Security Equivalent
//! `authorizeHttpRequests(...)` /
//! `RequestMatcherDelegatingAuthorizationManager`

use actix_web::body::EitherBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::Method;
use actix_web::Error;
use futures_util::future::LocalBoxFuture;
use log::{debug, warn};

use crate::http::error::AuthError;
use crate::http::security::ant_matcher::RequestMatcher;
use crate::http::security::config::{Authorizer, NextFuture};
use crate::http::security::user::User;

/// Access requirement attached to a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// `permitAll()`
    PermitAll,
    /// `authenticated()`
    Authenticated,
    /// `hasRole("...")`
    HasRole(String),
    /// `hasAnyRole("...", ...)`
    HasAnyRole(Vec<String>),
    /// `denyAll()`
    DenyAll,
}

impl Access {
    pub fn has_role(role: &str) -> Self {
        Access::HasRole(role.to_string())
    }

    pub fn has_any_role(roles: &[&str]) -> Self {
        Access::HasAnyRole(roles.iter().map(|r| r.to_string()).collect())
    }

    fn evaluate(&self, user: Option<&User>) -> Decision {
        match (self, user) {
            (Access::PermitAll, _) => Decision::Granted,
            (_, None) => Decision::Unauthenticated,
            (Access::Authenticated, Some(_)) => Decision::Granted,
            (Access::HasRole(role), Some(u)) if u.has_role(role) => Decision::Granted,
            (Access::HasAnyRole(roles), Some(u)) if u.has_any_role(roles.as_slice()) => {
                Decision::Granted
            }
            (_, Some(_)) => Decision::Forbidden,
        }
    }
}

/// Outcome of evaluating the rule table for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Granted,
    /// No authenticated user; answered by the entry point (401).
    Unauthenticated,
    /// Authenticated but lacking the required role (403).
    Forbidden,
}

/// An ordered rule table.
///
/// # Example
/// ```
/// use actix_web::http::Method;
/// use lost_found_security_core::http::security::{
///     Access, Decision, RequestMatcherAuthorizer, User,
/// };
///
/// let authorizer = RequestMatcherAuthorizer::new()
///     .request_matchers(Some(Method::POST), &["/register"], Access::PermitAll)
///     .request_matchers(None, &["/admin/**"], Access::has_role("ADMIN"))
///     .any_request(Access::Authenticated);
///
/// let student = User::new("s", "").roles(&["STUDENT"]);
/// assert_eq!(authorizer.decide(&Method::POST, "/register", None), Decision::Granted);
/// assert_eq!(authorizer.decide(&Method::GET, "/admin/x", Some(&student)), Decision::Forbidden);
/// assert_eq!(authorizer.decide(&Method::GET, "/other", None), Decision::Unauthenticated);
/// ```
#[derive(Debug, Clone)]
pub struct RequestMatcherAuthorizer {
    rules: Vec<(RequestMatcher, Access)>,
    any_request: Access,
}

impl RequestMatcherAuthorizer {
    pub fn new() -> Self {
        RequestMatcherAuthorizer {
            rules: Vec::new(),
            any_request: Access::Authenticated,
        }
    }

    /// Appends a rule for the given method (or every method) and patterns.
    pub fn request_matchers(
        self,
        method: Option<Method>,
        patterns: &[&str],
        access: Access,
    ) -> Self {
        let matcher = match method {
            Some(m) => RequestMatcher::method(m, patterns),
            None => RequestMatcher::paths(patterns),
        };
        self.add_rule(matcher, access)
    }

    pub fn add_rule(mut self, matcher: RequestMatcher, access: Access) -> Self {
        self.rules.push((matcher, access));
        self
    }

    /// Access applied when no rule matches.
    pub fn any_request(mut self, access: Access) -> Self {
        self.any_request = access;
        self
    }

    /// Returns the access that governs this request.
    pub fn access_for(&self, method: &Method, path: &str) -> &Access {
        self.rules
            .iter()
            .find(|(matcher, _)| matcher.matches(method, path))
            .map(|(_, access)| access)
            .unwrap_or(&self.any_request)
    }

    pub fn decide(&self, method: &Method, path: &str, user: Option<&User>) -> Decision {
        let access = self.access_for(method, path);
        let decision = access.evaluate(user);
        debug!("{} {} requires {:?}: {:?}", method, path, access, decision);
        decision
    }

    pub fn rules(&self) -> &[(RequestMatcher, Access)] {
        &self.rules
    }
}

impl Default for RequestMatcherAuthorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: 'static> Authorizer<B> for RequestMatcherAuthorizer {
    fn process(
        &self,
        req: ServiceRequest,
        user: Option<&User>,
        next: impl FnOnce(ServiceRequest) -> NextFuture<B> + 'static,
    ) -> LocalBoxFuture<'static, Result<ServiceResponse<EitherBody<B>>, Error>> {
        let decision = self.decide(req.method(), req.path(), user);

        let denied = match decision {
            Decision::Granted => {
                return Box::pin(async move {
                    let res = next(req).await?;
                    Ok(res.map_into_left_body())
                });
            }
            Decision::Unauthenticated => AuthError::Unauthorized,
            Decision::Forbidden => {
                warn!(
                    "Access denied for {} to {} {}",
                    user.map(User::get_username).unwrap_or("anonymous"),
                    req.method(),
                    req.path()
                );
                AuthError::Forbidden
            }
        };

        Box::pin(async move { Ok(req.error_response(denied).map_into_right_body()) })
    }
}
