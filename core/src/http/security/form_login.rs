//! Form login and logout processing with JSON responses.
//!
//! - `POST <login_processing_url>` with `username`/`password` parameters
//!   (form body, or query string when there is no form body):
//!   - success: `200 {"role": "<ROLE>"}`
//!   - failure: `401 {"error": "Invalid Credentials"}`
//! - `POST <logout_url>`: invalidates the session, expires the configured
//!   cookies, `200` with an empty body.
//!
//! # Spring Security Equivalent
//! `formLogin()` with custom `AuthenticationSuccessHandler` /
//! `AuthenticationFailureHandler`, and `logout()` with
//! `HttpStatusReturningLogoutSuccessHandler(OK)`.

use std::collections::HashMap;

use actix_session::Session;
use actix_web::cookie::Cookie;
use actix_web::{web, HttpResponse};
use log::{error, info, warn};
use serde::Serialize;

use crate::http::security::session::{SessionAuthenticator, DEFAULT_COOKIE_NAME};
use crate::http::security::user_details::DaoAuthenticationProvider;
use crate::http::security::User;

/// Body returned to clients whose login attempt failed.
pub const INVALID_CREDENTIALS: &str = "Invalid Credentials";

/// Login / logout endpoint settings.
#[derive(Debug, Clone)]
pub struct FormLoginConfig {
    login_processing_url: String,
    username_parameter: String,
    password_parameter: String,
    logout_url: String,
    delete_cookies: Vec<String>,
}

impl Default for FormLoginConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl FormLoginConfig {
    pub fn new() -> Self {
        Self {
            login_processing_url: "/login".to_string(),
            username_parameter: "username".to_string(),
            password_parameter: "password".to_string(),
            logout_url: "/logout".to_string(),
            delete_cookies: vec![DEFAULT_COOKIE_NAME.to_string()],
        }
    }

    pub fn login_processing_url(mut self, url: &str) -> Self {
        self.login_processing_url = url.to_string();
        self
    }

    pub fn username_parameter(mut self, param: &str) -> Self {
        self.username_parameter = param.to_string();
        self
    }

    pub fn password_parameter(mut self, param: &str) -> Self {
        self.password_parameter = param.to_string();
        self
    }

    pub fn logout_url(mut self, url: &str) -> Self {
        self.logout_url = url.to_string();
        self
    }

    /// Cookies expired by a successful logout.
    pub fn delete_cookies(mut self, names: &[&str]) -> Self {
        self.delete_cookies = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn get_login_processing_url(&self) -> &str {
        &self.login_processing_url
    }

    pub fn get_username_parameter(&self) -> &str {
        &self.username_parameter
    }

    pub fn get_password_parameter(&self) -> &str {
        &self.password_parameter
    }

    pub fn get_logout_url(&self) -> &str {
        &self.logout_url
    }

    pub fn get_delete_cookies(&self) -> &[String] {
        &self.delete_cookies
    }

    /// Pulls the credentials out of the form body, falling back to the
    /// query string parameter by parameter.
    fn credentials<'a>(
        &self,
        form: Option<&'a HashMap<String, String>>,
        query: &'a HashMap<String, String>,
    ) -> Option<(&'a str, &'a str)> {
        let param = |name: &str| {
            form.and_then(|f| f.get(name))
                .or_else(|| query.get(name))
                .map(String::as_str)
        };
        Some((param(&self.username_parameter)?, param(&self.password_parameter)?))
    }
}

#[derive(Debug, Serialize)]
struct LoginSuccess<'a> {
    role: &'a str,
}

#[derive(Debug, Serialize)]
struct LoginFailure<'a> {
    error: &'a str,
}

/// Success response: the caller's primary role as JSON.
pub fn authentication_success(user: &User) -> HttpResponse {
    HttpResponse::Ok().json(LoginSuccess {
        role: user.primary_role(),
    })
}

/// Failure response: a fixed 401 JSON body.
pub fn authentication_failure() -> HttpResponse {
    HttpResponse::Unauthorized().json(LoginFailure {
        error: INVALID_CREDENTIALS,
    })
}

/// Processes login and logout requests.
#[derive(Clone)]
pub struct FormLoginService {
    config: FormLoginConfig,
    provider: DaoAuthenticationProvider,
    authenticator: SessionAuthenticator,
}

impl FormLoginService {
    pub fn new(
        config: FormLoginConfig,
        provider: DaoAuthenticationProvider,
        authenticator: SessionAuthenticator,
    ) -> Self {
        Self {
            config,
            provider,
            authenticator,
        }
    }

    pub fn config(&self) -> &FormLoginConfig {
        &self.config
    }

    /// Verifies the credentials and binds the user to the session.
    pub async fn attempt_authentication(
        &self,
        session: &Session,
        username: &str,
        password: &str,
    ) -> HttpResponse {
        let user = match self.provider.authenticate(username, password).await {
            Ok(user) => user,
            Err(e) => {
                warn!("Login failed for {}: {}", username, e);
                return authentication_failure();
            }
        };

        if let Err(e) = self.authenticator.login(session, &user) {
            error!("Could not store session for {}: {}", username, e);
            return HttpResponse::InternalServerError().finish();
        }

        info!("User {} logged in as {}", username, user.primary_role());
        authentication_success(&user)
    }

    /// Invalidates the session and expires the configured cookies.
    pub fn logout(&self, session: &Session) -> HttpResponse {
        if self.authenticator.logout(session) {
            info!("Session invalidated at logout");
        }

        let mut response = HttpResponse::Ok();
        for name in &self.config.delete_cookies {
            let mut cookie = Cookie::new(name.clone(), "");
            cookie.set_path("/");
            cookie.make_removal();
            response.cookie(cookie);
        }
        response.finish()
    }

    /// Registers the login and logout endpoints.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.clone()))
            .route(
                &self.config.login_processing_url,
                web::post().to(process_login),
            )
            .route(&self.config.logout_url, web::post().to(process_logout));
    }
}

async fn process_login(
    service: web::Data<FormLoginService>,
    session: Session,
    query: web::Query<HashMap<String, String>>,
    form: Option<web::Form<HashMap<String, String>>>,
) -> HttpResponse {
    let form = form.map(web::Form::into_inner);
    match service.config.credentials(form.as_ref(), &query) {
        Some((username, password)) => {
            service
                .attempt_authentication(&session, username, password)
                .await
        }
        None => {
            warn!("Login request without credentials");
            authentication_failure()
        }
    }
}

async fn process_logout(service: web::Data<FormLoginService>, session: Session) -> HttpResponse {
    service.logout(&session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use actix_web::http::StatusCode;

    #[test]
    fn test_form_login_config_default() {
        let config = FormLoginConfig::new();
        assert_eq!(config.get_login_processing_url(), "/login");
        assert_eq!(config.get_username_parameter(), "username");
        assert_eq!(config.get_password_parameter(), "password");
        assert_eq!(config.get_logout_url(), "/logout");
        assert_eq!(config.get_delete_cookies(), &["JSESSIONID".to_string()]);
    }

    #[test]
    fn test_form_login_config_builder() {
        let config = FormLoginConfig::new()
            .login_processing_url("/app/login")
            .username_parameter("user")
            .password_parameter("pass")
            .logout_url("/app/logout")
            .delete_cookies(&["SID", "XSRF"]);

        assert_eq!(config.get_login_processing_url(), "/app/login");
        assert_eq!(config.get_username_parameter(), "user");
        assert_eq!(config.get_password_parameter(), "pass");
        assert_eq!(config.get_logout_url(), "/app/logout");
        assert_eq!(config.get_delete_cookies().len(), 2);
    }

    #[test]
    fn test_credentials_prefer_form_then_query() {
        let config = FormLoginConfig::new();
        let form: HashMap<String, String> =
            [("username".to_string(), "alice".to_string())].into_iter().collect();
        let query: HashMap<String, String> = [
            ("username".to_string(), "ignored".to_string()),
            ("password".to_string(), "secret".to_string()),
        ]
        .into_iter()
        .collect();

        assert_eq!(config.credentials(Some(&form), &query), Some(("alice", "secret")));
        assert_eq!(config.credentials(None, &query), Some(("ignored", "secret")));
        assert_eq!(config.credentials(Some(&form), &HashMap::new()), None);
    }

    #[actix_web::test]
    async fn test_success_body_reports_primary_role() {
        let user = User::new("a", "").roles(&["ADMIN"]);
        let resp = authentication_success(&user);
        assert_eq!(resp.status(), StatusCode::OK);
        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({"role": "ADMIN"}));
    }

    #[actix_web::test]
    async fn test_success_body_defaults_to_user() {
        let resp = authentication_success(&User::new("a", ""));
        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["role"], "USER");
    }

    #[actix_web::test]
    async fn test_failure_body() {
        let resp = authentication_failure();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({"error": "Invalid Credentials"}));
    }
}
