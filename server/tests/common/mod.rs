//! Shared test infrastructure.
//!
//! Accounts seeded by [`context`]:
//! - `admin` / `admin-pass`: ADMIN
//! - `sam` / `sam-pass`: STUDENT
//! - `kim` / `kim-pass`: STUDENT

#![allow(dead_code)]

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, Error};

use lost_found_server::config::{AdminSeed, ServerConfig};
use lost_found_server::model::{Profile, Role};
use lost_found_server::security::SecurityComponents;
use lost_found_server::AppState;

pub const SESSION_COOKIE: &str = "JSESSIONID";
pub const ALLOWED_ORIGIN: &str = "http://localhost:3939";

pub struct TestContext {
    pub security: SecurityComponents,
    pub state: AppState,
}

/// Default configuration with a cheap BCrypt cost.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        bcrypt_cost: 4,
        ..ServerConfig::default()
    }
}

pub async fn context() -> TestContext {
    context_with(test_config()).await
}

pub async fn context_with(config: ServerConfig) -> TestContext {
    let security = SecurityComponents::new(&config).unwrap();
    let state = AppState::new(&security);

    state
        .seed_admin(&AdminSeed {
            username: "admin".to_string(),
            password: "admin-pass".to_string(),
        })
        .await
        .unwrap();
    for name in ["sam", "kim"] {
        let profile = Profile {
            email: format!("{}@campus.example", name),
            personal_name: name.to_uppercase(),
        };
        state
            .create_account(name, format!("{}-pass", name), Role::Student, profile)
            .await
            .unwrap();
    }

    TestContext { security, state }
}

/// Extracts the session cookie set by a response, if any.
pub fn session_cookie<B>(resp: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.into_owned())
}

/// Logs in through the form endpoint and returns the session cookie.
pub async fn login<S, B>(app: &S, username: &str, password: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/lost-found/login")
        .set_form([("username", username), ("password", password)])
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::OK, "login failed for {}", username);
    session_cookie(&resp).expect("login must set the session cookie")
}
