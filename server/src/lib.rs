//! # Lost & Found Server
//!
//! A campus lost-and-found service: students report lost and found items,
//! administrators review every report and manage student accounts. Access is
//! enforced by the session-based pipeline from `lost_found_security_core`.

pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod security;
pub mod store;

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::Logger;
use actix_web::{web, App, Error};
use log::info;
use lost_found_security_core::http::security::{
    InMemoryUserDetailsService, PasswordEncoder, SecurityTransform, SessionRegistry, User,
    UserDetailsManager,
};

use crate::config::AdminSeed;
use crate::error::ApiError;
use crate::model::{Profile, Role};
use crate::security::SecurityComponents;
use crate::store::{ItemStore, ProfileStore};

/// Shared state handed to the handlers.
#[derive(Clone)]
pub struct AppState {
    pub users: InMemoryUserDetailsService,
    pub encoder: Arc<dyn PasswordEncoder>,
    pub sessions: SessionRegistry,
    pub profiles: ProfileStore,
    pub items: ItemStore,
}

impl AppState {
    pub fn new(security: &SecurityComponents) -> Self {
        Self {
            users: security.users().clone(),
            encoder: Arc::clone(security.encoder()),
            sessions: security.authenticator().registry().clone(),
            profiles: ProfileStore::new(),
            items: ItemStore::new(),
        }
    }

    /// Hashes the password off the async executor.
    pub async fn encode_password(&self, raw: String) -> Result<String, ApiError> {
        let encoder = Arc::clone(&self.encoder);
        web::block(move || encoder.encode(&raw))
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?
            .map_err(ApiError::from)
    }

    /// Creates an account with the given role and contact details.
    pub async fn create_account(
        &self,
        username: &str,
        password: String,
        role: Role,
        profile: Profile,
    ) -> Result<User, ApiError> {
        let encoded = self.encode_password(password).await?;
        let user = User::new(username, encoded).roles(&[role.as_str()]);
        self.users.create_user(user.clone()).await?;
        self.profiles.save(username, profile).await;
        Ok(user.erase_credentials())
    }

    /// Seeds the administrator account configured at startup.
    pub async fn seed_admin(&self, seed: &AdminSeed) -> Result<(), ApiError> {
        let profile = Profile {
            personal_name: "Administrator".to_string(),
            ..Profile::default()
        };
        self.create_account(&seed.username, seed.password.clone(), Role::Admin, profile)
            .await?;
        info!("Seeded administrator account {}", seed.username);
        Ok(())
    }
}

/// Builds the application with its middleware stack.
///
/// Outermost first: access log, CORS, cookie session, security.
pub fn build_app(
    security: &SecurityComponents,
    state: AppState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    let form_login = security.form_login().clone();

    App::new()
        .app_data(web::Data::new(state))
        .configure(|cfg| form_login.configure(cfg))
        .configure(handlers::configure)
        .wrap(SecurityTransform::new(
            security.authenticator().clone(),
            security.authorizer().clone(),
        ))
        .wrap(security.session_middleware())
        .wrap(security.cors().build())
        .wrap(Logger::default())
}
