//! Registration and the caller's own account.

use actix_web::{get, post, web, HttpResponse};
use log::info;
use lost_found_security_core::http::security::AuthenticatedUser;

use crate::error::ApiError;
use crate::model::{Profile, RegisterRequest, Role, UserDetailsResponse};
use crate::AppState;

/// Creates a student account. Open to everyone.
#[post("/lost-found/register")]
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();
    let username = request.username.trim().to_string();
    if username.is_empty() || request.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Username and password are required".to_string(),
        ));
    }

    let profile = Profile {
        email: request.email,
        personal_name: request.personal_name,
    };
    let user = state
        .create_account(&username, request.password, Role::Student, profile.clone())
        .await?;

    info!("Registered student {}", username);
    Ok(HttpResponse::Created().json(UserDetailsResponse {
        username,
        role: user.primary_role().to_string(),
        email: profile.email,
        personal_name: profile.personal_name,
    }))
}

#[get("/lost-found/user/details")]
pub async fn user_details(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
) -> web::Json<UserDetailsResponse> {
    let profile = state
        .profiles
        .get(user.get_username())
        .await
        .unwrap_or_default();

    web::Json(UserDetailsResponse {
        username: user.get_username().to_string(),
        role: user.primary_role().to_string(),
        email: profile.email,
        personal_name: profile.personal_name,
    })
}
