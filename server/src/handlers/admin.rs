//! Student account management (ADMIN only).

use actix_web::{delete, get, web, HttpResponse};
use log::info;
use lost_found_security_core::http::security::{
    AuthenticatedUser, UserDetailsManager, UserDetailsService,
};

use crate::error::ApiError;
use crate::model::{Role, StudentSummary};
use crate::AppState;

#[get("/lost-found/admin/students")]
pub async fn list_students(
    state: web::Data<AppState>,
) -> Result<web::Json<Vec<StudentSummary>>, ApiError> {
    let mut students = Vec::new();
    for user in state.users.list_users().await? {
        if !user.has_role(Role::Student.as_str()) {
            continue;
        }
        let profile = state
            .profiles
            .get(user.get_username())
            .await
            .unwrap_or_default();
        students.push(StudentSummary {
            username: user.get_username().to_string(),
            email: profile.email,
            personal_name: profile.personal_name,
        });
    }
    Ok(web::Json(students))
}

/// Removes the account and ends its live sessions. Reports stay.
#[delete("/lost-found/admin/student/{username}")]
pub async fn delete_student(
    admin: AuthenticatedUser,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let username = path.into_inner();
    let is_student = state
        .users
        .load_user_by_username(&username)
        .await?
        .is_some_and(|u| u.has_role(Role::Student.as_str()));
    if !is_student {
        return Err(ApiError::NotFound(format!("Student {} not found", username)));
    }

    state.users.delete_user(&username).await?;
    state.profiles.remove(&username).await;
    let ended = state.sessions.invalidate_user(&username);

    info!(
        "{} deleted student {} ({} session(s) ended)",
        admin.get_username(),
        username,
        ended
    );
    Ok(HttpResponse::NoContent().finish())
}
