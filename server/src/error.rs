//! Application errors rendered as `{"error": "<message>"}`.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use derive_more::{Display, Error};
use log::error;
use lost_found_security_core::http::security::{CryptoError, UserDetailsError};
use serde::Serialize;

#[derive(Debug, Display, Error)]
pub enum ApiError {
    #[display("{_0}")]
    BadRequest(#[error(not(source))] String),
    #[display("{_0}")]
    Conflict(#[error(not(source))] String),
    #[display("{_0}")]
    NotFound(#[error(not(source))] String),
    #[display("{_0}")]
    Forbidden(#[error(not(source))] String),
    #[display("Internal server error")]
    Internal(#[error(not(source))] String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::Internal(cause) = self {
            error!("Internal error: {}", cause);
        }
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: &self.to_string(),
        })
    }
}

impl From<UserDetailsError> for ApiError {
    fn from(e: UserDetailsError) -> Self {
        match e {
            UserDetailsError::NotFound => ApiError::NotFound("User not found".to_string()),
            UserDetailsError::AlreadyExists => {
                ApiError::Conflict("Username already taken".to_string())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<CryptoError> for ApiError {
    fn from(e: CryptoError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn test_error_body_is_json() {
        let resp = ApiError::Conflict("Username already taken".to_string()).error_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({"error": "Username already taken"}));
    }

    #[test]
    fn test_internal_message_is_hidden() {
        let err = ApiError::Internal("bcrypt exploded".to_string());
        assert_eq!(err.to_string(), "Internal server error");
    }

    #[test]
    fn test_user_details_mapping() {
        assert_eq!(
            ApiError::from(UserDetailsError::AlreadyExists).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(UserDetailsError::NotFound).status_code(),
            StatusCode::NOT_FOUND
        );
    }
}
