//! Seams of the security pipeline.
//!
//! # Spring Equivalent
//! `SecurityContextRepository` and `AuthorizationManager`

use actix_web::body::EitherBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::Error;
use futures_util::future::LocalBoxFuture;

use crate::http::security::user::User;

/// Future of the inner service, as handed to an [`Authorizer`].
pub type NextFuture<B> = LocalBoxFuture<'static, Result<ServiceResponse<B>, Error>>;

/// Resolves the caller's identity from an incoming request.
///
/// Returns an owned `User` so the middleware can place it in request
/// extensions for the handlers.
pub trait Authenticator {
    fn get_user(&self, req: &ServiceRequest) -> Option<User>;
}

/// Decides whether a request may reach the inner service.
///
/// The returned future resolves to:
/// - `EitherBody::left()` when forwarding to the inner service
/// - `EitherBody::right()` for a response produced by the authorizer (401/403)
pub trait Authorizer<B> {
    fn process(
        &self,
        req: ServiceRequest,
        user: Option<&User>,
        next: impl FnOnce(ServiceRequest) -> NextFuture<B> + 'static,
    ) -> LocalBoxFuture<'static, Result<ServiceResponse<EitherBody<B>>, Error>>;
}
