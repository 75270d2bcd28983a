//! Security middleware for Actix Web.
//!
//! # Spring Equivalent
//! `SecurityFilterChain` / `FilterChainProxy`

use std::rc::Rc;

use actix_service::{Service, Transform};
use actix_web::body::EitherBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::{Error, HttpMessage};
use futures_util::future::{ok, LocalBoxFuture, Ready};

use crate::http::security::config::{Authenticator, Authorizer, NextFuture};

/// Security middleware factory.
///
/// Must be wrapped *inside* the session middleware (registered before it
/// with `.wrap`) so the session is available when authenticating.
///
/// ```ignore
/// App::new()
///     .wrap(SecurityTransform::new(authenticator.clone(), authorizer.clone()))
///     .wrap(session_config.session_middleware(key.clone(), false))
/// ```
pub struct SecurityTransform<Auth, Autho> {
    authenticator: Auth,
    authorizer: Rc<Autho>,
}

impl<Auth, Autho> SecurityTransform<Auth, Autho> {
    pub fn new(authenticator: Auth, authorizer: Autho) -> Self {
        SecurityTransform {
            authenticator,
            authorizer: Rc::new(authorizer),
        }
    }
}

impl<S, B, Auth, Autho> Transform<S, ServiceRequest> for SecurityTransform<Auth, Autho>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
    Auth: Authenticator + Clone + 'static,
    Autho: Authorizer<B> + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = SecurityService<Auth, Autho, S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(SecurityService {
            authenticator: self.authenticator.clone(),
            authorizer: Rc::clone(&self.authorizer),
            service: Rc::new(service),
        })
    }
}

/// Security middleware service.
pub struct SecurityService<Auth, Autho, S> {
    authenticator: Auth,
    authorizer: Rc<Autho>,
    service: Rc<S>,
}

impl<Auth, Autho, S, B> Service<ServiceRequest> for SecurityService<Auth, Autho, S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
    Auth: Authenticator,
    Autho: Authorizer<B>,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_web::dev::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        let user = self.authenticator.get_user(&req);
        if let Some(ref u) = user {
            req.extensions_mut().insert(u.clone());
        }

        let next = move |req: ServiceRequest| -> NextFuture<B> { Box::pin(service.call(req)) };

        self.authorizer.process(req, user.as_ref(), next)
    }
}
