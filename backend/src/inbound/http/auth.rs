//! Bearer authentication for HTTP routes.
//!
//! [`BearerAuth`] resolves the `Authorization: Bearer <token>` header through
//! the identity port before any handler runs and attaches the verified user
//! to the request. Handlers take [`AuthenticatedUser`] to read it back.

use std::rc::Rc;
use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{AUTHORIZATION, HeaderMap};
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::debug;

use crate::domain::ports::IdentityResolver;
use crate::domain::{Error, User};

/// Extract the token from a `Bearer` authorization header.
///
/// The scheme must be exactly `Bearer`, separated from a non-empty token by
/// a single space.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<&str, Error> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("authorization header is missing"))?
        .to_str()
        .map_err(|_| Error::unauthorized("authorization header is not visible ASCII"))?;

    match value.split_once(' ') {
        Some(("Bearer", token)) if !token.is_empty() && !token.contains(' ') => Ok(token),
        _ => Err(Error::unauthorized("authorization header is not a bearer credential")),
    }
}

/// Identity attached to a request by [`BearerAuth`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(User);

impl AuthenticatedUser {
    /// The verified caller.
    pub fn user(&self) -> &User {
        &self.0
    }

    /// Take ownership of the verified caller.
    pub fn into_inner(self) -> User {
        self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        // Reaching a handler without a user means the route was registered
        // outside the authenticated scope.
        ready(
            req.extensions()
                .get::<Self>()
                .cloned()
                .ok_or_else(|| Error::internal("no authenticated user attached to request")),
        )
    }
}

/// Middleware rejecting requests without a verifiable bearer token.
///
/// # Examples
/// ```no_run
/// use std::sync::Arc;
/// use actix_web::{App, web};
/// use record_service::domain::ports::IdentityResolver;
/// use record_service::inbound::http::auth::BearerAuth;
///
/// fn app(resolver: Arc<dyn IdentityResolver>) {
///     let _app = App::new().service(web::scope("").wrap(BearerAuth::new(resolver)));
/// }
/// ```
#[derive(Clone)]
pub struct BearerAuth {
    resolver: Arc<dyn IdentityResolver>,
}

impl BearerAuth {
    /// Authenticate requests with `resolver`.
    pub fn new(resolver: Arc<dyn IdentityResolver>) -> Self {
        Self { resolver }
    }
}

impl<S, B> Transform<S, ServiceRequest> for BearerAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = BearerAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BearerAuthMiddleware {
            service: Rc::new(service),
            resolver: Arc::clone(&self.resolver),
        }))
    }
}

/// Service wrapper produced by [`BearerAuth`].
pub struct BearerAuthMiddleware<S> {
    service: Rc<S>,
    resolver: Arc<dyn IdentityResolver>,
}

impl<S, B> Service<ServiceRequest> for BearerAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let resolver = Arc::clone(&self.resolver);

        Box::pin(async move {
            let resolved = match bearer_token(req.headers()) {
                Ok(token) => {
                    let token = token.to_owned();
                    resolver.resolve(&token).await
                }
                Err(err) => Err(err),
            };

            match resolved {
                Ok(user) => {
                    debug!(email = %user.email(), "request authenticated");
                    req.extensions_mut().insert(AuthenticatedUser(user));
                    service
                        .call(req)
                        .await
                        .map(ServiceResponse::map_into_left_body)
                }
                Err(err) => Ok(req.error_response(err).map_into_right_body()),
            }
        })
    }
}
