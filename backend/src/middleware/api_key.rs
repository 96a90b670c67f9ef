//! Deployment-level API-key gate.
//!
//! An optional shared secret checked before routing: requests missing the
//! `x-api-key` header or carrying the wrong value are rejected with 401
//! before any handler runs. This is a coarse perimeter for the whole
//! deployment, distinct from the per-user bearer tokens checked by the
//! route guards. Configured without a key, the gate passes everything
//! through.

use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpResponse};
use futures_util::future::{LocalBoxFuture, Ready, ready};

use crate::inbound::http::ErrorBody;

const API_KEY_HEADER: &str = "x-api-key";
const UNAUTHORIZED: &str = "Unauthorized";

/// Paths served without a key so probes and docs stay reachable.
const PUBLIC_PREFIXES: &[&str] = &["/status", "/docs", "/api-docs"];

/// API-key gate middleware.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use backend::middleware::ApiKeyGuard;
///
/// let enforcing = App::new().wrap(ApiKeyGuard::new(Some("shared-secret")));
/// let open = App::new().wrap(ApiKeyGuard::new(None::<&str>));
/// ```
#[derive(Clone)]
pub struct ApiKeyGuard {
    key: Option<Arc<str>>,
}

impl ApiKeyGuard {
    /// Build a gate; `None` disables enforcement.
    pub fn new(key: Option<impl AsRef<str>>) -> Self {
        Self {
            key: key.map(|key| Arc::from(key.as_ref())),
        }
    }
}

fn is_public(path: &str) -> bool {
    PUBLIC_PREFIXES
        .iter()
        .any(|prefix| path == *prefix || path.starts_with(&format!("{prefix}/")))
}

fn rejection(req: ServiceRequest) -> ServiceResponse<BoxBody> {
    let response = HttpResponse::Unauthorized().json(ErrorBody {
        error: UNAUTHORIZED.to_owned(),
    });
    req.into_response(response)
}

impl<S, B> Transform<S, ServiceRequest> for ApiKeyGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = ApiKeyGuardMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ApiKeyGuardMiddleware {
            service,
            key: self.key.clone(),
        }))
    }
}

/// Service wrapper produced by [`ApiKeyGuard`].
pub struct ApiKeyGuardMiddleware<S> {
    service: S,
    key: Option<Arc<str>>,
}

impl<S, B> Service<ServiceRequest> for ApiKeyGuardMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let Some(expected) = self.key.clone() else {
            let fut = self.service.call(req);
            return Box::pin(async move { Ok(fut.await?.map_into_boxed_body()) });
        };
        if is_public(req.path()) {
            let fut = self.service.call(req);
            return Box::pin(async move { Ok(fut.await?.map_into_boxed_body()) });
        }
        let presented = req
            .headers()
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok());
        if presented != Some(expected.as_ref()) {
            tracing::warn!(path = %req.path(), "request rejected by the api-key gate");
            return Box::pin(ready(Ok(rejection(req))));
        }
        let fut = self.service.call(req);
        Box::pin(async move { Ok(fut.await?.map_into_boxed_body()) })
    }
}
