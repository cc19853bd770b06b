//! Bearer token authentication middleware.
//!
//! Every request through this layer must carry `Authorization: Bearer
//! <token>` matching the configured value; the comparison is constant-time.

use axum::{
    body::Body,
    http::{header, HeaderValue, Request, StatusCode},
    response::Response,
};
use gateway_crypto::constant_time_eq;
use std::sync::Arc;
use tower::{Layer, Service};
use tracing::warn;

/// Authentication layer carrying the expected token.
#[derive(Clone)]
pub struct BearerAuthLayer {
    token: Arc<String>,
}

impl BearerAuthLayer {
    /// Create a layer enforcing `token`.
    pub fn new(token: String) -> Self {
        Self {
            token: Arc::new(token),
        }
    }
}

impl<S> Layer<S> for BearerAuthLayer {
    type Service = BearerAuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        BearerAuthService {
            inner,
            token: Arc::clone(&self.token),
        }
    }
}

/// Authentication service wrapping the protected routes.
#[derive(Clone)]
pub struct BearerAuthService<S> {
    inner: S,
    token: Arc<String>,
}

impl<S> Service<Request<Body>> for BearerAuthService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let token = Arc::clone(&self.token);
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let presented = bearer_token(&req);
            let authorized = presented
                .map(|candidate| constant_time_eq(candidate, &token))
                .unwrap_or(false);

            if !authorized {
                warn!(
                    path = %req.uri().path(),
                    presented = presented.is_some(),
                    "command request rejected, bad bearer token"
                );
                return Ok(unauthorized_response());
            }

            inner.call(req).await
        })
    }
}

/// Extract the bearer token from the Authorization header, if any.
fn bearer_token<B>(req: &Request<B>) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn unauthorized_response() -> Response {
    let body = serde_json::json!({ "error": "unauthorized" });
    let mut response = Response::new(Body::from(
        serde_json::to_vec(&body).unwrap_or_default(),
    ));
    *response.status_mut() = StatusCode::UNAUTHORIZED;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Bearer"),
    );
    response
}
