//! Session and metrics middleware for API routes.

use axum::{
    body::Body,
    extract::FromRequestParts,
    http::{request::Parts, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use std::future::Future;
use std::time::Instant;
use tracing::debug;
use uuid::Uuid;

use crate::metrics::{
    normalize_path, HTTP_REQUESTS_IN_FLIGHT, HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION,
    SESSIONS_CREATED_TOTAL,
};

/// Header carrying the learner's session id.
pub const SESSION_HEADER: &str = "x-session-id";

/// Metrics middleware that tracks HTTP request duration and counts.
///
/// This middleware records:
/// - Request duration (histogram)
/// - Request count (counter)
/// - Requests in flight (gauge)
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = normalize_path(request.uri().path());

    HTTP_REQUESTS_IN_FLIGHT.inc();

    let response = next.run(request).await;

    HTTP_REQUESTS_IN_FLIGHT.dec();

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    HTTP_REQUEST_DURATION
        .with_label_values(&[&method, &path, &status])
        .observe(duration);
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[&method, &path, &status])
        .inc();

    response
}

/// Session middleware.
///
/// Takes the session id from the `x-session-id` header, or starts a new
/// session when the header is missing or empty. The id is stored in request
/// extensions for [`SessionId`] and echoed in the response header.
pub async fn session_middleware(mut request: Request<Body>, next: Next) -> Response {
    let session_id = match header_session_id(request.headers()) {
        Some(id) => id,
        None => {
            let id = Uuid::new_v4().to_string();
            SESSIONS_CREATED_TOTAL.inc();
            debug!(session = %id, "Started new review session");
            id
        }
    };

    request
        .extensions_mut()
        .insert(SessionId(session_id.clone()));

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&session_id) {
        response.headers_mut().insert(SESSION_HEADER, value);
    }
    response
}

fn header_session_id(headers: &axum::http::HeaderMap) -> Option<String> {
    headers
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

/// Extractor for the learner's session id.
///
/// Reads the id stored by [`session_middleware`]. Without the middleware it
/// falls back to the request header, then to a fresh id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId(pub String);

impl<S> FromRequestParts<S> for SessionId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let session_id = parts
            .extensions
            .get::<SessionId>()
            .cloned()
            .or_else(|| header_session_id(&parts.headers).map(SessionId))
            .unwrap_or_else(|| SessionId(Uuid::new_v4().to_string()));
        std::future::ready(Ok(session_id))
    }
}
