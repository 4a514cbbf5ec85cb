//! Access log for the HTTP surface.
//!
//! One event per request: method, path, status, latency, and the caller the
//! auth layer identified (`-` for anonymous routes and rejected tokens).

use crate::auth::models::Claims;
use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{info, warn};

/// Username attached to the response by `auth_middleware`, if any.
pub fn caller(response: &Response) -> &str {
    response
        .extensions()
        .get::<Claims>()
        .map(Claims::username)
        .unwrap_or("-")
}

/// 5xx at WARN, everything else at INFO. `/health` is not logged.
pub async fn request_logging(request: Request, next: Next) -> Response {
    if request.uri().path() == "/health" {
        return next.run(request).await;
    }

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let latency_ms = start.elapsed().as_millis() as u64;
    let status = response.status();
    let username = caller(&response);

    if status.is_server_error() {
        warn!(
            %method,
            %path,
            status = status.as_u16(),
            username,
            latency_ms,
            "Request failed"
        );
    } else {
        info!(
            %method,
            %path,
            status = status.as_u16(),
            username,
            latency_ms,
            "Request completed"
        );
    }

    response
}
