//! API Error Types
//! Mission: Turn every request failure into one consistent JSON response

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::debug;

/// Errors surfaced at the HTTP boundary.
///
/// Every variant maps to exactly one status code. Messages are safe to show
/// to callers; internal causes are logged where the error is raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Malformed or missing input
    Validation(String),
    /// Signup for a username that is already registered
    UserExists,
    /// Login with an unknown username or a wrong password
    InvalidCredentials,
    /// Missing, malformed, forged, or expired bearer token
    Unauthenticated,
    /// Authenticated, but not allowed to do this
    Forbidden(&'static str),
    /// Admin operation targeting an unknown user
    NotFound,
    /// Per-user admission refused under the current global limit
    RateLimited { limit: u32 },
    /// Hashing, signing, or provider failure
    Internal(&'static str),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::UserExists => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials | ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::Validation(msg) => msg.clone(),
            ApiError::UserExists => "User already exists".to_string(),
            ApiError::InvalidCredentials => "Invalid credentials".to_string(),
            ApiError::Unauthenticated => "Invalid or missing token".to_string(),
            ApiError::Forbidden(msg) => (*msg).to_string(),
            ApiError::NotFound => "User not found".to_string(),
            ApiError::RateLimited { limit } => {
                format!("Rate limit exceeded (max {limit} req/min)")
            }
            ApiError::Internal(msg) => (*msg).to_string(),
        }
    }

    pub fn invalid_request() -> Self {
        ApiError::Validation("Invalid request".to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message(), self.status().as_u16())
    }
}

impl std::error::Error for ApiError {}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!("Rejected request body: {}", rejection.body_text());
        ApiError::invalid_request()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.message() }));

        (status, body).into_response()
    }
}
