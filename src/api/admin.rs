//! Admin endpoints. Routed behind `admin_middleware`, so every handler
//! here can assume an admin caller.

use crate::access::LedgerEntry;
use crate::auth::models::{format_rfc1123, Claims, UserSummary};
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use tracing::info;

/// Access window used when `expires_in` is missing or not positive: 7 days
pub const DEFAULT_ACCESS_MINUTES: i64 = 10_080;

#[derive(Debug, Deserialize)]
pub struct AccessWindowRequest {
    pub username: String,
    /// Minutes from now
    #[serde(default)]
    pub expires_in: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct RateLimitRequest {
    pub rate_limit: i64,
}

#[derive(Debug, Serialize)]
pub struct AccessWindowResponse {
    pub message: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct RateLimitResponse {
    pub message: String,
    pub rate_limit: u32,
}

/// Expiry `expires_in` minutes after `now`, falling back to the default window.
pub fn resolve_expiry(now: DateTime<Utc>, expires_in: Option<i64>) -> Result<DateTime<Utc>, ApiError> {
    let minutes = expires_in
        .filter(|m| *m > 0)
        .unwrap_or(DEFAULT_ACCESS_MINUTES);

    Duration::try_minutes(minutes)
        .and_then(|window| now.checked_add_signed(window))
        .ok_or_else(|| ApiError::Validation("Invalid expires_in value".to_string()))
}

/// POST /admin/enable-user
pub async fn enable_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<AccessWindowRequest>, JsonRejection>,
) -> Result<Json<AccessWindowResponse>, ApiError> {
    let Json(payload) = payload?;
    let expires_at = resolve_expiry(Utc::now(), payload.expires_in)?;

    state
        .users
        .enable_user(&payload.username, expires_at)
        .ok_or(ApiError::NotFound)?;

    info!(
        admin = %claims.sub,
        "User {} enabled until {}",
        payload.username,
        expires_at
    );

    Ok(Json(AccessWindowResponse {
        message: format!(
            "User {} enabled until {}",
            payload.username,
            format_rfc1123(&expires_at)
        ),
        expires_at,
    }))
}

/// POST /admin/update-expiration
pub async fn update_expiration(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<AccessWindowRequest>, JsonRejection>,
) -> Result<Json<AccessWindowResponse>, ApiError> {
    let Json(payload) = payload?;
    let expires_at = resolve_expiry(Utc::now(), payload.expires_in)?;

    state
        .users
        .update_expiration(&payload.username, expires_at)
        .ok_or(ApiError::NotFound)?;

    info!(
        admin = %claims.sub,
        "User {} expiration moved to {}",
        payload.username,
        expires_at
    );

    Ok(Json(AccessWindowResponse {
        message: format!(
            "User {} expiration updated until {}",
            payload.username,
            format_rfc1123(&expires_at)
        ),
        expires_at,
    }))
}

/// POST /admin/update-rate-limit
pub async fn update_rate_limit(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<RateLimitRequest>, JsonRejection>,
) -> Result<Json<RateLimitResponse>, ApiError> {
    let invalid = || ApiError::Validation("Invalid rate_limit value".to_string());

    let Json(payload) = payload.map_err(|_| invalid())?;
    let limit = u32::try_from(payload.rate_limit)
        .ok()
        .and_then(NonZeroU32::new)
        .ok_or_else(invalid)?;

    state.rate_limit.set(limit);

    info!(admin = %claims.sub, "Rate limit updated to {} req/min", limit);

    Ok(Json(RateLimitResponse {
        message: format!("Rate limit updated to {limit} req/min"),
        rate_limit: limit.get(),
    }))
}

/// GET /admin/list-users
pub async fn list_users(State(state): State<AppState>) -> Json<Vec<UserSummary>> {
    let users = state.users.list_users();
    Json(users.iter().map(UserSummary::from_user).collect())
}

/// GET /admin/request-stats
pub async fn request_stats(State(state): State<AppState>) -> Json<Vec<LedgerEntry>> {
    Json(state.ledger.snapshot())
}
