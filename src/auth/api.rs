//! Authentication API Endpoints
//! Mission: Provide signup and login

use crate::auth::models::{CredentialsRequest, TokenResponse, User};
use crate::auth::user_store::CreateUserError;
use crate::error::ApiError;
use crate::state::AppState;
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::{error, info};

/// Signup endpoint - POST /signup
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(payload) = payload?;
    // Stored exactly as given; login and admin lookups use the raw name too
    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation(
            "Username and password are required".to_string(),
        ));
    }

    let store = state.users.clone();
    let user = tokio::task::spawn_blocking(move || {
        store.create_user(&payload.username, &payload.password)
    })
    .await
    .map_err(|e| {
        error!("Signup: hashing task failed: {}", e);
        ApiError::Internal("Error processing password")
    })?
    .map_err(|e| match e {
        CreateUserError::AlreadyExists => {
            info!("Signup: user already exists");
            ApiError::UserExists
        }
        CreateUserError::Hashing(e) => {
            error!("Signup: error hashing password: {:#}", e);
            ApiError::Internal("Error processing password")
        }
    })?;

    issue_token(&state, &user).map(Json)
}

/// Login endpoint - POST /login
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(payload) = payload?;
    info!("🔐 Login attempt: {}", payload.username);

    let store = state.users.clone();
    let username = payload.username.clone();
    let user = tokio::task::spawn_blocking(move || {
        store.verify_password(&username, &payload.password)
    })
    .await
    .map_err(|e| {
        error!("Login: verification task failed: {}", e);
        ApiError::Internal("Internal server error")
    })?
    .map_err(|e| {
        // A stored hash that bcrypt cannot parse; still indistinguishable outside
        error!("Login: password verification error: {:#}", e);
        ApiError::InvalidCredentials
    })?
    .ok_or(ApiError::InvalidCredentials)?;

    let response = issue_token(&state, &user)?;

    info!(
        "✅ Login successful: {} ({})",
        user.username,
        user.role.as_str()
    );

    Ok(Json(response))
}

fn issue_token(state: &AppState, user: &User) -> Result<TokenResponse, ApiError> {
    let (token, expires_in) = state
        .jwt_handler
        .generate_token(&user.username, user.role)
        .map_err(|e| {
            error!("Token generation failed for {}: {:#}", user.username, e);
            ApiError::Internal("Could not generate token")
        })?;

    Ok(TokenResponse {
        token,
        expires_in,
        role: user.role,
    })
}
