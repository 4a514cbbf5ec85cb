//! POST /generate-post

use crate::access::GateDecision;
use crate::auth::models::Claims;
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct GeneratePostRequest {
    pub article: String,
}

#[derive(Debug, Serialize)]
pub struct GeneratePostResponse {
    pub post: String,
}

/// Generate a social post from an article for the authenticated caller.
///
/// The body is validated before the access gate runs. A missing or blank
/// `article` is answered with 400 and never records an admission, so it
/// cannot push the caller into a rate-limit window. Only requests that pass
/// the gate reach the provider, and only successful generations are written
/// to the request ledger.
pub async fn generate_post(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<GeneratePostRequest>, JsonRejection>,
) -> Result<Json<GeneratePostResponse>, ApiError> {
    let span = info_span!(
        "generate_post",
        request_id = %Uuid::new_v4(),
        username = %claims.sub,
    );

    serve_generation(state, claims, payload)
        .instrument(span)
        .await
}

async fn serve_generation(
    state: AppState,
    claims: Claims,
    payload: Result<Json<GeneratePostRequest>, JsonRejection>,
) -> Result<Json<GeneratePostResponse>, ApiError> {
    // Malformed input is rejected before it can spend an admission
    let Json(payload) = payload?;
    if payload.article.trim().is_empty() {
        return Err(ApiError::Validation("Article must not be empty".to_string()));
    }

    if let GateDecision::Denied(reason) = state.gate.authorize(claims.username()) {
        return Err(reason.into());
    }

    let request = state.generation.request_for(&payload.article);
    let post = state.generator.generate(&request).await.map_err(|e| {
        error!("Provider call failed: {:#}", e);
        ApiError::Internal("Failed to generate post")
    })?;

    state.ledger.record(claims.username());
    info!("Post generated");

    Ok(Json(GeneratePostResponse { post }))
}
