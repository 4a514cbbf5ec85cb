//! Route table.
//!
//! Public: `/health`, `/signup`, `/login`.
//! Bearer token required: `/generate-post` and everything under `/admin`,
//! which additionally requires the admin role.

use crate::api::{admin, generate};
use crate::auth::{admin_middleware, api as auth_api, auth_middleware};
use crate::middleware::request_logging;
use crate::state::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn build_router(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route("/enable-user", post(admin::enable_user))
        .route("/update-expiration", post(admin::update_expiration))
        .route("/update-rate-limit", post(admin::update_rate_limit))
        .route("/list-users", get(admin::list_users))
        .route("/request-stats", get(admin::request_stats))
        .route_layer(middleware::from_fn(admin_middleware));

    // Token check wraps the admin check, so it runs first
    let protected_routes = Router::new()
        .route("/generate-post", post(generate::generate_post))
        .nest("/admin", admin_routes)
        .route_layer(middleware::from_fn_with_state(
            state.jwt_handler.clone(),
            auth_middleware,
        ));

    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/signup", post(auth_api::signup))
        .route("/login", post(auth_api::login));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
        .layer(middleware::from_fn(request_logging))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn health_check() -> &'static str {
    "ok"
}
