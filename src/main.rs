//! PostCraft - gated access to AI post generation
//! Mission: Only enabled, unexpired, rate-limited users reach the provider

use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use postcraft_backend::{
    auth::{JwtHandler, UserStore},
    build_router,
    generation::OpenAiClient,
    AppState, Config,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize environment and logging
    load_env();
    init_tracing();

    let config = Config::parse();
    config.validate().context("Invalid configuration")?;

    info!("🚀 PostCraft backend starting");

    let http_client = reqwest::Client::builder()
        .timeout(config.generation_timeout())
        .build()
        .context("Failed to build HTTP client")?;

    let generator = OpenAiClient::new(
        http_client,
        config.openai_api_key.clone(),
        &config.openai_base_url,
    )?;

    let user_store = Arc::new(UserStore::new(config.bcrypt_cost)?);
    user_store.seed_admin(&config.admin_username, &config.admin_password)?;

    let jwt_handler = Arc::new(JwtHandler::new(&config.jwt_secret));

    let initial_limit = config.initial_rate_limit()?;
    let state = AppState::new(
        user_store,
        jwt_handler,
        Arc::new(generator),
        config.generation_settings(),
        initial_limit,
    );

    info!(
        model = %config.generation_model,
        rate_limit = initial_limit.get(),
        "🔐 Authentication and access gate initialized"
    );

    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("🎯 API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received");
}

/// Initialize tracing with env-driven filtering
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "postcraft_backend=debug,postcraft=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn load_env() {
    // 1) Standard dotenv search (cwd + parents)
    let _ = dotenv();

    // 2) Also try the crate root .env when started from elsewhere
    let manifest_env = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    if manifest_env.exists() {
        let _ = dotenv::from_path(&manifest_env);
    }
}
