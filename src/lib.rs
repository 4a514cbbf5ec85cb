//! PostCraft Backend Library
//!
//! Authenticated, rate-limited access to post generation, plus the admin
//! operations that manage it. `main.rs` wires these pieces to a listener;
//! tests drive `build_router` directly.

pub mod access;
pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod generation;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::Config;
pub use error::ApiError;
pub use routes::build_router;
pub use state::AppState;
