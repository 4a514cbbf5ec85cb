//! Shared application state, built once at start-up and cloned into handlers.

use crate::access::{AccessGate, GlobalRateLimit, RequestLedger};
use crate::auth::{JwtHandler, UserStore};
use crate::generation::{GenerationSettings, PostGenerator};
use std::num::NonZeroU32;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserStore>,
    pub jwt_handler: Arc<JwtHandler>,
    pub rate_limit: Arc<GlobalRateLimit>,
    pub gate: Arc<AccessGate>,
    pub ledger: Arc<RequestLedger>,
    pub generator: Arc<dyn PostGenerator>,
    pub generation: Arc<GenerationSettings>,
}

impl AppState {
    pub fn new(
        users: Arc<UserStore>,
        jwt_handler: Arc<JwtHandler>,
        generator: Arc<dyn PostGenerator>,
        generation: GenerationSettings,
        initial_rate_limit: NonZeroU32,
    ) -> Self {
        let rate_limit = Arc::new(GlobalRateLimit::new(initial_rate_limit));
        let gate = Arc::new(AccessGate::new(users.clone(), rate_limit.clone()));

        Self {
            users,
            jwt_handler,
            rate_limit,
            gate,
            ledger: Arc::new(RequestLedger::new()),
            generator,
            generation: Arc::new(generation),
        }
    }
}
