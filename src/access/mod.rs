//! Access Gate
//! Mission: Decide whether a generation request may reach the provider
//!
//! Checks run in order and stop at the first failure: the user exists, is
//! enabled, has not expired, and is admitted by the rate limiter. Only the
//! last step mutates state.

pub mod ledger;
pub mod rate_limit;

pub use ledger::{LedgerEntry, RequestLedger};
pub use rate_limit::{GlobalRateLimit, RateLimiter};

use crate::auth::UserStore;
use crate::error::ApiError;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    UnknownIdentity,
    NotEnabled,
    Expired,
    RateLimited { limit: u32 },
}

impl DenyReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DenyReason::UnknownIdentity => "unknown identity",
            DenyReason::NotEnabled => "not enabled",
            DenyReason::Expired => "expired",
            DenyReason::RateLimited { .. } => "rate limited",
        }
    }
}

impl From<DenyReason> for ApiError {
    fn from(reason: DenyReason) -> Self {
        match reason {
            // Unknown and disabled look the same from outside
            DenyReason::UnknownIdentity | DenyReason::NotEnabled => {
                ApiError::Forbidden("User not enabled")
            }
            DenyReason::Expired => ApiError::Forbidden("User access expired"),
            DenyReason::RateLimited { limit } => ApiError::RateLimited { limit },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Proceed,
    Denied(DenyReason),
}

pub struct AccessGate {
    users: Arc<UserStore>,
    limiter: RateLimiter,
    rate_limit: Arc<GlobalRateLimit>,
}

impl AccessGate {
    pub fn new(users: Arc<UserStore>, rate_limit: Arc<GlobalRateLimit>) -> Self {
        Self {
            users,
            limiter: RateLimiter::new(),
            rate_limit,
        }
    }

    pub fn authorize(&self, identity: &str) -> GateDecision {
        self.authorize_at(identity, Utc::now())
    }

    pub fn authorize_at(&self, identity: &str, now: DateTime<Utc>) -> GateDecision {
        let decision = self.evaluate(identity, now);

        match decision {
            GateDecision::Proceed => info!(identity, "Generation access granted"),
            GateDecision::Denied(reason) => {
                warn!(identity, reason = reason.as_str(), "Generation access denied")
            }
        }

        decision
    }

    fn evaluate(&self, identity: &str, now: DateTime<Utc>) -> GateDecision {
        let Some(user) = self.users.get_user_by_username(identity) else {
            return GateDecision::Denied(DenyReason::UnknownIdentity);
        };

        if !user.allowed {
            return GateDecision::Denied(DenyReason::NotEnabled);
        }

        match user.access_expires_at {
            Some(expires_at) if now < expires_at => {}
            _ => return GateDecision::Denied(DenyReason::Expired),
        }

        let limit = self.rate_limit.get();
        if !self.limiter.admit_at(identity, limit, now) {
            return GateDecision::Denied(DenyReason::RateLimited { limit: limit.get() });
        }

        GateDecision::Proceed
    }
}
