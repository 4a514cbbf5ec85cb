//! Server configuration, read from flags or the environment.
//!
//! Secrets have no defaults: a missing `JWT_SECRET`, `ADMIN_PASSWORD` or
//! `OPENAI_API_KEY` stops the server from starting.

use crate::generation::{openai::DEFAULT_BASE_URL, GenerationSettings};
use anyhow::{bail, Result};
use clap::Parser;
use std::num::NonZeroU32;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(name = "postcraft")]
#[command(about = "PostCraft backend - gated access to post generation")]
pub struct Config {
    /// Listen port
    #[arg(long, env = "PORT", default_value = "8080")]
    pub port: u16,

    /// HMAC secret used to sign session tokens
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// Username of the admin account created at start-up
    #[arg(long, env = "ADMIN_USERNAME", default_value = "admin")]
    pub admin_username: String,

    /// Password of the admin account created at start-up
    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    pub admin_password: String,

    /// Provider API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: String,

    /// Provider base URL (OpenAI-compatible)
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub openai_base_url: String,

    #[arg(long, env = "GENERATION_MODEL", default_value = "gpt-4")]
    pub generation_model: String,

    #[arg(long, env = "GENERATION_MAX_TOKENS", default_value = "250")]
    pub generation_max_tokens: u32,

    #[arg(long, env = "GENERATION_TEMPERATURE", default_value = "0.7")]
    pub generation_temperature: f64,

    /// Outbound provider call timeout in seconds
    #[arg(long, env = "GENERATION_TIMEOUT_SECS", default_value = "60")]
    pub generation_timeout_secs: u64,

    /// Initial global rate limit (requests/minute per user)
    #[arg(long, env = "RATE_LIMIT_PER_MINUTE", default_value = "1")]
    pub rate_limit: u32,

    #[arg(long, env = "BCRYPT_COST", default_value_t = bcrypt::DEFAULT_COST)]
    pub bcrypt_cost: u32,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.trim().is_empty() {
            bail!("JWT_SECRET must be set to a non-empty value");
        }
        if self.admin_username.trim().is_empty() {
            bail!("ADMIN_USERNAME must not be empty");
        }
        if self.admin_password.is_empty() {
            bail!("ADMIN_PASSWORD must be set to a non-empty value");
        }
        if self.openai_api_key.trim().is_empty() {
            bail!("OPENAI_API_KEY must be set to a non-empty value");
        }
        if self.rate_limit == 0 {
            bail!("RATE_LIMIT_PER_MINUTE must be greater than zero");
        }
        if !self.generation_temperature.is_finite() || self.generation_temperature < 0.0 {
            bail!("GENERATION_TEMPERATURE must be a non-negative number");
        }
        if self.generation_max_tokens == 0 {
            bail!("GENERATION_MAX_TOKENS must be greater than zero");
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            bail!("BCRYPT_COST must be between 4 and 31");
        }
        Ok(())
    }

    pub fn initial_rate_limit(&self) -> Result<NonZeroU32> {
        match NonZeroU32::new(self.rate_limit) {
            Some(limit) => Ok(limit),
            None => bail!("RATE_LIMIT_PER_MINUTE must be greater than zero"),
        }
    }

    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs)
    }

    pub fn generation_settings(&self) -> GenerationSettings {
        GenerationSettings {
            model: self.generation_model.clone(),
            max_tokens: self.generation_max_tokens,
            temperature: self.generation_temperature,
        }
    }
}
