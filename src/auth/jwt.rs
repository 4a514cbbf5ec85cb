//! JWT Token Handler
//! Mission: Issue and verify short-lived, stateless session claims

use crate::auth::models::{Claims, UserRole};
use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

/// Tokens are valid for one hour from issuance
pub const TOKEN_VALIDITY_SECS: i64 = 3600;

/// JWT Handler for token operations
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    validity: Duration,
}

impl JwtHandler {
    /// Create a new JWT handler with secret key
    pub fn new(secret: &str) -> Self {
        Self::with_validity(secret, Duration::seconds(TOKEN_VALIDITY_SECS))
    }

    pub fn with_validity(secret: &str, validity: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            validity,
        }
    }

    /// Generate a JWT token for a user; returns the token and its lifetime in seconds
    pub fn generate_token(&self, username: &str, role: UserRole) -> Result<(String, usize)> {
        let now = Utc::now();
        let expiration = now
            .checked_add_signed(self.validity)
            .context("Invalid timestamp")?
            .timestamp()
            .max(0) as usize;

        let claims = Claims {
            sub: username.to_string(),
            role,
            iat: now.timestamp().max(0) as usize,
            exp: expiration,
        };

        debug!(
            "Generating JWT for user {} ({}), expires in {}s",
            username,
            role.as_str(),
            self.validity.num_seconds()
        );

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .context("Failed to generate JWT")?;

        Ok((token, self.validity.num_seconds().max(0) as usize))
    }

    /// Validate a JWT token and extract claims
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let decoded = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .context("Invalid or expired token")?;

        debug!("Validated JWT for user {}", decoded.claims.sub);

        Ok(decoded.claims)
    }
}
