//! Authentication Models
//! Mission: Define user records, token claims, and auth request/response shapes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// RFC 1123 rendering used in admin-facing messages and listings
pub const RFC1123_FORMAT: &str = "%a, %d %b %Y %H:%M:%S UTC";

pub fn format_rfc1123(ts: &DateTime<Utc>) -> String {
    ts.format(RFC1123_FORMAT).to_string()
}

/// User account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // bcrypt hash - never serialize
    pub role: UserRole,
    /// Set by an admin; signup leaves it false
    pub allowed: bool,
    /// None until the account is enabled for the first time
    pub access_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// User roles for RBAC
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum UserRole {
    #[serde(rename = "user")]
    User, // Generation access once enabled
    #[serde(rename = "admin")]
    Admin, // User management + usage stats
}

impl UserRole {
    pub fn as_str(&self) -> &str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }
}

/// JWT Claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // subject (username)
    pub role: UserRole,
    pub iat: usize,
    pub exp: usize, // expiration timestamp
}

impl Claims {
    pub fn username(&self) -> &str {
        &self.sub
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Signup and login request body
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

/// Signup and login response
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub expires_in: usize, // seconds until expiration
    pub role: UserRole,
}

/// User listing entry (sanitized)
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub username: String,
    pub role: UserRole,
    pub allowed: bool,
    #[serde(rename = "access_expiresAt")]
    pub access_expires_at: Option<String>,
}

impl UserSummary {
    pub fn from_user(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            role: user.role,
            allowed: user.allowed,
            access_expires_at: user.access_expires_at.as_ref().map(format_rfc1123),
        }
    }
}
