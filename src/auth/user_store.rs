//! User Storage
//! Mission: Hold user accounts in memory for the lifetime of the process

use crate::auth::models::{User, UserRole};
use anyhow::{Context, Result};
use bcrypt::{hash, verify};
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{info, warn};

/// Seeded admin access window: 7 days
pub const ADMIN_ACCESS_MINUTES: i64 = 10_080;

/// Why a signup could not create a user
#[derive(Debug)]
pub enum CreateUserError {
    AlreadyExists,
    Hashing(anyhow::Error),
}

impl std::fmt::Display for CreateUserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CreateUserError::AlreadyExists => write!(f, "User already exists"),
            CreateUserError::Hashing(e) => write!(f, "Failed to hash password: {e}"),
        }
    }
}

impl std::error::Error for CreateUserError {}

/// In-memory user storage keyed by username
pub struct UserStore {
    users: RwLock<HashMap<String, User>>,
    bcrypt_cost: u32,
    // Compared against when the username is unknown, so both login failures cost the same
    dummy_hash: String,
}

impl UserStore {
    pub fn new(bcrypt_cost: u32) -> Result<Self> {
        let dummy_hash =
            hash("postcraft-no-such-user", bcrypt_cost).context("Failed to hash password")?;

        Ok(Self {
            users: RwLock::new(HashMap::new()),
            bcrypt_cost,
            dummy_hash,
        })
    }

    /// Create the admin account used to bootstrap user management
    pub fn seed_admin(&self, username: &str, password: &str) -> Result<()> {
        let password_hash = hash(password, self.bcrypt_cost).context("Failed to hash password")?;
        let now = Utc::now();

        let admin = User {
            username: username.to_string(),
            password_hash,
            role: UserRole::Admin,
            allowed: true,
            access_expires_at: Some(now + Duration::minutes(ADMIN_ACCESS_MINUTES)),
            created_at: now,
        };

        self.users.write().insert(admin.username.clone(), admin);

        info!("🔐 Admin user seeded (username: {})", username);
        Ok(())
    }

    /// Get user by username
    pub fn get_user_by_username(&self, username: &str) -> Option<User> {
        self.users.read().get(username).cloned()
    }

    pub fn contains(&self, username: &str) -> bool {
        self.users.read().contains_key(username)
    }

    /// Verify username and password; returns the user on a match.
    ///
    /// Unknown usernames and wrong passwords both yield `Ok(None)`.
    pub fn verify_password(&self, username: &str, password: &str) -> Result<Option<User>> {
        match self.get_user_by_username(username) {
            Some(user) => {
                let valid =
                    verify(password, &user.password_hash).context("Failed to verify password")?;
                if valid {
                    Ok(Some(user))
                } else {
                    warn!("Login rejected: invalid password for user {}", username);
                    Ok(None)
                }
            }
            None => {
                let _ = verify(password, &self.dummy_hash);
                warn!("Login rejected: user not found: {}", username);
                Ok(None)
            }
        }
    }

    /// Create a new, not yet enabled user
    pub fn create_user(&self, username: &str, password: &str) -> Result<User, CreateUserError> {
        if self.contains(username) {
            return Err(CreateUserError::AlreadyExists);
        }

        // Hash outside the lock
        let password_hash = hash(password, self.bcrypt_cost)
            .map_err(|e| CreateUserError::Hashing(e.into()))?;

        let user = User {
            username: username.to_string(),
            password_hash,
            role: UserRole::User,
            allowed: false,
            access_expires_at: None,
            created_at: Utc::now(),
        };

        let mut users = self.users.write();
        if users.contains_key(username) {
            return Err(CreateUserError::AlreadyExists);
        }
        users.insert(user.username.clone(), user.clone());

        info!("✅ Created user: {} ({})", user.username, user.role.as_str());

        Ok(user)
    }

    /// Enable a user until `expires_at`; returns None for unknown users
    pub fn enable_user(&self, username: &str, expires_at: DateTime<Utc>) -> Option<User> {
        let mut users = self.users.write();
        let user = users.get_mut(username)?;
        user.allowed = true;
        user.access_expires_at = Some(expires_at);
        Some(user.clone())
    }

    /// Move a user's access expiry without touching the enabled flag
    pub fn update_expiration(&self, username: &str, expires_at: DateTime<Utc>) -> Option<User> {
        let mut users = self.users.write();
        let user = users.get_mut(username)?;
        user.access_expires_at = Some(expires_at);
        Some(user.clone())
    }

    /// List all users (admin only), ordered by username
    pub fn list_users(&self) -> Vec<User> {
        let mut users: Vec<User> = self.users.read().values().cloned().collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        users
    }
}
