//! Authentication Module
//! Mission: Stateless JWT sessions, bcrypt credentials, and the user/admin role split

pub mod api;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod user_store;

pub use jwt::JwtHandler;
pub use middleware::{admin_middleware, auth_middleware};
pub use user_store::UserStore;
