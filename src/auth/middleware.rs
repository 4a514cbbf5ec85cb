//! Authentication Middleware
//! Mission: Protect API endpoints with JWT validation and role checks

use crate::auth::{jwt::JwtHandler, models::Claims};
use crate::error::ApiError;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Auth middleware that validates JWT tokens.
///
/// Every failure (missing header, wrong scheme, bad signature, expiry)
/// produces the same 401 response.
pub async fn auth_middleware(
    State(jwt_handler): State<Arc<JwtHandler>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&req).ok_or_else(|| {
        debug!("Request without bearer token: {}", req.uri().path());
        ApiError::Unauthenticated
    })?;

    let claims = jwt_handler.validate_token(token).map_err(|e| {
        debug!("Token rejected: {:#}", e);
        ApiError::Unauthenticated
    })?;

    // Handlers read the claims from the request; the access log reads them
    // back from the response
    req.extensions_mut().insert(claims.clone());

    let mut response = next.run(req).await;
    response.extensions_mut().insert(claims);
    Ok(response)
}

/// Admin gate; must run after `auth_middleware`
pub async fn admin_middleware(req: Request, next: Next) -> Result<Response, ApiError> {
    let claims = extract_claims(&req).ok_or(ApiError::Unauthenticated)?;

    if !claims.is_admin() {
        warn!(
            "Admin route {} refused for {} ({})",
            req.uri().path(),
            claims.sub,
            claims.role.as_str()
        );
        return Err(ApiError::Forbidden("Admin access required"));
    }

    Ok(next.run(req).await)
}

fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Extract claims from request (use after auth middleware)
pub fn extract_claims(req: &Request) -> Option<&Claims> {
    req.extensions().get::<Claims>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::UserRole;
    use axum::{body::Body, http::Request as HttpRequest};

    #[test]
    fn test_bearer_token_parsing() {
        let req = HttpRequest::builder()
            .header(AUTHORIZATION, "Bearer abc.def.ghi")
            .body(Body::empty())
            .unwrap();
        assert_eq!(bearer_token(&req), Some("abc.def.ghi"));

        let req = HttpRequest::builder()
            .header(AUTHORIZATION, "Basic dXNlcjpwYXNz")
            .body(Body::empty())
            .unwrap();
        assert_eq!(bearer_token(&req), None);

        let req = HttpRequest::builder()
            .header(AUTHORIZATION, "Bearer ")
            .body(Body::empty())
            .unwrap();
        assert_eq!(bearer_token(&req), None);

        let req = HttpRequest::builder().body(Body::empty()).unwrap();
        assert_eq!(bearer_token(&req), None);
    }

    #[test]
    fn test_extract_claims_from_request() {
        let mut req = Request::new(Body::empty());

        assert!(extract_claims(&req).is_none());

        req.extensions_mut().insert(Claims {
            sub: "test".to_string(),
            role: UserRole::User,
            iat: 1234567000,
            exp: 1234567890,
        });

        let extracted = extract_claims(&req).unwrap();
        assert_eq!(extracted.username(), "test");
    }
}
