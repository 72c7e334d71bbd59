//! Bearer token authentication middleware.
//!
//! Tokens are verified against the external identity provider. On success
//! the caller's profile is mirrored into the local users table and an
//! [`AuthUser`] is stored in request extensions for downstream handlers.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use persistence::repositories::UserRepository;
use serde_json::json;
use uuid::Uuid;

use crate::app::AppState;
use crate::services::identity::IdentityError;

/// Authenticated caller stored in request extensions.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

/// Middleware that requires a valid bearer token.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = match bearer_token(&req) {
        Some(token) => token.to_string(),
        None => return unauthorized_response("Missing or invalid Authorization header"),
    };

    match authenticate(&state, &token).await {
        Ok(auth) => {
            req.extensions_mut().insert(auth);
            next.run(req).await
        }
        Err(response) => response,
    }
}

/// Middleware that authenticates the caller when a bearer token is present
/// but lets unauthenticated requests through.
///
/// Used on the decline endpoint, where the invite token itself is the
/// capability.
pub async fn optional_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(token) = bearer_token(&req).map(|t| t.to_string()) {
        if let Ok(auth) = authenticate(&state, &token).await {
            req.extensions_mut().insert(auth);
        }
    }
    next.run(req).await
}

fn bearer_token(req: &Request<Body>) -> Option<&str> {
    req.headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
}

async fn authenticate(state: &AppState, token: &str) -> Result<AuthUser, Response> {
    let identity = state.identity.verify_token(token).await.map_err(|e| match e {
        IdentityError::InvalidToken => unauthorized_response("Invalid or expired token"),
        IdentityError::MalformedUser(msg) => {
            tracing::error!("Identity provider returned malformed user: {}", msg);
            unauthorized_response("Invalid or expired token")
        }
        IdentityError::Unreachable(msg) => {
            tracing::error!("Identity provider unreachable: {}", msg);
            upstream_response("Authentication service unavailable")
        }
    })?;

    // Keep the local profile in sync with the provider
    let user_repo = UserRepository::new(state.pool.clone());
    user_repo
        .upsert_from_identity(
            identity.id,
            &identity.email,
            &identity.full_name,
            identity.avatar.as_deref(),
        )
        .await
        .map_err(|e| {
            tracing::error!("Failed to upsert authenticated user: {}", e);
            internal_response("Failed to resolve user profile")
        })?;

    Ok(AuthUser {
        id: identity.id,
        email: identity.email,
    })
}

fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "success": false,
            "error": "unauthorized",
            "message": message
        })),
    )
        .into_response()
}

fn upstream_response(message: &str) -> Response {
    (
        StatusCode::BAD_GATEWAY,
        Json(json!({
            "success": false,
            "error": "upstream_error",
            "message": message
        })),
    )
        .into_response()
}

fn internal_response(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "success": false,
            "error": "internal_error",
            "message": message
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with_header(value: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/");
        if let Some(v) = value {
            builder = builder.header("Authorization", v);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_bearer_token_extracted() {
        let req = request_with_header(Some("Bearer abc123"));
        assert_eq!(bearer_token(&req), Some("abc123"));
    }

    #[test]
    fn test_bearer_token_missing_header() {
        let req = request_with_header(None);
        assert_eq!(bearer_token(&req), None);
    }

    #[test]
    fn test_bearer_token_wrong_scheme() {
        let req = request_with_header(Some("Basic dXNlcjpwYXNz"));
        assert_eq!(bearer_token(&req), None);
    }

    #[test]
    fn test_bearer_token_empty_rejected() {
        let req = request_with_header(Some("Bearer "));
        assert_eq!(bearer_token(&req), None);
    }

    #[test]
    fn test_unauthorized_response_status() {
        let response = unauthorized_response("nope");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_upstream_response_status() {
        let response = upstream_response("down");
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
