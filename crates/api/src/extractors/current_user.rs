//! Extractors for the authenticated caller.
//!
//! Both read the [`AuthUser`] inserted by the auth middleware; handlers
//! never touch the Authorization header directly.

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;

/// Extractor that requires an authenticated caller.
///
/// Fails with 401 when used on a route the auth middleware did not cover.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthUser);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))
    }
}

/// Extractor that yields the caller when authenticated, `None` otherwise.
#[derive(Debug, Clone)]
pub struct OptionalCurrentUser(pub Option<AuthUser>);

#[async_trait]
impl<S> FromRequestParts<S> for OptionalCurrentUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalCurrentUser(
            parts.extensions.get::<AuthUser>().cloned(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use uuid::Uuid;

    fn parts_with_auth(auth: Option<AuthUser>) -> Parts {
        let mut req = Request::builder().uri("/").body(()).unwrap();
        if let Some(auth) = auth {
            req.extensions_mut().insert(auth);
        }
        req.into_parts().0
    }

    #[tokio::test]
    async fn test_current_user_present() {
        let auth = AuthUser {
            id: Uuid::new_v4(),
            email: "a@b.com".to_string(),
        };
        let mut parts = parts_with_auth(Some(auth.clone()));
        let extracted = CurrentUser::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(extracted.0.id, auth.id);
        assert_eq!(extracted.0.email, "a@b.com");
    }

    #[tokio::test]
    async fn test_current_user_missing_rejected() {
        let mut parts = parts_with_auth(None);
        let result = CurrentUser::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_optional_current_user_missing_is_none() {
        let mut parts = parts_with_auth(None);
        let extracted = OptionalCurrentUser::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!(extracted.0.is_none());
    }
}
