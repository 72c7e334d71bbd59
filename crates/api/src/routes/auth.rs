//! Session validation routes.

use axum::{extract::State, Json};
use domain::models::{LoginData, UserResponse, ValidateTokenRequest};
use persistence::repositories::UserRepository;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::services::identity::IdentityError;

/// POST /api/v1/auth/validate
///
/// Verifies a provider-issued token and returns the caller's profile.
/// The local user row is created or refreshed as a side effect, so this
/// doubles as the login endpoint for new users.
pub async fn validate_token(
    State(state): State<AppState>,
    Json(request): Json<ValidateTokenRequest>,
) -> Result<Json<ApiResponse<LoginData>>, ApiError> {
    request.validate()?;

    let identity = state
        .identity
        .verify_token(&request.token)
        .await
        .map_err(|e| match e {
            IdentityError::Unreachable(msg) => ApiError::Upstream(msg),
            _ => ApiError::Unauthorized("Invalid or expired token".to_string()),
        })?;

    let user_repo = UserRepository::new(state.pool.clone());
    let user = user_repo
        .upsert_from_identity(
            identity.id,
            &identity.email,
            &identity.full_name,
            identity.avatar.as_deref(),
        )
        .await?;

    info!(user_id = %user.id, "Validated session token");

    Ok(Json(ApiResponse::ok(LoginData {
        user: UserResponse::from(user),
        token: request.token,
    })))
}
