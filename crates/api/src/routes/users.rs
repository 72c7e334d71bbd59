//! User profile routes.

use axum::{
    extract::{Path, State},
    Json,
};
use domain::models::{UpdateUserRequest, UserResponse};
use persistence::repositories::UserRepository;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::response::{ApiResponse, EmptyResponse};

/// GET /api/v1/users
///
/// Lists all known users, for member pickers.
pub async fn list_users(
    State(state): State<AppState>,
    CurrentUser(_caller): CurrentUser,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, ApiError> {
    let user_repo = UserRepository::new(state.pool.clone());
    let users = user_repo.list_all().await?;

    Ok(Json(ApiResponse::list(
        users.into_iter().map(UserResponse::from).collect(),
    )))
}

/// GET /api/v1/users/:user_id
pub async fn get_user(
    State(state): State<AppState>,
    CurrentUser(_caller): CurrentUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let user_repo = UserRepository::new(state.pool.clone());
    let user = user_repo
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(ApiResponse::ok(UserResponse::from(user))))
}

/// DELETE /api/v1/users/:user_id
///
/// Account deletion is self-service only. Memberships, invites, and
/// authored ledger rows cascade.
pub async fn delete_user(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<EmptyResponse>, ApiError> {
    if caller.id != user_id {
        return Err(ApiError::Forbidden(
            "You can only delete your own account".to_string(),
        ));
    }

    let user_repo = UserRepository::new(state.pool.clone());
    if !user_repo.delete(user_id).await? {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    info!(user_id = %user_id, "Deleted user account");

    Ok(Json(EmptyResponse::new("Account deleted")))
}

/// GET /api/v1/users/me
pub async fn get_profile(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let user_repo = UserRepository::new(state.pool.clone());
    let user = user_repo
        .find_by_id(caller.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(ApiResponse::ok(UserResponse::from(user))))
}

/// PUT /api/v1/users/me
///
/// Typed partial update of the caller's profile.
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    request.validate()?;

    if request.is_empty() {
        return Err(ApiError::Validation("No fields to update".to_string()));
    }

    let user_repo = UserRepository::new(state.pool.clone());
    let user = user_repo
        .update_profile(
            caller.id,
            request.full_name.as_deref(),
            request.avatar.as_deref(),
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    info!(user_id = %caller.id, "Updated user profile");

    Ok(Json(ApiResponse::ok(UserResponse::from(user))))
}
