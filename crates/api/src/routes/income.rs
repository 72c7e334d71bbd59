//! Income ledger routes. Income is always recorded against the caller.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use domain::models::{CreateIncomeRequest, IncomeResponse, UpdateIncomeRequest};
use persistence::repositories::{GroupRepository, IncomeRepository};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::response::{ApiResponse, EmptyResponse};

/// GET /api/v1/groups/:group_id/income
pub async fn list_group_income(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(group_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<IncomeResponse>>>, ApiError> {
    let group_repo = GroupRepository::new(state.pool.clone());
    if !group_repo.is_member(group_id, caller.id).await? {
        return Err(ApiError::Forbidden(
            "You are not a member of this group".to_string(),
        ));
    }

    let income_repo = IncomeRepository::new(state.pool.clone());
    let entries = income_repo.list_by_group(group_id).await?;

    Ok(Json(ApiResponse::list(
        entries.into_iter().map(IncomeResponse::from).collect(),
    )))
}

/// POST /api/v1/income
pub async fn create_income(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Json(request): Json<CreateIncomeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let group_repo = GroupRepository::new(state.pool.clone());
    if !group_repo.is_member(request.group_id, caller.id).await? {
        return Err(ApiError::Forbidden(
            "You are not a member of this group".to_string(),
        ));
    }

    let income_repo = IncomeRepository::new(state.pool.clone());
    let income = income_repo
        .create(
            request.group_id,
            caller.id,
            request.title.trim(),
            request.amount,
            request.category.map(|c| c.as_str()),
            request.description.as_deref(),
            request.income_date.unwrap_or_else(Utc::now),
        )
        .await?;

    info!(
        income_id = %income.id,
        group_id = %income.group_id,
        user_id = %caller.id,
        "Recorded income"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(IncomeResponse::from(income))),
    ))
}

/// PUT /api/v1/income/:income_id
///
/// Editable by the recipient, or by an admin/moderator of the group.
pub async fn update_income(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(income_id): Path<Uuid>,
    Json(request): Json<UpdateIncomeRequest>,
) -> Result<Json<ApiResponse<IncomeResponse>>, ApiError> {
    request.validate()?;

    if request.is_empty() {
        return Err(ApiError::Validation("No fields to update".to_string()));
    }

    let income_repo = IncomeRepository::new(state.pool.clone());
    let existing = income_repo
        .find_by_id(income_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Income entry not found".to_string()))?;

    let group_repo = GroupRepository::new(state.pool.clone());
    let role = group_repo
        .member_role(existing.group_id, caller.id)
        .await?
        .ok_or_else(|| ApiError::Forbidden("You are not a member of this group".to_string()))?;

    if existing.user_id != caller.id && !role.can_manage_members() {
        return Err(ApiError::Forbidden(
            "Only the recipient or a group manager can edit this entry".to_string(),
        ));
    }

    let income = income_repo
        .update(
            income_id,
            request.title.as_deref().map(str::trim),
            request.amount,
            request.category.map(|c| c.as_str()),
            request.description.as_deref(),
            request.income_date,
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Income entry not found".to_string()))?;

    Ok(Json(ApiResponse::ok(IncomeResponse::from(income))))
}

/// DELETE /api/v1/income/:income_id
pub async fn delete_income(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(income_id): Path<Uuid>,
) -> Result<Json<EmptyResponse>, ApiError> {
    let income_repo = IncomeRepository::new(state.pool.clone());
    let existing = income_repo
        .find_by_id(income_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Income entry not found".to_string()))?;

    let group_repo = GroupRepository::new(state.pool.clone());
    let role = group_repo
        .member_role(existing.group_id, caller.id)
        .await?
        .ok_or_else(|| ApiError::Forbidden("You are not a member of this group".to_string()))?;

    if existing.user_id != caller.id && !role.can_manage_members() {
        return Err(ApiError::Forbidden(
            "Only the recipient or a group manager can delete this entry".to_string(),
        ));
    }

    if !income_repo.delete(income_id).await? {
        return Err(ApiError::NotFound("Income entry not found".to_string()));
    }

    info!(income_id = %income_id, deleted_by = %caller.id, "Deleted income entry");

    Ok(Json(EmptyResponse::new("Income entry deleted")))
}
