//! Expense ledger routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use domain::models::{
    ClassificationResult, ClassifyExpenseRequest, CreateExpenseRequest, ExpenseResponse,
    OcrExpenseRequest, OcrExpenseResult, UpdateExpenseRequest,
};
use persistence::repositories::{ExpenseRepository, GroupRepository};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::response::{ApiResponse, EmptyResponse};
use crate::services::classifier::ClassifierError;

async fn require_member(
    group_repo: &GroupRepository,
    group_id: Uuid,
    user_id: Uuid,
) -> Result<(), ApiError> {
    if !group_repo.is_member(group_id, user_id).await? {
        return Err(ApiError::Forbidden(
            "You are not a member of this group".to_string(),
        ));
    }
    Ok(())
}

/// GET /api/v1/groups/:group_id/expenses
pub async fn list_group_expenses(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(group_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<ExpenseResponse>>>, ApiError> {
    let group_repo = GroupRepository::new(state.pool.clone());
    require_member(&group_repo, group_id, caller.id).await?;

    let expense_repo = ExpenseRepository::new(state.pool.clone());
    let expenses = expense_repo.list_by_group(group_id).await?;

    Ok(Json(ApiResponse::list(
        expenses.into_iter().map(ExpenseResponse::from).collect(),
    )))
}

/// POST /api/v1/expenses
///
/// Any member may record an expense, including on behalf of another
/// member as the payer.
pub async fn create_expense(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Json(request): Json<CreateExpenseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let group_repo = GroupRepository::new(state.pool.clone());
    require_member(&group_repo, request.group_id, caller.id).await?;

    if !group_repo.is_member(request.group_id, request.paid_by).await? {
        return Err(ApiError::Validation(
            "The payer must be a member of the group".to_string(),
        ));
    }

    let expense_repo = ExpenseRepository::new(state.pool.clone());
    let expense = expense_repo
        .create(
            request.group_id,
            request.title.trim(),
            request.amount,
            request.description.as_deref(),
            request.category.as_deref(),
            request.paid_by,
            request.expense_date.unwrap_or_else(Utc::now),
        )
        .await?;

    info!(
        expense_id = %expense.id,
        group_id = %expense.group_id,
        created_by = %caller.id,
        "Recorded expense"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(ExpenseResponse::from(expense))),
    ))
}

/// PUT /api/v1/expenses/:expense_id
///
/// Editable by the payer, or by an admin/moderator of the group.
pub async fn update_expense(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(expense_id): Path<Uuid>,
    Json(request): Json<UpdateExpenseRequest>,
) -> Result<Json<ApiResponse<ExpenseResponse>>, ApiError> {
    request.validate()?;

    if request.is_empty() {
        return Err(ApiError::Validation("No fields to update".to_string()));
    }

    let expense_repo = ExpenseRepository::new(state.pool.clone());
    let existing = expense_repo
        .find_by_id(expense_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Expense not found".to_string()))?;

    let group_repo = GroupRepository::new(state.pool.clone());
    let role = group_repo
        .member_role(existing.group_id, caller.id)
        .await?
        .ok_or_else(|| ApiError::Forbidden("You are not a member of this group".to_string()))?;

    if existing.paid_by != caller.id && !role.can_manage_members() {
        return Err(ApiError::Forbidden(
            "Only the payer or a group manager can edit this expense".to_string(),
        ));
    }

    let expense = expense_repo
        .update(
            expense_id,
            request.title.as_deref().map(str::trim),
            request.amount,
            request.description.as_deref(),
            request.category.as_deref(),
            request.expense_date,
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Expense not found".to_string()))?;

    Ok(Json(ApiResponse::ok(ExpenseResponse::from(expense))))
}

/// DELETE /api/v1/expenses/:expense_id
pub async fn delete_expense(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(expense_id): Path<Uuid>,
) -> Result<Json<EmptyResponse>, ApiError> {
    let expense_repo = ExpenseRepository::new(state.pool.clone());
    let existing = expense_repo
        .find_by_id(expense_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Expense not found".to_string()))?;

    let group_repo = GroupRepository::new(state.pool.clone());
    let role = group_repo
        .member_role(existing.group_id, caller.id)
        .await?
        .ok_or_else(|| ApiError::Forbidden("You are not a member of this group".to_string()))?;

    if existing.paid_by != caller.id && !role.can_manage_members() {
        return Err(ApiError::Forbidden(
            "Only the payer or a group manager can delete this expense".to_string(),
        ));
    }

    if !expense_repo.delete(expense_id).await? {
        return Err(ApiError::NotFound("Expense not found".to_string()));
    }

    info!(expense_id = %expense_id, deleted_by = %caller.id, "Deleted expense");

    Ok(Json(EmptyResponse::new("Expense deleted")))
}

/// POST /api/v1/expenses/classify
///
/// Categorizes free-text expense data. Falls back to a keyword heuristic
/// when no classification endpoint is configured.
pub async fn classify_expense(
    State(state): State<AppState>,
    CurrentUser(_caller): CurrentUser,
    Json(request): Json<ClassifyExpenseRequest>,
) -> Result<Json<ApiResponse<ClassificationResult>>, ApiError> {
    request.validate()?;

    let result = state
        .classifier
        .classify(&request.data)
        .await
        .map_err(classifier_error)?;

    Ok(Json(ApiResponse::ok(result)))
}

/// POST /api/v1/expenses/ocr
pub async fn ocr_expense(
    State(state): State<AppState>,
    CurrentUser(_caller): CurrentUser,
    Json(request): Json<OcrExpenseRequest>,
) -> Result<Json<ApiResponse<OcrExpenseResult>>, ApiError> {
    request.validate()?;

    let result = state
        .classifier
        .extract_receipt_text(&request.image)
        .await
        .map_err(classifier_error)?;

    Ok(Json(ApiResponse::ok(result)))
}

fn classifier_error(err: ClassifierError) -> ApiError {
    match err {
        ClassifierError::InvalidImage(msg) => ApiError::Validation(msg),
        ClassifierError::NotConfigured => {
            ApiError::Upstream("OCR service not configured".to_string())
        }
        ClassifierError::Upstream(msg) => ApiError::Upstream(msg),
    }
}
