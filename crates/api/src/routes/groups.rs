//! Group and membership routes.
//!
//! Role policy: the creator becomes admin and cannot be removed or demoted.
//! Admins and moderators manage membership; role changes and group
//! update/delete are admin-only. Any member may leave except the creator.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use domain::models::{
    AddMemberRequest, CreateGroupRequest, GroupDetailResponse, GroupResponse, GroupRole,
    MemberResponse, UpdateGroupRequest, UpdateMemberRoleRequest, UserGroupResponse,
};
use persistence::repositories::{GroupRepository, UserRepository};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::middleware::metrics::record_group_created;
use crate::response::{ApiResponse, EmptyResponse};

/// Resolves the caller's role in a group, or fails with 403.
async fn require_membership(
    repo: &GroupRepository,
    group_id: Uuid,
    user_id: Uuid,
) -> Result<GroupRole, ApiError> {
    repo.member_role(group_id, user_id)
        .await?
        .ok_or_else(|| ApiError::Forbidden("You are not a member of this group".to_string()))
}

/// POST /api/v1/groups
pub async fn create_group(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Json(request): Json<CreateGroupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let group_repo = GroupRepository::new(state.pool.clone());
    let group = group_repo
        .create_group(
            request.name.trim(),
            request.description.as_deref(),
            caller.id,
        )
        .await?;

    record_group_created();
    info!(group_id = %group.id, created_by = %caller.id, "Created group");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(GroupResponse::from(group))),
    ))
}

/// GET /api/v1/groups
///
/// Public group directory, no session required.
pub async fn list_groups(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<GroupResponse>>>, ApiError> {
    let group_repo = GroupRepository::new(state.pool.clone());
    let groups = group_repo.list_all().await?;

    Ok(Json(ApiResponse::list(
        groups.into_iter().map(GroupResponse::from).collect(),
    )))
}

/// GET /api/v1/groups/mine
pub async fn list_my_groups(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
) -> Result<Json<ApiResponse<Vec<UserGroupResponse>>>, ApiError> {
    let group_repo = GroupRepository::new(state.pool.clone());
    let groups = group_repo.list_user_groups(caller.id).await?;

    Ok(Json(ApiResponse::list(
        groups.into_iter().map(UserGroupResponse::from).collect(),
    )))
}

/// GET /api/v1/groups/:group_id
///
/// Basic group info, no session required.
pub async fn get_group(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
) -> Result<Json<ApiResponse<GroupResponse>>, ApiError> {
    let group_repo = GroupRepository::new(state.pool.clone());
    let group = group_repo
        .find_by_id(group_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Group not found".to_string()))?;

    Ok(Json(ApiResponse::ok(GroupResponse::from(group))))
}

/// GET /api/v1/groups/:group_id/members
///
/// Full member listing. Members only.
pub async fn list_members(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(group_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<MemberResponse>>>, ApiError> {
    let group_repo = GroupRepository::new(state.pool.clone());
    require_membership(&group_repo, group_id, caller.id).await?;

    let members: Vec<MemberResponse> = group_repo
        .list_members(group_id)
        .await?
        .into_iter()
        .map(MemberResponse::from)
        .collect();

    Ok(Json(ApiResponse::list(members)))
}

/// GET /api/v1/groups/:group_id/details
///
/// Group with creator info and the full member listing. Members only.
pub async fn get_group_details(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(group_id): Path<Uuid>,
) -> Result<Json<ApiResponse<GroupDetailResponse>>, ApiError> {
    let group_repo = GroupRepository::new(state.pool.clone());

    let group = group_repo
        .find_by_id(group_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Group not found".to_string()))?;

    require_membership(&group_repo, group_id, caller.id).await?;

    let members: Vec<MemberResponse> = group_repo
        .list_members(group_id)
        .await?
        .into_iter()
        .map(MemberResponse::from)
        .collect();

    let creator_name = members
        .iter()
        .find(|m| m.user_id == group.created_by)
        .map(|m| m.full_name.clone())
        .unwrap_or_default();

    Ok(Json(ApiResponse::ok(GroupDetailResponse {
        id: group.id,
        name: group.name,
        description: group.description,
        creator_id: group.created_by,
        creator_name,
        created_at: group.created_at,
        members,
    })))
}

/// PUT /api/v1/groups/:group_id
///
/// Admin-only typed partial update.
pub async fn update_group(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(group_id): Path<Uuid>,
    Json(request): Json<UpdateGroupRequest>,
) -> Result<Json<ApiResponse<GroupResponse>>, ApiError> {
    request.validate()?;

    if request.is_empty() {
        return Err(ApiError::Validation("No fields to update".to_string()));
    }

    let group_repo = GroupRepository::new(state.pool.clone());
    let role = require_membership(&group_repo, group_id, caller.id).await?;
    if role != GroupRole::Admin {
        return Err(ApiError::Forbidden(
            "Only admins can update the group".to_string(),
        ));
    }

    let group = group_repo
        .update(
            group_id,
            request.name.as_deref().map(str::trim),
            request.description.as_deref(),
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Group not found".to_string()))?;

    info!(group_id = %group_id, updated_by = %caller.id, "Updated group");

    Ok(Json(ApiResponse::ok(GroupResponse::from(group))))
}

/// DELETE /api/v1/groups/:group_id
///
/// Admin-only. Memberships, invites and ledger entries cascade.
pub async fn delete_group(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(group_id): Path<Uuid>,
) -> Result<Json<EmptyResponse>, ApiError> {
    let group_repo = GroupRepository::new(state.pool.clone());
    let role = require_membership(&group_repo, group_id, caller.id).await?;
    if role != GroupRole::Admin {
        return Err(ApiError::Forbidden(
            "Only admins can delete the group".to_string(),
        ));
    }

    if !group_repo.delete(group_id).await? {
        return Err(ApiError::NotFound("Group not found".to_string()));
    }

    info!(group_id = %group_id, deleted_by = %caller.id, "Deleted group");

    Ok(Json(EmptyResponse::new("Group deleted")))
}

/// POST /api/v1/groups/:group_id/members
///
/// Directly adds an existing user. Admins may set any role; moderators
/// can only add plain members.
pub async fn add_member(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(group_id): Path<Uuid>,
    Json(request): Json<AddMemberRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let group_repo = GroupRepository::new(state.pool.clone());
    let caller_role = require_membership(&group_repo, group_id, caller.id).await?;
    if !caller_role.can_manage_members() {
        return Err(ApiError::Forbidden(
            "Only admins and moderators can add members".to_string(),
        ));
    }

    let new_role = request.role.unwrap_or(GroupRole::Member);
    if new_role != GroupRole::Member && caller_role != GroupRole::Admin {
        return Err(ApiError::Forbidden(
            "Only admins can grant elevated roles".to_string(),
        ));
    }

    let user_repo = UserRepository::new(state.pool.clone());
    let user = user_repo
        .find_by_id(request.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let member = group_repo
        .add_member(group_id, request.user_id, new_role)
        .await?
        .ok_or_else(|| ApiError::Conflict("User is already a member".to_string()))?;

    info!(
        group_id = %group_id,
        user_id = %request.user_id,
        role = %new_role,
        added_by = %caller.id,
        "Added group member"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(MemberResponse {
            user_id: user.id,
            email: user.email,
            full_name: user.full_name,
            avatar: user.avatar,
            role: member.role(),
            joined_at: member.joined_at,
        })),
    ))
}

/// DELETE /api/v1/groups/:group_id/members/:user_id
///
/// Admins and moderators remove others; anyone may remove themselves.
/// The creator cannot be removed.
pub async fn remove_member(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path((group_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<EmptyResponse>, ApiError> {
    let group_repo = GroupRepository::new(state.pool.clone());

    let group = group_repo
        .find_by_id(group_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Group not found".to_string()))?;

    if user_id == group.created_by {
        return Err(ApiError::Forbidden(
            "The group creator cannot be removed".to_string(),
        ));
    }

    let caller_role = require_membership(&group_repo, group_id, caller.id).await?;
    if caller.id != user_id && !caller_role.can_manage_members() {
        return Err(ApiError::Forbidden(
            "Only admins and moderators can remove members".to_string(),
        ));
    }

    if !group_repo.remove_member(group_id, user_id).await? {
        return Err(ApiError::NotFound("Member not found".to_string()));
    }

    info!(
        group_id = %group_id,
        user_id = %user_id,
        removed_by = %caller.id,
        "Removed group member"
    );

    Ok(Json(EmptyResponse::new("Member removed")))
}

/// PUT /api/v1/groups/:group_id/members/:user_id/role
///
/// Admin-only. The creator's role is immutable.
pub async fn update_member_role(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path((group_id, user_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateMemberRoleRequest>,
) -> Result<Json<ApiResponse<MemberResponse>>, ApiError> {
    let group_repo = GroupRepository::new(state.pool.clone());

    let group = group_repo
        .find_by_id(group_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Group not found".to_string()))?;

    if user_id == group.created_by {
        return Err(ApiError::Forbidden(
            "The creator's role cannot be changed".to_string(),
        ));
    }

    let caller_role = require_membership(&group_repo, group_id, caller.id).await?;
    if caller_role != GroupRole::Admin {
        return Err(ApiError::Forbidden(
            "Only admins can change member roles".to_string(),
        ));
    }

    let member = group_repo
        .update_member_role(group_id, user_id, request.role)
        .await?
        .ok_or_else(|| ApiError::NotFound("Member not found".to_string()))?;

    let user_repo = UserRepository::new(state.pool.clone());
    let user = user_repo
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    info!(
        group_id = %group_id,
        user_id = %user_id,
        role = %request.role,
        changed_by = %caller.id,
        "Changed member role"
    );

    Ok(Json(ApiResponse::ok(MemberResponse {
        user_id: user.id,
        email: user.email,
        full_name: user.full_name,
        avatar: user.avatar,
        role: member.role(),
        joined_at: member.joined_at,
    })))
}

/// POST /api/v1/groups/:group_id/join
///
/// Self-service join as a plain member.
pub async fn join_group(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(group_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let group_repo = GroupRepository::new(state.pool.clone());

    let group = group_repo
        .find_by_id(group_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Group not found".to_string()))?;

    group_repo
        .add_member(group_id, caller.id, GroupRole::Member)
        .await?
        .ok_or_else(|| ApiError::Conflict("You are already a member".to_string()))?;

    info!(group_id = %group_id, user_id = %caller.id, "Member joined group");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(GroupResponse::from(group))),
    ))
}

/// POST /api/v1/groups/:group_id/leave
///
/// Self-service removal. The creator cannot leave their own group.
pub async fn leave_group(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(group_id): Path<Uuid>,
) -> Result<Json<EmptyResponse>, ApiError> {
    let group_repo = GroupRepository::new(state.pool.clone());

    let group = group_repo
        .find_by_id(group_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Group not found".to_string()))?;

    if caller.id == group.created_by {
        return Err(ApiError::Forbidden(
            "The group creator cannot leave; delete the group instead".to_string(),
        ));
    }

    if !group_repo.remove_member(group_id, caller.id).await? {
        return Err(ApiError::Forbidden(
            "You are not a member of this group".to_string(),
        ));
    }

    info!(group_id = %group_id, user_id = %caller.id, "Member left group");

    Ok(Json(EmptyResponse::new("Left group")))
}
