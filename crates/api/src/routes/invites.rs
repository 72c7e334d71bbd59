//! Invitation routes.
//!
//! An invite token is a capability: anyone who holds the link can decline
//! without signing in, but accepting requires an authenticated account whose
//! email matches the invited address.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use domain::models::{CreateInviteRequest, GroupResponse, InviteDetail, InviteSummary};
use persistence::entities::InviteWithDetailsEntity;
use persistence::repositories::{
    default_invite_expiration, AcceptOutcome, GroupRepository, InviteRepository, UserRepository,
};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{CurrentUser, OptionalCurrentUser};
use crate::middleware::metrics::{record_invite_issued, record_invite_resolution};
use crate::middleware::auth::AuthUser;
use crate::response::{ApiResponse, EmptyResponse};

/// Resolved invites bind to the account id; unresolved ones match by the
/// caller's current email, so an invitee who changes their address after
/// signup can still accept.
fn is_authorized_recipient(invite: &InviteWithDetailsEntity, caller: &AuthUser) -> bool {
    match invite.invitee_id {
        Some(id) => id == caller.id,
        None => invite.is_addressed_to(&caller.email),
    }
}

/// Existence, then state, then time. The order makes the error messages
/// deterministic.
fn check_live(invite: &InviteWithDetailsEntity) -> Result<(), ApiError> {
    if !invite.is_pending() {
        return Err(ApiError::Conflict(
            "Invitation is no longer pending".to_string(),
        ));
    }
    if invite.is_expired_at(Utc::now()) {
        return Err(ApiError::Conflict("Invitation has expired".to_string()));
    }
    Ok(())
}

/// POST /api/v1/groups/:group_id/invites
///
/// Issues an invite to an email address. Any member may invite.
/// The notification email is fire-and-forget; issuance succeeds even
/// when delivery fails.
pub async fn create_invite(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(group_id): Path<Uuid>,
    Json(request): Json<CreateInviteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let group_repo = GroupRepository::new(state.pool.clone());
    let group = group_repo
        .find_by_id(group_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Group not found".to_string()))?;

    if !group_repo.is_member(group_id, caller.id).await? {
        return Err(ApiError::Forbidden(
            "You are not a member of this group".to_string(),
        ));
    }

    let user_repo = UserRepository::new(state.pool.clone());
    let inviter_name = user_repo
        .find_by_id(caller.id)
        .await?
        .map(|u| u.full_name)
        .unwrap_or_else(|| caller.email.clone());
    let invitee = user_repo.find_by_email(&request.email).await?;

    if let Some(ref user) = invitee {
        if group_repo.is_member(group_id, user.id).await? {
            return Err(ApiError::Conflict(
                "User is already a member of this group".to_string(),
            ));
        }
    }

    let invite_repo = InviteRepository::new(state.pool.clone());
    if invite_repo.has_pending(group_id, &request.email).await? {
        return Err(ApiError::Conflict(
            "A pending invite already exists for this email".to_string(),
        ));
    }

    let token = shared::token::generate_invite_token();
    let expires_at = default_invite_expiration();

    // A concurrent issuance can still trip the partial unique index; the
    // 23505 maps to 409 through the ApiError conversion.
    let invite = invite_repo
        .create(
            group_id,
            caller.id,
            &request.email,
            invitee.as_ref().map(|u| u.id),
            &token,
            expires_at,
        )
        .await?;

    record_invite_issued();
    info!(
        invite_id = %invite.id,
        group_id = %group_id,
        inviter_id = %caller.id,
        "Issued group invite"
    );

    let invite_url = format!(
        "{}/invite/{}",
        state.config.server.app_base_url.trim_end_matches('/'),
        token
    );
    let email_service = state.email.clone();
    let invitee_email = invite.invitee_email.clone();
    let group_name = group.name.clone();
    tokio::spawn(async move {
        email_service
            .send_invite_notification(&invitee_email, &group_name, &inviter_name, &invite_url)
            .await;
    });

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(InviteSummary::from(invite))),
    ))
}

/// GET /api/v1/invites/pending
///
/// Lists live pending invites addressed to the caller, by linked user id
/// or by email match.
pub async fn list_pending_invites(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
) -> Result<Json<ApiResponse<Vec<InviteDetail>>>, ApiError> {
    let invite_repo = InviteRepository::new(state.pool.clone());
    let invites = invite_repo
        .list_pending_for_user(caller.id, &caller.email)
        .await?;

    Ok(Json(ApiResponse::list(
        invites.into_iter().map(InviteDetail::from).collect(),
    )))
}

/// GET /api/v1/invites/:token
///
/// Invite preview for the accept screen. Possession of the token is
/// enough to view; resolving still requires the recipient checks.
pub async fn get_invite(
    State(state): State<AppState>,
    CurrentUser(_caller): CurrentUser,
    Path(token): Path<String>,
) -> Result<Json<ApiResponse<InviteDetail>>, ApiError> {
    let invite_repo = InviteRepository::new(state.pool.clone());
    let invite = invite_repo
        .find_by_token(&token)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invite not found".to_string()))?;

    check_live(&invite)?;

    Ok(Json(ApiResponse::ok(InviteDetail::from(invite))))
}

/// POST /api/v1/invites/:token/accept
///
/// Atomically consumes the invite and joins the group.
pub async fn accept_invite(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(token): Path<String>,
) -> Result<Json<ApiResponse<GroupResponse>>, ApiError> {
    let invite_repo = InviteRepository::new(state.pool.clone());
    let invite = invite_repo
        .find_by_token(&token)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invite not found".to_string()))?;

    check_live(&invite)?;

    if !is_authorized_recipient(&invite, &caller) {
        return Err(ApiError::Forbidden(
            "This invite was sent to a different email address".to_string(),
        ));
    }

    // The repository re-checks pending/expiry inside the transaction, so
    // a concurrent resolution still loses cleanly.
    let group_id = match invite_repo.accept(&token, caller.id).await? {
        AcceptOutcome::Accepted { group_id } => {
            record_invite_resolution("accepted");
            info!(group_id = %group_id, user_id = %caller.id, "Invite accepted");
            group_id
        }
        AcceptOutcome::NotPending => {
            return Err(ApiError::Conflict(
                "Invitation is no longer pending".to_string(),
            ));
        }
        AcceptOutcome::AlreadyMember { group_id } => {
            warn!(group_id = %group_id, user_id = %caller.id, "Accept by existing member");
            return Err(ApiError::Conflict(
                "You are already a member of this group".to_string(),
            ));
        }
    };

    let group_repo = GroupRepository::new(state.pool.clone());
    let group = group_repo
        .find_by_id(group_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Group not found".to_string()))?;

    Ok(Json(ApiResponse::ok(GroupResponse::from(group))))
}

/// POST /api/v1/invites/:token/decline
///
/// Works without authentication so an invitee can opt out straight from
/// the email link. When a bearer token is presented, the recipient check
/// still applies.
pub async fn decline_invite(
    State(state): State<AppState>,
    OptionalCurrentUser(caller): OptionalCurrentUser,
    Path(token): Path<String>,
) -> Result<Json<EmptyResponse>, ApiError> {
    let invite_repo = InviteRepository::new(state.pool.clone());
    let invite = invite_repo
        .find_by_token(&token)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invite not found".to_string()))?;

    check_live(&invite)?;

    if let Some(ref user) = caller {
        if !is_authorized_recipient(&invite, user) {
            return Err(ApiError::Forbidden(
                "This invite was sent to a different email address".to_string(),
            ));
        }
    }

    if !invite_repo.decline(&token).await? {
        return Err(ApiError::Conflict(
            "Invitation is no longer pending".to_string(),
        ));
    }

    record_invite_resolution("declined");
    info!(invite_id = %invite.id, group_id = %invite.group_id, "Invite declined");

    Ok(Json(EmptyResponse::new("Invite declined")))
}
