//! Group invite entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::{InviteDetail, InviteStatus, InviteSummary};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the group_invites table.
#[derive(Debug, Clone, FromRow)]
pub struct GroupInviteEntity {
    pub id: Uuid,
    pub group_id: Uuid,
    pub inviter_id: Uuid,
    pub invitee_email: String,
    pub invitee_id: Option<Uuid>,
    pub status: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GroupInviteEntity {
    pub fn status(&self) -> InviteStatus {
        self.status.parse().unwrap_or(InviteStatus::Pending)
    }

    pub fn is_pending(&self) -> bool {
        self.status == "pending"
    }

    /// Expiry boundary is exclusive: an invite is live only while
    /// `expires_at > now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Check that `email` is the invited address (case-insensitive).
    pub fn is_addressed_to(&self, email: &str) -> bool {
        self.invitee_email.eq_ignore_ascii_case(email)
    }
}

impl From<GroupInviteEntity> for InviteSummary {
    fn from(entity: GroupInviteEntity) -> Self {
        let status = entity.status();
        InviteSummary {
            id: entity.id,
            group_id: entity.group_id,
            invitee_email: entity.invitee_email,
            status,
            expires_at: entity.expires_at,
            created_at: entity.created_at,
        }
    }
}

/// Invite joined with group name and inviter display info.
#[derive(Debug, Clone, FromRow)]
pub struct InviteWithDetailsEntity {
    pub id: Uuid,
    pub group_id: Uuid,
    pub inviter_id: Uuid,
    pub invitee_email: String,
    pub invitee_id: Option<Uuid>,
    pub status: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub group_name: String,
    pub inviter_name: String,
    pub inviter_email: String,
}

impl InviteWithDetailsEntity {
    pub fn status(&self) -> InviteStatus {
        self.status.parse().unwrap_or(InviteStatus::Pending)
    }

    pub fn is_pending(&self) -> bool {
        self.status == "pending"
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn is_addressed_to(&self, email: &str) -> bool {
        self.invitee_email.eq_ignore_ascii_case(email)
    }
}

impl From<InviteWithDetailsEntity> for InviteDetail {
    fn from(entity: InviteWithDetailsEntity) -> Self {
        let status = entity.status();
        InviteDetail {
            id: entity.id,
            group_id: entity.group_id,
            group_name: entity.group_name,
            inviter_name: entity.inviter_name,
            inviter_email: entity.inviter_email,
            invitee_email: entity.invitee_email,
            status,
            expires_at: entity.expires_at,
            created_at: entity.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn test_invite(status: &str, expires_at: DateTime<Utc>) -> GroupInviteEntity {
        GroupInviteEntity {
            id: Uuid::new_v4(),
            group_id: Uuid::new_v4(),
            inviter_id: Uuid::new_v4(),
            invitee_email: "a@example.com".to_string(),
            invitee_id: None,
            status: status.to_string(),
            token: "tok".to_string(),
            expires_at,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_is_pending() {
        assert!(test_invite("pending", Utc::now()).is_pending());
        assert!(!test_invite("accepted", Utc::now()).is_pending());
        assert!(!test_invite("declined", Utc::now()).is_pending());
    }

    #[test]
    fn test_expiry_boundary_is_exclusive() {
        let now = Utc::now();
        // expires_at exactly equal to "now" counts as expired
        assert!(test_invite("pending", now).is_expired_at(now));
        assert!(test_invite("pending", now - Duration::seconds(1)).is_expired_at(now));
        assert!(!test_invite("pending", now + Duration::seconds(1)).is_expired_at(now));
    }

    #[test]
    fn test_is_addressed_to_case_insensitive() {
        let invite = test_invite("pending", Utc::now() + Duration::days(7));
        assert!(invite.is_addressed_to("A@Example.COM"));
        assert!(!invite.is_addressed_to("b@example.com"));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(test_invite("declined", Utc::now()).status(), InviteStatus::Declined);
    }
}
