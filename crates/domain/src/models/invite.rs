//! Group invitation domain models.
//!
//! An invite moves `pending -> accepted` or `pending -> declined`; both are
//! terminal. An invite past its expiry is rejected by every resolution
//! attempt regardless of the stored status (the row is never rewritten to an
//! "expired" state).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Days until a freshly issued invite expires.
pub const INVITE_EXPIRY_DAYS: i64 = 7;

/// Stored lifecycle state of an invite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InviteStatus {
    Pending,
    Accepted,
    Declined,
}

impl InviteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InviteStatus::Pending => "pending",
            InviteStatus::Accepted => "accepted",
            InviteStatus::Declined => "declined",
        }
    }
}

impl fmt::Display for InviteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InviteStatus {
    type Err = InvalidInviteStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InviteStatus::Pending),
            "accepted" => Ok(InviteStatus::Accepted),
            "declined" => Ok(InviteStatus::Declined),
            other => Err(InvalidInviteStatus(other.to_string())),
        }
    }
}

/// Error returned when a status string is not recognized.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Invalid invite status: {0}")]
pub struct InvalidInviteStatus(pub String);

/// Request body for `POST /api/groups/:id/invite`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateInviteRequest {
    #[validate(email(message = "Invalid email format"))]
    #[validate(length(max = 255, message = "Email must be at most 255 characters"))]
    pub email: String,
}

/// Invite summary returned after issuance.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct InviteSummary {
    pub id: Uuid,
    pub group_id: Uuid,
    pub invitee_email: String,
    pub status: InviteStatus,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Invite with denormalized group and inviter display info.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct InviteDetail {
    pub id: Uuid,
    pub group_id: Uuid,
    pub group_name: String,
    pub inviter_name: String,
    pub inviter_email: String,
    pub invitee_email: String,
    pub status: InviteStatus,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            InviteStatus::Pending,
            InviteStatus::Accepted,
            InviteStatus::Declined,
        ] {
            assert_eq!(status.as_str().parse::<InviteStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_status_parse_invalid() {
        assert!("expired".parse::<InviteStatus>().is_err());
    }

    #[test]
    fn test_status_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&InviteStatus::Pending).unwrap(),
            "\"pending\""
        );
    }

    #[test]
    fn test_create_invite_request_invalid_email() {
        let req = CreateInviteRequest {
            email: "not-an-email".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_invite_request_valid_email() {
        let req = CreateInviteRequest {
            email: "a@example.com".to_string(),
        };
        assert!(req.validate().is_ok());
    }
}
