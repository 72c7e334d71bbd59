//! Group and membership domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Role a member holds within a group.
///
/// The group creator is inserted as `Admin` when the group is created and
/// keeps that role for the lifetime of the group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupRole {
    Admin,
    Moderator,
    Member,
}

impl GroupRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupRole::Admin => "admin",
            GroupRole::Moderator => "moderator",
            GroupRole::Member => "member",
        }
    }

    /// True when this role may add or remove other members.
    pub fn can_manage_members(&self) -> bool {
        matches!(self, GroupRole::Admin | GroupRole::Moderator)
    }
}

impl fmt::Display for GroupRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupRole {
    type Err = InvalidRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(GroupRole::Admin),
            "moderator" => Ok(GroupRole::Moderator),
            "member" => Ok(GroupRole::Member),
            other => Err(InvalidRole(other.to_string())),
        }
    }
}

/// Error returned when a role string is not recognized.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Invalid role: {0}")]
pub struct InvalidRole(pub String);

/// Request to create a new group.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateGroupRequest {
    #[validate(custom(function = "shared::validation::validate_group_name"))]
    pub name: String,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
}

/// Typed partial update for a group.
///
/// Only name and description are updatable; ownership and timestamps are
/// managed by the service.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateGroupRequest {
    #[validate(custom(function = "shared::validation::validate_group_name"))]
    pub name: Option<String>,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
}

impl UpdateGroupRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

/// Request to add an existing user to a group directly.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct AddMemberRequest {
    pub user_id: Uuid,
    pub role: Option<GroupRole>,
}

/// Request to change a member's role.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct UpdateMemberRoleRequest {
    pub role: GroupRole,
}

/// Group as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct GroupResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Group member with denormalized user display info.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MemberResponse {
    pub user_id: Uuid,
    pub email: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub role: GroupRole,
    pub joined_at: DateTime<Utc>,
}

/// Group with creator info and full member listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct GroupDetailResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub creator_id: Uuid,
    pub creator_name: String,
    pub created_at: DateTime<Utc>,
    pub members: Vec<MemberResponse>,
}

/// Group as seen from a member's "my groups" listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct UserGroupResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub joined_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [GroupRole::Admin, GroupRole::Moderator, GroupRole::Member] {
            assert_eq!(role.as_str().parse::<GroupRole>().unwrap(), role);
        }
    }

    #[test]
    fn test_role_parse_invalid() {
        assert!("owner".parse::<GroupRole>().is_err());
        assert!("".parse::<GroupRole>().is_err());
    }

    #[test]
    fn test_role_can_manage_members() {
        assert!(GroupRole::Admin.can_manage_members());
        assert!(GroupRole::Moderator.can_manage_members());
        assert!(!GroupRole::Member.can_manage_members());
    }

    #[test]
    fn test_role_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&GroupRole::Moderator).unwrap(),
            "\"moderator\""
        );
    }

    #[test]
    fn test_create_group_request_blank_name() {
        let req = CreateGroupRequest {
            name: "   ".to_string(),
            description: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_group_request_valid() {
        let req = CreateGroupRequest {
            name: "Household".to_string(),
            description: Some("Shared flat expenses".to_string()),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_update_group_request_is_empty() {
        let req = UpdateGroupRequest {
            name: None,
            description: None,
        };
        assert!(req.is_empty());
    }

    #[test]
    fn test_update_group_request_name_too_long() {
        let req = UpdateGroupRequest {
            name: Some("x".repeat(256)),
            description: None,
        };
        assert!(req.validate().is_err());
    }
}
