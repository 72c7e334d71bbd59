//! Group and membership entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::{GroupResponse, GroupRole, MemberResponse, UserGroupResponse};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the groups table.
#[derive(Debug, Clone, FromRow)]
pub struct GroupEntity {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<GroupEntity> for GroupResponse {
    fn from(entity: GroupEntity) -> Self {
        GroupResponse {
            id: entity.id,
            name: entity.name,
            description: entity.description,
            created_by: entity.created_by,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Database row mapping for the group_members table.
#[derive(Debug, Clone, FromRow)]
pub struct GroupMemberEntity {
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub role: String,
    pub joined_at: DateTime<Utc>,
}

impl GroupMemberEntity {
    /// Parse the stored role string. The column carries a CHECK constraint,
    /// so an unparseable value indicates schema drift; fall back to member.
    pub fn role(&self) -> GroupRole {
        self.role.parse().unwrap_or(GroupRole::Member)
    }
}

/// Group member joined with user display info.
#[derive(Debug, Clone, FromRow)]
pub struct MemberWithUserEntity {
    pub user_id: Uuid,
    pub email: String,
    pub full_name: String,
    pub avatar: Option<String>,
    pub role: String,
    pub joined_at: DateTime<Utc>,
}

impl From<MemberWithUserEntity> for MemberResponse {
    fn from(entity: MemberWithUserEntity) -> Self {
        let role = entity.role.parse().unwrap_or(GroupRole::Member);
        MemberResponse {
            user_id: entity.user_id,
            email: entity.email,
            full_name: entity.full_name,
            avatar: entity.avatar,
            role,
            joined_at: entity.joined_at,
        }
    }
}

/// Group row as seen from a member's listing, joined with creator info.
#[derive(Debug, Clone, FromRow)]
pub struct UserGroupEntity {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub joined_at: DateTime<Utc>,
    pub creator_name: Option<String>,
}

impl From<UserGroupEntity> for UserGroupResponse {
    fn from(entity: UserGroupEntity) -> Self {
        UserGroupResponse {
            id: entity.id,
            name: entity.name,
            description: entity.description,
            created_at: entity.created_at,
            joined_at: entity.joined_at,
            creator_name: entity.creator_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_role_parse() {
        let member = GroupMemberEntity {
            group_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            role: "moderator".to_string(),
            joined_at: Utc::now(),
        };
        assert_eq!(member.role(), GroupRole::Moderator);
    }

    #[test]
    fn test_member_role_unknown_falls_back() {
        let member = GroupMemberEntity {
            group_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            role: "banana".to_string(),
            joined_at: Utc::now(),
        };
        assert_eq!(member.role(), GroupRole::Member);
    }
}
