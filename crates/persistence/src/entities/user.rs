//! User entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::UserResponse;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the users table.
///
/// `id` is the identity provider's stable subject id, not locally generated.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserEntity> for UserResponse {
    fn from(entity: UserEntity) -> Self {
        UserResponse {
            id: entity.id,
            email: entity.email,
            full_name: entity.full_name,
            avatar: entity.avatar,
            created_at: entity.created_at,
        }
    }
}
