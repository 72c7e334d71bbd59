//! User domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// User as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Typed partial update for a user profile.
///
/// Only the fields listed here can be changed through the API; everything
/// else on the row is owned by the identity provider sync.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub full_name: Option<String>,

    #[validate(length(max = 1024, message = "Avatar URL too long"))]
    pub avatar: Option<String>,
}

impl UpdateUserRequest {
    /// True when no updatable field is present.
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.avatar.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_user_request_valid() {
        let req = UpdateUserRequest {
            full_name: Some("Ada Lovelace".to_string()),
            avatar: None,
        };
        assert!(req.validate().is_ok());
        assert!(!req.is_empty());
    }

    #[test]
    fn test_update_user_request_empty_name_rejected() {
        let req = UpdateUserRequest {
            full_name: Some(String::new()),
            avatar: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_user_request_is_empty() {
        let req = UpdateUserRequest {
            full_name: None,
            avatar: None,
        };
        assert!(req.is_empty());
    }
}
