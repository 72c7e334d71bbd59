//! Authentication domain models.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::UserResponse;

/// Request body for `POST /api/auth/validate`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct ValidateTokenRequest {
    #[validate(length(min = 1, message = "No token provided"))]
    pub token: String,
}

/// Payload returned after a successful token validation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct LoginData {
    pub user: UserResponse,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_token_request_empty_rejected() {
        let req = ValidateTokenRequest {
            token: String::new(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_validate_token_request_ok() {
        let req = ValidateTokenRequest {
            token: "opaque-provider-token".to_string(),
        };
        assert!(req.validate().is_ok());
    }
}
