//! Identity provider client.
//!
//! Bearer tokens are opaque to this API; they are verified by forwarding
//! them to the provider's user-info endpoint. A successful response yields
//! the caller's identity, which is then mirrored into the local users table.

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::config::IdentityConfig;

/// Errors that can occur while verifying a token.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Token rejected by identity provider")]
    InvalidToken,

    #[error("Identity provider returned malformed user data: {0}")]
    MalformedUser(String),

    #[error("Identity provider unreachable: {0}")]
    Unreachable(String),
}

/// Verified identity of a caller.
#[derive(Debug, Clone)]
pub struct IdentityUser {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub avatar: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: ProviderUserMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct ProviderUserMetadata {
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    avatar_url: Option<String>,
}

/// Client for the external identity provider.
#[derive(Clone)]
pub struct IdentityService {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl IdentityService {
    /// Creates a new client from configuration.
    pub fn new(config: &IdentityConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
        }
    }

    /// Verifies a bearer token and returns the caller's identity.
    pub async fn verify_token(&self, token: &str) -> Result<IdentityUser, IdentityError> {
        let url = format!("{}/auth/v1/user", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .header("apikey", &self.anon_key)
            .send()
            .await
            .map_err(|e| IdentityError::Unreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(IdentityError::InvalidToken);
        }

        let user: ProviderUser = response
            .json()
            .await
            .map_err(|e| IdentityError::MalformedUser(e.to_string()))?;

        parse_provider_user(user)
    }
}

fn parse_provider_user(user: ProviderUser) -> Result<IdentityUser, IdentityError> {
    let id = Uuid::parse_str(&user.id)
        .map_err(|_| IdentityError::MalformedUser(format!("invalid user id: {}", user.id)))?;

    let email = user
        .email
        .filter(|e| !e.is_empty())
        .ok_or_else(|| IdentityError::MalformedUser("user has no email".to_string()))?;

    // Providers vary in which metadata key carries the display name
    let full_name = user
        .user_metadata
        .full_name
        .or(user.user_metadata.name)
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| email.clone());

    Ok(IdentityUser {
        id,
        email,
        full_name,
        avatar: user.user_metadata.avatar_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider_user(id: &str, email: Option<&str>) -> ProviderUser {
        ProviderUser {
            id: id.to_string(),
            email: email.map(|e| e.to_string()),
            user_metadata: ProviderUserMetadata::default(),
        }
    }

    #[test]
    fn test_parse_valid_user() {
        let mut user = provider_user("550e8400-e29b-41d4-a716-446655440000", Some("a@b.com"));
        user.user_metadata.full_name = Some("Ada Lovelace".to_string());
        user.user_metadata.avatar_url = Some("https://example.com/a.png".to_string());

        let identity = parse_provider_user(user).unwrap();
        assert_eq!(identity.email, "a@b.com");
        assert_eq!(identity.full_name, "Ada Lovelace");
        assert_eq!(identity.avatar.as_deref(), Some("https://example.com/a.png"));
    }

    #[test]
    fn test_parse_falls_back_to_name_key() {
        let mut user = provider_user("550e8400-e29b-41d4-a716-446655440000", Some("a@b.com"));
        user.user_metadata.name = Some("Ada".to_string());

        let identity = parse_provider_user(user).unwrap();
        assert_eq!(identity.full_name, "Ada");
    }

    #[test]
    fn test_parse_defaults_name_to_email() {
        let user = provider_user("550e8400-e29b-41d4-a716-446655440000", Some("a@b.com"));
        let identity = parse_provider_user(user).unwrap();
        assert_eq!(identity.full_name, "a@b.com");
    }

    #[test]
    fn test_parse_rejects_missing_email() {
        let user = provider_user("550e8400-e29b-41d4-a716-446655440000", None);
        assert!(matches!(
            parse_provider_user(user),
            Err(IdentityError::MalformedUser(_))
        ));
    }

    #[test]
    fn test_parse_rejects_invalid_id() {
        let user = provider_user("not-a-uuid", Some("a@b.com"));
        assert!(matches!(
            parse_provider_user(user),
            Err(IdentityError::MalformedUser(_))
        ));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = IdentityConfig {
            url: "https://project.supabase.co/".to_string(),
            anon_key: "key".to_string(),
            timeout_secs: 10,
        };
        let service = IdentityService::new(&config);
        assert_eq!(service.base_url, "https://project.supabase.co");
    }
}
