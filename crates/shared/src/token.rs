//! Invite token generation.

use rand::Rng;

/// Length of generated invite tokens.
pub const INVITE_TOKEN_LENGTH: usize = 32;

/// Generate a secure group invite token.
///
/// Uses URL-safe characters, avoiding confusing ones (0, O, 1, l, I).
pub fn generate_invite_token() -> String {
    const CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghjkmnpqrstuvwxyz23456789";
    let mut rng = rand::thread_rng();

    (0..INVITE_TOKEN_LENGTH)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_invite_token_length() {
        let token = generate_invite_token();
        assert_eq!(token.len(), INVITE_TOKEN_LENGTH);
    }

    #[test]
    fn test_generate_invite_token_unique() {
        let token1 = generate_invite_token();
        let token2 = generate_invite_token();
        assert_ne!(token1, token2);
    }

    #[test]
    fn test_generate_invite_token_charset() {
        let token = generate_invite_token();
        // Should not contain confusing characters
        assert!(!token.contains('0'));
        assert!(!token.contains('O'));
        assert!(!token.contains('1'));
        assert!(!token.contains('l'));
        assert!(!token.contains('I'));
    }

    #[test]
    fn test_generate_invite_token_url_safe() {
        let token = generate_invite_token();
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
