//! Common validation utilities.

use validator::ValidationError;

/// Maximum length of a group name.
pub const MAX_GROUP_NAME_LENGTH: usize = 255;

/// Validates that a name is non-blank after trimming and at most 255 chars.
pub fn validate_group_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        let mut err = ValidationError::new("name_blank");
        err.message = Some("Group name is required".into());
        return Err(err);
    }
    if name.len() > MAX_GROUP_NAME_LENGTH {
        let mut err = ValidationError::new("name_too_long");
        err.message = Some("Group name too long".into());
        return Err(err);
    }
    Ok(())
}

/// Validates that a ledger entry title is non-blank after trimming.
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        let mut err = ValidationError::new("title_blank");
        err.message = Some("Title is required".into());
        return Err(err);
    }
    Ok(())
}

/// Validates that a monetary amount is strictly positive.
pub fn validate_amount(amount: f64) -> Result<(), ValidationError> {
    if amount > 0.0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("amount_range");
        err.message = Some("Amount must be greater than zero".into());
        Err(err)
    }
}

/// Validates that a quantity is strictly positive.
pub fn validate_quantity(quantity: f64) -> Result<(), ValidationError> {
    if quantity > 0.0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("quantity_range");
        err.message = Some("Quantity must be greater than zero".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_group_name_ok() {
        assert!(validate_group_name("Trip to Lapland").is_ok());
    }

    #[test]
    fn test_validate_group_name_blank() {
        assert!(validate_group_name("").is_err());
        assert!(validate_group_name("   ").is_err());
    }

    #[test]
    fn test_validate_group_name_too_long() {
        let name = "x".repeat(MAX_GROUP_NAME_LENGTH + 1);
        assert!(validate_group_name(&name).is_err());
    }

    #[test]
    fn test_validate_group_name_at_limit() {
        let name = "x".repeat(MAX_GROUP_NAME_LENGTH);
        assert!(validate_group_name(&name).is_ok());
    }

    #[test]
    fn test_validate_title() {
        assert!(validate_title("Groceries").is_ok());
        assert!(validate_title(" \t").is_err());
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount(0.01).is_ok());
        assert!(validate_amount(0.0).is_err());
        assert!(validate_amount(-5.0).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(2.5).is_ok());
        assert!(validate_quantity(0.0).is_err());
    }
}
