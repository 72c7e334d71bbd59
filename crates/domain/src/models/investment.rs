//! Investment ledger domain models.

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

lazy_static! {
    /// Ticker symbols: 1-10 uppercase letters, dots and dashes (e.g. BRK.B).
    static ref TICKER_RE: Regex = Regex::new(r"^[A-Z][A-Z.\-]{0,9}$").unwrap();
}

/// Validates a stock ticker symbol.
pub fn validate_ticker(ticker: &str) -> Result<(), ValidationError> {
    if TICKER_RE.is_match(ticker) {
        Ok(())
    } else {
        let mut err = ValidationError::new("ticker_format");
        err.message = Some("Invalid ticker symbol".into());
        Err(err)
    }
}

/// Request to record an investment purchase.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateInvestmentRequest {
    pub group_id: Uuid,

    #[validate(custom(function = "validate_ticker"))]
    pub ticker: String,

    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(custom(function = "shared::validation::validate_quantity"))]
    pub quantity: f64,

    #[validate(custom(function = "shared::validation::validate_amount"))]
    pub purchase_price: f64,

    pub purchase_date: DateTime<Utc>,
}

/// Investment with purchaser display info.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct InvestmentResponse {
    pub id: Uuid,
    pub group_id: Uuid,
    pub ticker: String,
    pub name: String,
    pub quantity: f64,
    pub purchase_price: f64,
    pub purchase_date: DateTime<Utc>,
    pub added_by: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_by_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_by_email: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_ticker_ok() {
        assert!(validate_ticker("AAPL").is_ok());
        assert!(validate_ticker("BRK.B").is_ok());
        assert!(validate_ticker("NOKIA-X").is_ok());
    }

    #[test]
    fn test_validate_ticker_rejected() {
        assert!(validate_ticker("").is_err());
        assert!(validate_ticker("aapl").is_err());
        assert!(validate_ticker("TOO_LONG_TICKER").is_err());
        assert!(validate_ticker(".AAPL").is_err());
    }

    #[test]
    fn test_create_investment_valid() {
        let req = CreateInvestmentRequest {
            group_id: Uuid::new_v4(),
            ticker: "AAPL".to_string(),
            name: "Apple Inc.".to_string(),
            quantity: 3.0,
            purchase_price: 190.12,
            purchase_date: Utc::now(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_investment_zero_quantity_rejected() {
        let req = CreateInvestmentRequest {
            group_id: Uuid::new_v4(),
            ticker: "AAPL".to_string(),
            name: "Apple Inc.".to_string(),
            quantity: 0.0,
            purchase_price: 190.12,
            purchase_date: Utc::now(),
        };
        assert!(req.validate().is_err());
    }
}
