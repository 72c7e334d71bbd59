//! Income ledger domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Category of an income entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncomeCategory {
    Salary,
    Freelance,
    Investments,
    Business,
    Gifts,
    Other,
}

impl IncomeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncomeCategory::Salary => "salary",
            IncomeCategory::Freelance => "freelance",
            IncomeCategory::Investments => "investments",
            IncomeCategory::Business => "business",
            IncomeCategory::Gifts => "gifts",
            IncomeCategory::Other => "other",
        }
    }
}

impl fmt::Display for IncomeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IncomeCategory {
    type Err = InvalidIncomeCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "salary" => Ok(IncomeCategory::Salary),
            "freelance" => Ok(IncomeCategory::Freelance),
            "investments" => Ok(IncomeCategory::Investments),
            "business" => Ok(IncomeCategory::Business),
            "gifts" => Ok(IncomeCategory::Gifts),
            "other" => Ok(IncomeCategory::Other),
            other => Err(InvalidIncomeCategory(other.to_string())),
        }
    }
}

/// Error returned when a category string is not recognized.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Invalid income category: {0}")]
pub struct InvalidIncomeCategory(pub String);

/// Request to record an income entry.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateIncomeRequest {
    pub group_id: Uuid,

    #[validate(custom(function = "shared::validation::validate_title"))]
    pub title: String,

    #[validate(custom(function = "shared::validation::validate_amount"))]
    pub amount: f64,

    pub category: Option<IncomeCategory>,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    pub income_date: Option<DateTime<Utc>>,
}

/// Typed partial update for an income entry.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateIncomeRequest {
    #[validate(custom(function = "shared::validation::validate_title"))]
    pub title: Option<String>,

    #[validate(custom(function = "shared::validation::validate_amount"))]
    pub amount: Option<f64>,

    pub category: Option<IncomeCategory>,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    pub income_date: Option<DateTime<Utc>>,
}

impl UpdateIncomeRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.amount.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.income_date.is_none()
    }
}

/// Income entry with recipient display info.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct IncomeResponse {
    pub id: Uuid,
    pub group_id: Uuid,
    pub title: String,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<IncomeCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub user_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received_by_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received_by_email: Option<String>,
    pub income_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trip() {
        for cat in [
            IncomeCategory::Salary,
            IncomeCategory::Freelance,
            IncomeCategory::Investments,
            IncomeCategory::Business,
            IncomeCategory::Gifts,
            IncomeCategory::Other,
        ] {
            assert_eq!(cat.as_str().parse::<IncomeCategory>().unwrap(), cat);
        }
    }

    #[test]
    fn test_category_parse_invalid() {
        assert!("lottery".parse::<IncomeCategory>().is_err());
    }

    #[test]
    fn test_create_income_missing_title_rejected() {
        let req = CreateIncomeRequest {
            group_id: Uuid::new_v4(),
            title: String::new(),
            amount: 100.0,
            category: None,
            description: None,
            income_date: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_income_valid() {
        let req = CreateIncomeRequest {
            group_id: Uuid::new_v4(),
            title: "August salary".to_string(),
            amount: 3200.0,
            category: Some(IncomeCategory::Salary),
            description: None,
            income_date: None,
        };
        assert!(req.validate().is_ok());
    }
}
