//! Expense ledger domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request to record a shared expense.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateExpenseRequest {
    pub group_id: Uuid,

    #[validate(custom(function = "shared::validation::validate_title"))]
    pub title: String,

    #[validate(custom(function = "shared::validation::validate_amount"))]
    pub amount: f64,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    #[validate(length(max = 100, message = "Category must be at most 100 characters"))]
    pub category: Option<String>,

    pub paid_by: Uuid,

    pub expense_date: Option<DateTime<Utc>>,
}

/// Typed partial update for an expense.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateExpenseRequest {
    #[validate(custom(function = "shared::validation::validate_title"))]
    pub title: Option<String>,

    #[validate(custom(function = "shared::validation::validate_amount"))]
    pub amount: Option<f64>,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    #[validate(length(max = 100, message = "Category must be at most 100 characters"))]
    pub category: Option<String>,

    pub expense_date: Option<DateTime<Utc>>,
}

impl UpdateExpenseRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.amount.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.expense_date.is_none()
    }
}

/// Expense with payer display info.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ExpenseResponse {
    pub id: Uuid,
    pub group_id: Uuid,
    pub title: String,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub paid_by: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_by_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_by_email: Option<String>,
    pub expense_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to categorize free-text expense data with the AI collaborator.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct ClassifyExpenseRequest {
    #[validate(length(min = 1, max = 5000, message = "Invalid data for classification"))]
    pub data: String,
}

/// Category label (and optional amount/name) extracted from free text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ClassificationResult {
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Request to extract expense text from a base64-encoded receipt image.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct OcrExpenseRequest {
    #[validate(length(min = 1, message = "Invalid image data"))]
    pub image: String,
}

/// Text extracted from a receipt image.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OcrExpenseResult {
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreateExpenseRequest {
        CreateExpenseRequest {
            group_id: Uuid::new_v4(),
            title: "Groceries".to_string(),
            amount: 42.50,
            description: None,
            category: Some("food".to_string()),
            paid_by: Uuid::new_v4(),
            expense_date: None,
        }
    }

    #[test]
    fn test_create_expense_valid() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_create_expense_zero_amount_rejected() {
        let mut req = valid_request();
        req.amount = 0.0;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_expense_blank_title_rejected() {
        let mut req = valid_request();
        req.title = "  ".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_expense_is_empty() {
        let req = UpdateExpenseRequest {
            title: None,
            amount: None,
            description: None,
            category: None,
            expense_date: None,
        };
        assert!(req.is_empty());
    }

    #[test]
    fn test_update_expense_negative_amount_rejected() {
        let req = UpdateExpenseRequest {
            title: None,
            amount: Some(-1.0),
            description: None,
            category: None,
            expense_date: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_classify_request_empty_rejected() {
        let req = ClassifyExpenseRequest {
            data: String::new(),
        };
        assert!(req.validate().is_err());
    }
}
