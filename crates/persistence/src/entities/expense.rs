//! Expense entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::ExpenseResponse;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the expenses table.
#[derive(Debug, Clone, FromRow)]
pub struct ExpenseEntity {
    pub id: Uuid,
    pub group_id: Uuid,
    pub title: String,
    pub amount: f64,
    pub description: Option<String>,
    pub category: Option<String>,
    pub paid_by: Uuid,
    pub expense_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ExpenseEntity> for ExpenseResponse {
    fn from(entity: ExpenseEntity) -> Self {
        ExpenseResponse {
            id: entity.id,
            group_id: entity.group_id,
            title: entity.title,
            amount: entity.amount,
            description: entity.description,
            category: entity.category,
            paid_by: entity.paid_by,
            paid_by_name: None,
            paid_by_email: None,
            expense_date: entity.expense_date,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Expense joined with payer display info.
#[derive(Debug, Clone, FromRow)]
pub struct ExpenseWithPayerEntity {
    pub id: Uuid,
    pub group_id: Uuid,
    pub title: String,
    pub amount: f64,
    pub description: Option<String>,
    pub category: Option<String>,
    pub paid_by: Uuid,
    pub paid_by_name: Option<String>,
    pub paid_by_email: Option<String>,
    pub expense_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ExpenseWithPayerEntity> for ExpenseResponse {
    fn from(entity: ExpenseWithPayerEntity) -> Self {
        ExpenseResponse {
            id: entity.id,
            group_id: entity.group_id,
            title: entity.title,
            amount: entity.amount,
            description: entity.description,
            category: entity.category,
            paid_by: entity.paid_by,
            paid_by_name: entity.paid_by_name,
            paid_by_email: entity.paid_by_email,
            expense_date: entity.expense_date,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
