//! Income entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::{IncomeCategory, IncomeResponse};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the income table.
#[derive(Debug, Clone, FromRow)]
pub struct IncomeEntity {
    pub id: Uuid,
    pub group_id: Uuid,
    pub title: String,
    pub amount: f64,
    pub category: Option<String>,
    pub description: Option<String>,
    pub user_id: Uuid,
    pub income_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl IncomeEntity {
    pub fn category(&self) -> Option<IncomeCategory> {
        self.category.as_deref().and_then(|c| c.parse().ok())
    }
}

impl From<IncomeEntity> for IncomeResponse {
    fn from(entity: IncomeEntity) -> Self {
        let category = entity.category();
        IncomeResponse {
            id: entity.id,
            group_id: entity.group_id,
            title: entity.title,
            amount: entity.amount,
            category,
            description: entity.description,
            user_id: entity.user_id,
            received_by_name: None,
            received_by_email: None,
            income_date: entity.income_date,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Income entry joined with recipient display info.
#[derive(Debug, Clone, FromRow)]
pub struct IncomeWithUserEntity {
    pub id: Uuid,
    pub group_id: Uuid,
    pub title: String,
    pub amount: f64,
    pub category: Option<String>,
    pub description: Option<String>,
    pub user_id: Uuid,
    pub received_by_name: Option<String>,
    pub received_by_email: Option<String>,
    pub income_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<IncomeWithUserEntity> for IncomeResponse {
    fn from(entity: IncomeWithUserEntity) -> Self {
        let category = entity.category.as_deref().and_then(|c| c.parse().ok());
        IncomeResponse {
            id: entity.id,
            group_id: entity.group_id,
            title: entity.title,
            amount: entity.amount,
            category,
            description: entity.description,
            user_id: entity.user_id,
            received_by_name: entity.received_by_name,
            received_by_email: entity.received_by_email,
            income_date: entity.income_date,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
