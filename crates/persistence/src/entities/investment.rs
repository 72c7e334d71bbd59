//! Investment entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::InvestmentResponse;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the investments table.
#[derive(Debug, Clone, FromRow)]
pub struct InvestmentEntity {
    pub id: Uuid,
    pub group_id: Uuid,
    pub ticker: String,
    pub name: String,
    pub quantity: f64,
    pub purchase_price: f64,
    pub purchase_date: DateTime<Utc>,
    pub added_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<InvestmentEntity> for InvestmentResponse {
    fn from(entity: InvestmentEntity) -> Self {
        InvestmentResponse {
            id: entity.id,
            group_id: entity.group_id,
            ticker: entity.ticker,
            name: entity.name,
            quantity: entity.quantity,
            purchase_price: entity.purchase_price,
            purchase_date: entity.purchase_date,
            added_by: entity.added_by,
            added_by_name: None,
            added_by_email: None,
            created_at: entity.created_at,
        }
    }
}

/// Investment joined with purchaser display info.
#[derive(Debug, Clone, FromRow)]
pub struct InvestmentWithUserEntity {
    pub id: Uuid,
    pub group_id: Uuid,
    pub ticker: String,
    pub name: String,
    pub quantity: f64,
    pub purchase_price: f64,
    pub purchase_date: DateTime<Utc>,
    pub added_by: Uuid,
    pub added_by_name: Option<String>,
    pub added_by_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<InvestmentWithUserEntity> for InvestmentResponse {
    fn from(entity: InvestmentWithUserEntity) -> Self {
        InvestmentResponse {
            id: entity.id,
            group_id: entity.group_id,
            ticker: entity.ticker,
            name: entity.name,
            quantity: entity.quantity,
            purchase_price: entity.purchase_price,
            purchase_date: entity.purchase_date,
            added_by: entity.added_by,
            added_by_name: entity.added_by_name,
            added_by_email: entity.added_by_email,
            created_at: entity.created_at,
        }
    }
}
