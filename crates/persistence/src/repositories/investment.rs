//! Repository for investment database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{InvestmentEntity, InvestmentWithUserEntity};

/// Repository for investment-related database operations.
#[derive(Clone)]
pub struct InvestmentRepository {
    pool: PgPool,
}

impl InvestmentRepository {
    /// Creates a new InvestmentRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Records a new investment position.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        group_id: Uuid,
        ticker: &str,
        name: &str,
        quantity: f64,
        purchase_price: f64,
        purchase_date: DateTime<Utc>,
        added_by: Uuid,
    ) -> Result<InvestmentEntity, sqlx::Error> {
        sqlx::query_as::<_, InvestmentEntity>(
            r#"
            INSERT INTO investments
                (group_id, ticker, name, quantity, purchase_price, purchase_date, added_by)
            VALUES ($1, UPPER($2), $3, $4, $5, $6, $7)
            RETURNING id, group_id, ticker, name, quantity, purchase_price,
                      purchase_date, added_by, created_at, updated_at
            "#,
        )
        .bind(group_id)
        .bind(ticker)
        .bind(name)
        .bind(quantity)
        .bind(purchase_price)
        .bind(purchase_date)
        .bind(added_by)
        .fetch_one(&self.pool)
        .await
    }

    /// Find a position by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<InvestmentEntity>, sqlx::Error> {
        sqlx::query_as::<_, InvestmentEntity>(
            r#"
            SELECT id, group_id, ticker, name, quantity, purchase_price,
                   purchase_date, added_by, created_at, updated_at
            FROM investments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Lists a group's positions with contributor display info, newest first.
    pub async fn list_by_group(
        &self,
        group_id: Uuid,
    ) -> Result<Vec<InvestmentWithUserEntity>, sqlx::Error> {
        sqlx::query_as::<_, InvestmentWithUserEntity>(
            r#"
            SELECT iv.id, iv.group_id, iv.ticker, iv.name, iv.quantity,
                   iv.purchase_price, iv.purchase_date, iv.added_by,
                   iv.created_at, iv.updated_at,
                   u.full_name AS added_by_name,
                   u.email AS added_by_email
            FROM investments iv
            LEFT JOIN users u ON iv.added_by = u.id
            WHERE iv.group_id = $1
            ORDER BY iv.purchase_date DESC, iv.created_at DESC
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Deletes a position. Returns true if a row was removed.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM investments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
