//! Repository for income database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{IncomeEntity, IncomeWithUserEntity};

/// Repository for income-related database operations.
#[derive(Clone)]
pub struct IncomeRepository {
    pool: PgPool,
}

impl IncomeRepository {
    /// Creates a new IncomeRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Records a new income entry.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        group_id: Uuid,
        user_id: Uuid,
        title: &str,
        amount: f64,
        category: Option<&str>,
        description: Option<&str>,
        income_date: DateTime<Utc>,
    ) -> Result<IncomeEntity, sqlx::Error> {
        sqlx::query_as::<_, IncomeEntity>(
            r#"
            INSERT INTO income
                (group_id, user_id, title, amount, category, description, income_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, group_id, user_id, title, amount, category,
                      description, income_date, created_at, updated_at
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .bind(title)
        .bind(amount)
        .bind(category)
        .bind(description)
        .bind(income_date)
        .fetch_one(&self.pool)
        .await
    }

    /// Find an income entry by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<IncomeEntity>, sqlx::Error> {
        sqlx::query_as::<_, IncomeEntity>(
            r#"
            SELECT id, group_id, user_id, title, amount, category,
                   description, income_date, created_at, updated_at
            FROM income
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Lists a group's income entries with earner display info, newest first.
    pub async fn list_by_group(
        &self,
        group_id: Uuid,
    ) -> Result<Vec<IncomeWithUserEntity>, sqlx::Error> {
        sqlx::query_as::<_, IncomeWithUserEntity>(
            r#"
            SELECT i.id, i.group_id, i.user_id, i.title, i.amount, i.category,
                   i.description, i.income_date, i.created_at, i.updated_at,
                   u.full_name AS received_by_name,
                   u.email AS received_by_email
            FROM income i
            LEFT JOIN users u ON i.user_id = u.id
            WHERE i.group_id = $1
            ORDER BY i.income_date DESC, i.created_at DESC
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Applies a typed partial update to an income entry.
    pub async fn update(
        &self,
        id: Uuid,
        title: Option<&str>,
        amount: Option<f64>,
        category: Option<&str>,
        description: Option<&str>,
        income_date: Option<DateTime<Utc>>,
    ) -> Result<Option<IncomeEntity>, sqlx::Error> {
        sqlx::query_as::<_, IncomeEntity>(
            r#"
            UPDATE income
            SET title = COALESCE($2, title),
                amount = COALESCE($3, amount),
                category = COALESCE($4, category),
                description = COALESCE($5, description),
                income_date = COALESCE($6, income_date),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, group_id, user_id, title, amount, category,
                      description, income_date, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(amount)
        .bind(category)
        .bind(description)
        .bind(income_date)
        .fetch_optional(&self.pool)
        .await
    }

    /// Deletes an income entry. Returns true if a row was removed.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM income WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
