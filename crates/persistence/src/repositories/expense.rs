//! Repository for expense database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{ExpenseEntity, ExpenseWithPayerEntity};
use crate::metrics::QueryTimer;

/// Repository for expense-related database operations.
#[derive(Clone)]
pub struct ExpenseRepository {
    pool: PgPool,
}

impl ExpenseRepository {
    /// Creates a new ExpenseRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Records a new expense.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        group_id: Uuid,
        title: &str,
        amount: f64,
        description: Option<&str>,
        category: Option<&str>,
        paid_by: Uuid,
        expense_date: DateTime<Utc>,
    ) -> Result<ExpenseEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_expense");
        let result = sqlx::query_as::<_, ExpenseEntity>(
            r#"
            INSERT INTO expenses
                (group_id, title, amount, description, category, paid_by, expense_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, group_id, title, amount, description, category,
                      paid_by, expense_date, created_at, updated_at
            "#,
        )
        .bind(group_id)
        .bind(title)
        .bind(amount)
        .bind(description)
        .bind(category)
        .bind(paid_by)
        .bind(expense_date)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find an expense by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ExpenseEntity>, sqlx::Error> {
        sqlx::query_as::<_, ExpenseEntity>(
            r#"
            SELECT id, group_id, title, amount, description, category,
                   paid_by, expense_date, created_at, updated_at
            FROM expenses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Lists a group's expenses with payer display info, newest first.
    pub async fn list_by_group(
        &self,
        group_id: Uuid,
    ) -> Result<Vec<ExpenseWithPayerEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_group_expenses");
        let result = sqlx::query_as::<_, ExpenseWithPayerEntity>(
            r#"
            SELECT e.id, e.group_id, e.title, e.amount, e.description, e.category,
                   e.paid_by, e.expense_date, e.created_at, e.updated_at,
                   u.full_name AS paid_by_name,
                   u.email AS paid_by_email
            FROM expenses e
            LEFT JOIN users u ON e.paid_by = u.id
            WHERE e.group_id = $1
            ORDER BY e.expense_date DESC, e.created_at DESC
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Applies a typed partial update to an expense.
    pub async fn update(
        &self,
        id: Uuid,
        title: Option<&str>,
        amount: Option<f64>,
        description: Option<&str>,
        category: Option<&str>,
        expense_date: Option<DateTime<Utc>>,
    ) -> Result<Option<ExpenseEntity>, sqlx::Error> {
        sqlx::query_as::<_, ExpenseEntity>(
            r#"
            UPDATE expenses
            SET title = COALESCE($2, title),
                amount = COALESCE($3, amount),
                description = COALESCE($4, description),
                category = COALESCE($5, category),
                expense_date = COALESCE($6, expense_date),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, group_id, title, amount, description, category,
                      paid_by, expense_date, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(amount)
        .bind(description)
        .bind(category)
        .bind(expense_date)
        .fetch_optional(&self.pool)
        .await
    }

    /// Deletes an expense. Returns true if a row was removed.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
