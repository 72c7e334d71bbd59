//! Repository for user database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::UserEntity;

/// Repository for user operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts or refreshes a user row from an identity provider profile.
    ///
    /// The row is keyed by the provider's stable subject id; a repeat
    /// verification refreshes email and profile fields.
    pub async fn upsert_from_identity(
        &self,
        id: Uuid,
        email: &str,
        full_name: &str,
        avatar: Option<&str>,
    ) -> Result<UserEntity, sqlx::Error> {
        sqlx::query_as::<_, UserEntity>(
            r#"
            INSERT INTO users (id, email, full_name, avatar)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
            SET email = EXCLUDED.email,
                full_name = CASE
                    WHEN EXCLUDED.full_name <> '' THEN EXCLUDED.full_name
                    ELSE users.full_name
                END,
                avatar = COALESCE(EXCLUDED.avatar, users.avatar),
                updated_at = NOW()
            RETURNING id, email, full_name, avatar, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(email)
        .bind(full_name)
        .bind(avatar)
        .fetch_one(&self.pool)
        .await
    }

    /// Finds a user by id.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserEntity>, sqlx::Error> {
        sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, email, full_name, avatar, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Finds a user by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, sqlx::Error> {
        sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, email, full_name, avatar, created_at, updated_at
            FROM users
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    /// Lists all users, newest first.
    pub async fn list_all(&self) -> Result<Vec<UserEntity>, sqlx::Error> {
        sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, email, full_name, avatar, created_at, updated_at
            FROM users
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Applies a typed partial update to a user profile.
    ///
    /// Only the enumerated columns can change; absent fields keep their
    /// current value.
    pub async fn update_profile(
        &self,
        id: Uuid,
        full_name: Option<&str>,
        avatar: Option<&str>,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        sqlx::query_as::<_, UserEntity>(
            r#"
            UPDATE users
            SET full_name = COALESCE($2, full_name),
                avatar = COALESCE($3, avatar),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, full_name, avatar, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(full_name)
        .bind(avatar)
        .fetch_optional(&self.pool)
        .await
    }

    /// Deletes a user row.
    ///
    /// Returns true if a row was deleted.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
