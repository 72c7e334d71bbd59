//! Repository for group and membership database operations.

use domain::models::GroupRole;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{GroupEntity, GroupMemberEntity, MemberWithUserEntity, UserGroupEntity};
use crate::metrics::QueryTimer;

/// Repository for group-related database operations.
#[derive(Clone)]
pub struct GroupRepository {
    pool: PgPool,
}

impl GroupRepository {
    /// Creates a new GroupRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new group and add the creator as admin.
    pub async fn create_group(
        &self,
        name: &str,
        description: Option<&str>,
        created_by: Uuid,
    ) -> Result<GroupEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_group");

        // Group row and creator membership must land together
        let mut tx = self.pool.begin().await?;

        let group = sqlx::query_as::<_, GroupEntity>(
            r#"
            INSERT INTO groups (name, description, created_by)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, created_by, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(created_by)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO group_members (group_id, user_id, role)
            VALUES ($1, $2, 'admin')
            "#,
        )
        .bind(group.id)
        .bind(created_by)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(group)
    }

    /// Find a group by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<GroupEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_group_by_id");
        let result = sqlx::query_as::<_, GroupEntity>(
            r#"
            SELECT id, name, description, created_by, created_at, updated_at
            FROM groups
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List all groups, newest first.
    pub async fn list_all(&self) -> Result<Vec<GroupEntity>, sqlx::Error> {
        sqlx::query_as::<_, GroupEntity>(
            r#"
            SELECT id, name, description, created_by, created_at, updated_at
            FROM groups
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Applies a typed partial update (name/description) to a group.
    pub async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<Option<GroupEntity>, sqlx::Error> {
        sqlx::query_as::<_, GroupEntity>(
            r#"
            UPDATE groups
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, created_by, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .fetch_optional(&self.pool)
        .await
    }

    /// Deletes a group. Memberships, invites and ledger rows cascade.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM groups WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Adds a member.
    ///
    /// Returns `None` when the user is already a member (the primary key on
    /// `(group_id, user_id)` resolves the race).
    pub async fn add_member(
        &self,
        group_id: Uuid,
        user_id: Uuid,
        role: GroupRole,
    ) -> Result<Option<GroupMemberEntity>, sqlx::Error> {
        sqlx::query_as::<_, GroupMemberEntity>(
            r#"
            INSERT INTO group_members (group_id, user_id, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (group_id, user_id) DO NOTHING
            RETURNING group_id, user_id, role, joined_at
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .bind(role.as_str())
        .fetch_optional(&self.pool)
        .await
    }

    /// Removes a member.
    ///
    /// Returns true if a membership row was deleted.
    pub async fn remove_member(&self, group_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM group_members
            WHERE group_id = $1 AND user_id = $2
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Returns a member's role, or `None` when not a member.
    pub async fn member_role(
        &self,
        group_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<GroupRole>, sqlx::Error> {
        let row: Option<(String,)> = sqlx::query_as(
            r#"
            SELECT role FROM group_members
            WHERE group_id = $1 AND user_id = $2
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(role,)| role.parse().unwrap_or(GroupRole::Member)))
    }

    /// Checks whether a user is a member of a group.
    pub async fn is_member(&self, group_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let row: Option<(i32,)> = sqlx::query_as(
            r#"
            SELECT 1 FROM group_members
            WHERE group_id = $1 AND user_id = $2
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.is_some())
    }

    /// Lists group members with user display info, oldest join first.
    pub async fn list_members(
        &self,
        group_id: Uuid,
    ) -> Result<Vec<MemberWithUserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_group_members");
        let result = sqlx::query_as::<_, MemberWithUserEntity>(
            r#"
            SELECT u.id AS user_id, u.email, u.full_name, u.avatar,
                   gm.role, gm.joined_at
            FROM group_members gm
            JOIN users u ON gm.user_id = u.id
            WHERE gm.group_id = $1
            ORDER BY gm.joined_at
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Lists the groups a user belongs to, most recently joined first.
    pub async fn list_user_groups(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<UserGroupEntity>, sqlx::Error> {
        sqlx::query_as::<_, UserGroupEntity>(
            r#"
            SELECT g.id, g.name, g.description, g.created_at,
                   gm.joined_at,
                   creator.full_name AS creator_name
            FROM group_members gm
            JOIN groups g ON gm.group_id = g.id
            LEFT JOIN users creator ON g.created_by = creator.id
            WHERE gm.user_id = $1
            ORDER BY gm.joined_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Changes a member's role.
    ///
    /// Returns `None` when the target is not a member.
    pub async fn update_member_role(
        &self,
        group_id: Uuid,
        user_id: Uuid,
        role: GroupRole,
    ) -> Result<Option<GroupMemberEntity>, sqlx::Error> {
        sqlx::query_as::<_, GroupMemberEntity>(
            r#"
            UPDATE group_members
            SET role = $3
            WHERE group_id = $1 AND user_id = $2
            RETURNING group_id, user_id, role, joined_at
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .bind(role.as_str())
        .fetch_optional(&self.pool)
        .await
    }
}
