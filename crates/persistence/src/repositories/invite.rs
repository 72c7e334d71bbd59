//! Repository for group invitation database operations.
//!
//! Acceptance uses a conditional UPDATE so that concurrent accepts of the
//! same token resolve to exactly one winner.

use chrono::{DateTime, Duration, Utc};
use domain::models::INVITE_EXPIRY_DAYS;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{GroupInviteEntity, InviteWithDetailsEntity};
use crate::metrics::QueryTimer;

/// Default expiry for a freshly issued invite.
pub fn default_invite_expiration() -> DateTime<Utc> {
    Utc::now() + Duration::days(INVITE_EXPIRY_DAYS)
}

/// Result of an acceptance attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptOutcome {
    /// The invite was consumed and the user is now a member.
    Accepted { group_id: Uuid },
    /// The token does not reference a live pending invite (unknown,
    /// already resolved, or expired).
    NotPending,
    /// The invite was live but the user already belongs to the group.
    AlreadyMember { group_id: Uuid },
}

/// Repository for invite-related database operations.
#[derive(Clone)]
pub struct InviteRepository {
    pool: PgPool,
}

impl InviteRepository {
    /// Creates a new InviteRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Issues a new invite.
    ///
    /// Stale pending invites for the same address are cleared first so the
    /// partial unique index only guards against live duplicates. A unique
    /// violation surfaces to the caller as `sqlx::Error::Database` with
    /// PG code 23505.
    pub async fn create(
        &self,
        group_id: Uuid,
        inviter_id: Uuid,
        invitee_email: &str,
        invitee_id: Option<Uuid>,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<GroupInviteEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_invite");
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            DELETE FROM group_invites
            WHERE group_id = $1
              AND LOWER(invitee_email) = LOWER($2)
              AND status = 'pending'
              AND expires_at <= NOW()
            "#,
        )
        .bind(group_id)
        .bind(invitee_email)
        .execute(&mut *tx)
        .await?;

        let invite = sqlx::query_as::<_, GroupInviteEntity>(
            r#"
            INSERT INTO group_invites
                (group_id, inviter_id, invitee_email, invitee_id, token, expires_at)
            VALUES ($1, $2, LOWER($3), $4, $5, $6)
            RETURNING id, group_id, inviter_id, invitee_email, invitee_id,
                      status, token, expires_at, created_at, updated_at
            "#,
        )
        .bind(group_id)
        .bind(inviter_id)
        .bind(invitee_email)
        .bind(invitee_id)
        .bind(token)
        .bind(expires_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(invite)
    }

    /// Looks up an invite by token with group and inviter details attached.
    pub async fn find_by_token(
        &self,
        token: &str,
    ) -> Result<Option<InviteWithDetailsEntity>, sqlx::Error> {
        sqlx::query_as::<_, InviteWithDetailsEntity>(
            r#"
            SELECT i.id, i.group_id, i.inviter_id, i.invitee_email, i.invitee_id,
                   i.status, i.token, i.expires_at, i.created_at, i.updated_at,
                   g.name AS group_name,
                   u.full_name AS inviter_name,
                   u.email AS inviter_email
            FROM group_invites i
            JOIN groups g ON i.group_id = g.id
            JOIN users u ON i.inviter_id = u.id
            WHERE i.token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
    }

    /// Checks whether a live pending invite exists for this address.
    pub async fn has_pending(
        &self,
        group_id: Uuid,
        invitee_email: &str,
    ) -> Result<bool, sqlx::Error> {
        let row: Option<(i32,)> = sqlx::query_as(
            r#"
            SELECT 1 FROM group_invites
            WHERE group_id = $1
              AND LOWER(invitee_email) = LOWER($2)
              AND status = 'pending'
              AND expires_at > NOW()
            "#,
        )
        .bind(group_id)
        .bind(invitee_email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.is_some())
    }

    /// Lists live pending invites addressed to a user, newest first.
    ///
    /// Matches by recipient id when linked, otherwise by email.
    pub async fn list_pending_for_user(
        &self,
        user_id: Uuid,
        email: &str,
    ) -> Result<Vec<InviteWithDetailsEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_pending_invites");
        let result = sqlx::query_as::<_, InviteWithDetailsEntity>(
            r#"
            SELECT i.id, i.group_id, i.inviter_id, i.invitee_email, i.invitee_id,
                   i.status, i.token, i.expires_at, i.created_at, i.updated_at,
                   g.name AS group_name,
                   u.full_name AS inviter_name,
                   u.email AS inviter_email
            FROM group_invites i
            JOIN groups g ON i.group_id = g.id
            JOIN users u ON i.inviter_id = u.id
            WHERE i.status = 'pending'
              AND i.expires_at > NOW()
              AND (i.invitee_id = $1 OR LOWER(i.invitee_email) = LOWER($2))
            ORDER BY i.created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(email)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Accepts an invite and joins the group in one transaction.
    ///
    /// The conditional UPDATE consumes the token only while it is pending
    /// and unexpired; losing racers observe zero rows and get `NotPending`.
    pub async fn accept(&self, token: &str, user_id: Uuid) -> Result<AcceptOutcome, sqlx::Error> {
        let timer = QueryTimer::new("accept_invite");
        let mut tx = self.pool.begin().await?;

        let row: Option<(Uuid,)> = sqlx::query_as(
            r#"
            UPDATE group_invites
            SET status = 'accepted', invitee_id = $2, updated_at = NOW()
            WHERE token = $1
              AND status = 'pending'
              AND expires_at > NOW()
            RETURNING group_id
            "#,
        )
        .bind(token)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((group_id,)) = row else {
            tx.rollback().await?;
            return Ok(AcceptOutcome::NotPending);
        };

        let inserted = sqlx::query(
            r#"
            INSERT INTO group_members (group_id, user_id, role)
            VALUES ($1, $2, 'member')
            ON CONFLICT (group_id, user_id) DO NOTHING
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        if inserted.rows_affected() == 0 {
            // Leave the invite pending so the state stays consistent
            tx.rollback().await?;
            timer.record();
            return Ok(AcceptOutcome::AlreadyMember { group_id });
        }

        tx.commit().await?;
        timer.record();
        Ok(AcceptOutcome::Accepted { group_id })
    }

    /// Declines an invite.
    ///
    /// Returns true when a live pending invite was consumed.
    pub async fn decline(&self, token: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE group_invites
            SET status = 'declined', updated_at = NOW()
            WHERE token = $1
              AND status = 'pending'
              AND expires_at > NOW()
            "#,
        )
        .bind(token)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_expiration_is_seven_days_out() {
        let expires = default_invite_expiration();
        let delta = expires - Utc::now();
        assert!(delta > Duration::days(6));
        assert!(delta <= Duration::days(7));
    }

    #[test]
    fn accept_outcome_carries_group() {
        let group_id = Uuid::new_v4();
        let outcome = AcceptOutcome::Accepted { group_id };
        assert_eq!(outcome, AcceptOutcome::Accepted { group_id });
        assert_ne!(outcome, AcceptOutcome::NotPending);
    }
}
