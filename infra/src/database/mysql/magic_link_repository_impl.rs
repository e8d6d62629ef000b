//! MySQL implementation of the MagicLinkRepository trait.
//!
//! Only the keyed hash of a link is stored. The failure counter is bumped
//! with a single `UPDATE` inside a transaction so concurrent presentations of
//! the same link never lose an increment.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::MySqlPool;
use uuid::Uuid;

use ap_core::domain::entities::magic_link::MagicLinkToken;
use ap_core::errors::DomainError;
use ap_core::repositories::MagicLinkRepository;

use super::{column, query_error, uuid_column};

const SELECT_COLUMNS: &str = r#"
    SELECT id, application_id, token_hash, scope, expires_at,
           revoked_at, last_used_at, fail_count, created_at
    FROM magic_link_tokens
"#;

/// MySQL implementation of MagicLinkRepository
pub struct MySqlMagicLinkRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlMagicLinkRepository {
    /// Create a new MySQL magic link repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_token(row: &sqlx::mysql::MySqlRow) -> Result<MagicLinkToken, DomainError> {
        Ok(MagicLinkToken {
            id: uuid_column(row, "id")?,
            application_id: column(row, "application_id")?,
            token_hash: column(row, "token_hash")?,
            scope: column(row, "scope")?,
            expires_at: column::<DateTime<Utc>>(row, "expires_at")?,
            revoked_at: column::<Option<DateTime<Utc>>>(row, "revoked_at")?,
            last_used_at: column::<Option<DateTime<Utc>>>(row, "last_used_at")?,
            fail_count: column(row, "fail_count")?,
            created_at: column::<DateTime<Utc>>(row, "created_at")?,
        })
    }

    async fn find_one(&self, clause: &str, value: String) -> Result<Option<MagicLinkToken>, DomainError> {
        let query = format!("{} WHERE {} = ?", SELECT_COLUMNS, clause);
        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error("find magic link"))?;

        row.as_ref().map(Self::row_to_token).transpose()
    }
}

#[async_trait]
impl MagicLinkRepository for MySqlMagicLinkRepository {
    async fn create(&self, token: MagicLinkToken) -> Result<MagicLinkToken, DomainError> {
        let query = r#"
            INSERT INTO magic_link_tokens (
                id, application_id, token_hash, scope, expires_at,
                revoked_at, last_used_at, fail_count, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(token.id.to_string())
            .bind(token.application_id)
            .bind(&token.token_hash)
            .bind(&token.scope)
            .bind(token.expires_at)
            .bind(token.revoked_at)
            .bind(token.last_used_at)
            .bind(token.fail_count)
            .bind(token.created_at)
            .execute(&self.pool)
            .await
            .map_err(query_error("save magic link"))?;

        Ok(token)
    }

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<MagicLinkToken>, DomainError> {
        self.find_one("token_hash", token_hash.to_string()).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<MagicLinkToken>, DomainError> {
        self.find_one("id", id.to_string()).await
    }

    async fn increment_fail_count(&self, id: Uuid) -> Result<i32, DomainError> {
        let mut tx = self.pool.begin().await.map_err(query_error("begin transaction"))?;

        let result = sqlx::query("UPDATE magic_link_tokens SET fail_count = fail_count + 1 WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(query_error("increment fail count"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound {
                resource: "magic_link_token".to_string(),
            });
        }

        let row = sqlx::query("SELECT fail_count FROM magic_link_tokens WHERE id = ?")
            .bind(id.to_string())
            .fetch_one(&mut *tx)
            .await
            .map_err(query_error("read fail count"))?;
        let fail_count: i32 = column(&row, "fail_count")?;

        tx.commit().await.map_err(query_error("commit fail count"))?;
        Ok(fail_count)
    }

    async fn mark_used(&self, id: Uuid, used_at: DateTime<Utc>) -> Result<(), DomainError> {
        sqlx::query("UPDATE magic_link_tokens SET last_used_at = ? WHERE id = ?")
            .bind(used_at)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(query_error("mark magic link used"))?;
        Ok(())
    }

    async fn revoke(&self, id: Uuid, revoked_at: DateTime<Utc>) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "UPDATE magic_link_tokens SET revoked_at = ? WHERE id = ? AND revoked_at IS NULL",
        )
        .bind(revoked_at)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(query_error("revoke magic link"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn revoke_for_application(
        &self,
        application_id: i64,
        revoked_at: DateTime<Utc>,
    ) -> Result<usize, DomainError> {
        let result = sqlx::query(
            "UPDATE magic_link_tokens SET revoked_at = ? WHERE application_id = ? AND revoked_at IS NULL",
        )
        .bind(revoked_at)
        .bind(application_id)
        .execute(&self.pool)
        .await
        .map_err(query_error("revoke magic links for application"))?;

        Ok(result.rows_affected() as usize)
    }

    async fn delete_stale(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let result = sqlx::query(
            "DELETE FROM magic_link_tokens WHERE expires_at <= ? OR revoked_at IS NOT NULL",
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(query_error("delete stale magic links"))?;

        Ok(result.rows_affected() as usize)
    }
}
