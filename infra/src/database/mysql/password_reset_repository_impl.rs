//! MySQL implementation of the PasswordResetRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::MySqlPool;
use uuid::Uuid;

use ap_core::domain::entities::password_reset::PasswordResetToken;
use ap_core::errors::DomainError;
use ap_core::repositories::PasswordResetRepository;

use super::{column, query_error, uuid_column};

pub struct MySqlPasswordResetRepository {
    pool: MySqlPool,
}

impl MySqlPasswordResetRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_token(row: &sqlx::mysql::MySqlRow) -> Result<PasswordResetToken, DomainError> {
        Ok(PasswordResetToken {
            id: uuid_column(row, "id")?,
            user_id: column(row, "user_id")?,
            token_hash: column(row, "token_hash")?,
            expires_at: column::<DateTime<Utc>>(row, "expires_at")?,
            used_at: column::<Option<DateTime<Utc>>>(row, "used_at")?,
            created_at: column::<DateTime<Utc>>(row, "created_at")?,
        })
    }
}

#[async_trait]
impl PasswordResetRepository for MySqlPasswordResetRepository {
    async fn create(&self, token: PasswordResetToken) -> Result<PasswordResetToken, DomainError> {
        let query = r#"
            INSERT INTO password_reset_tokens (
                id, user_id, token_hash, expires_at, used_at, created_at
            ) VALUES (?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(token.id.to_string())
            .bind(token.user_id)
            .bind(&token.token_hash)
            .bind(token.expires_at)
            .bind(token.used_at)
            .bind(token.created_at)
            .execute(&self.pool)
            .await
            .map_err(query_error("save password reset token"))?;

        Ok(token)
    }

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<PasswordResetToken>, DomainError> {
        let query = r#"
            SELECT id, user_id, token_hash, expires_at, used_at, created_at
            FROM password_reset_tokens
            WHERE token_hash = ?
        "#;

        let row = sqlx::query(query)
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error("find password reset token"))?;

        row.as_ref().map(Self::row_to_token).transpose()
    }

    /// Conditional update; only the first caller sees an affected row
    async fn claim(&self, id: Uuid, used_at: DateTime<Utc>) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "UPDATE password_reset_tokens SET used_at = ? WHERE id = ? AND used_at IS NULL",
        )
        .bind(used_at)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(query_error("claim password reset token"))?;

        Ok(result.rows_affected() == 1)
    }

    async fn invalidate_for_user(&self, user_id: i64, used_at: DateTime<Utc>) -> Result<usize, DomainError> {
        let result = sqlx::query(
            "UPDATE password_reset_tokens SET used_at = ? WHERE user_id = ? AND used_at IS NULL",
        )
        .bind(used_at)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(query_error("invalidate password reset tokens"))?;

        Ok(result.rows_affected() as usize)
    }

    async fn delete_stale(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let result = sqlx::query(
            "DELETE FROM password_reset_tokens WHERE expires_at <= ? OR used_at IS NOT NULL",
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(query_error("delete stale password reset tokens"))?;

        Ok(result.rows_affected() as usize)
    }
}
