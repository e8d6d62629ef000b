//! MySQL implementation of the UserRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::MySqlPool;

use ap_core::domain::entities::user::{User, UserRole};
use ap_core::errors::DomainError;
use ap_core::repositories::UserRepository;

use super::{column, query_error};

/// MySQL implementation of UserRepository
pub struct MySqlUserRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlUserRepository {
    /// Create a new MySQL user repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to User entity
    fn row_to_user(row: &sqlx::mysql::MySqlRow) -> Result<User, DomainError> {
        let role: String = column(row, "role")?;
        let role = UserRole::from_str(&role).ok_or_else(|| DomainError::Internal {
            message: format!("Unknown user role: {}", role),
        })?;

        Ok(User {
            id: column(row, "id")?,
            email: column(row, "email")?,
            password_hash: column(row, "password_hash")?,
            role,
            is_active: column(row, "is_active")?,
            updated_at: column::<DateTime<Utc>>(row, "updated_at")?,
        })
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let query = r#"
            SELECT id, email, password_hash, role, is_active, updated_at
            FROM users
            WHERE email = ?
        "#;

        let row = sqlx::query(query)
            .bind(User::normalize_email(email))
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error("find user by email"))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
        let query = r#"
            SELECT id, email, password_hash, role, is_active, updated_at
            FROM users
            WHERE id = ?
        "#;

        let row = sqlx::query(query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error("find user by id"))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn update_password_hash(&self, user_id: i64, password_hash: &str) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
            .bind(password_hash)
            .bind(Utc::now())
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(query_error("update password hash"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound {
                resource: "user".to_string(),
            });
        }
        Ok(())
    }
}
