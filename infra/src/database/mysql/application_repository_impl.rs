//! Read-only access to applications and candidates.
//!
//! These rows are owned by the recruiting back office; the portal only reads
//! them to address links and render the status page.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::MySqlPool;

use ap_core::domain::entities::application::{Application, Candidate};
use ap_core::errors::DomainError;
use ap_core::repositories::ApplicationRepository;

use super::{column, query_error};

pub struct MySqlApplicationRepository {
    pool: MySqlPool,
}

impl MySqlApplicationRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApplicationRepository for MySqlApplicationRepository {
    async fn find_application(&self, id: i64) -> Result<Option<Application>, DomainError> {
        let query = r#"
            SELECT a.id, a.candidate_id, a.job_id, a.reference_number, a.created_at,
                   j.title AS job_title
            FROM applications a
            LEFT JOIN job_postings j ON j.id = a.job_id
            WHERE a.id = ?
        "#;

        let row = sqlx::query(query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error("find application"))?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(Application {
            id: column(&row, "id")?,
            candidate_id: column(&row, "candidate_id")?,
            job_id: column(&row, "job_id")?,
            reference_number: column(&row, "reference_number")?,
            job_title: column(&row, "job_title")?,
            created_at: column::<DateTime<Utc>>(&row, "created_at")?,
        }))
    }

    async fn find_candidate(&self, id: i64) -> Result<Option<Candidate>, DomainError> {
        let row = sqlx::query("SELECT id, name, email FROM candidates WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error("find candidate"))?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(Candidate {
            id: column(&row, "id")?,
            name: column(&row, "name")?,
            email: column(&row, "email")?,
        }))
    }
}
