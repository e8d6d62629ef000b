//! MySQL implementation of the AttachmentRepository trait.
//!
//! A batch of uploads is inserted in one transaction so that either every
//! row of a request exists or none does.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::MySqlPool;

use ap_core::domain::entities::attachment::{
    Attachment, AttachmentUsage, DocumentType, NewAttachment, UploadedBy,
};
use ap_core::errors::DomainError;
use ap_core::repositories::AttachmentRepository;

use super::{column, query_error};

pub struct MySqlAttachmentRepository {
    pool: MySqlPool,
}

impl MySqlAttachmentRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_attachment(row: &sqlx::mysql::MySqlRow) -> Result<Attachment, DomainError> {
        let document_type: Option<String> = column(row, "document_type")?;
        let uploaded_by: String = column(row, "uploaded_by")?;
        let uploaded_by = UploadedBy::from_str(&uploaded_by).ok_or_else(|| DomainError::Internal {
            message: format!("Unknown uploader: {}", uploaded_by),
        })?;

        Ok(Attachment {
            id: column(row, "id")?,
            application_id: column(row, "application_id")?,
            file_url: column(row, "file_url")?,
            file_name: column(row, "file_name")?,
            file_type: column(row, "file_type")?,
            document_type: DocumentType::from_form(document_type.as_deref()),
            uploaded_by,
            size_bytes: column(row, "size_bytes")?,
            created_at: column::<DateTime<Utc>>(row, "created_at")?,
        })
    }
}

#[async_trait]
impl AttachmentRepository for MySqlAttachmentRepository {
    async fn create_many(&self, attachments: Vec<NewAttachment>) -> Result<Vec<Attachment>, DomainError> {
        let query = r#"
            INSERT INTO attachments (
                application_id, file_url, file_name, file_type,
                document_type, uploaded_by, size_bytes, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        let mut tx = self.pool.begin().await.map_err(query_error("begin transaction"))?;
        let created_at = Utc::now();
        let mut created = Vec::with_capacity(attachments.len());

        for attachment in attachments {
            let result = sqlx::query(query)
                .bind(attachment.application_id)
                .bind(&attachment.file_url)
                .bind(&attachment.file_name)
                .bind(&attachment.file_type)
                .bind(attachment.document_type.as_str())
                .bind(attachment.uploaded_by.as_str())
                .bind(attachment.size_bytes)
                .bind(created_at)
                .execute(&mut *tx)
                .await
                .map_err(query_error("save attachment"))?;

            created.push(attachment.into_attachment(result.last_insert_id() as i64, created_at));
        }

        tx.commit().await.map_err(query_error("commit attachments"))?;

        // Newest first, matching list_by_application
        created.reverse();
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Attachment>, DomainError> {
        let query = r#"
            SELECT id, application_id, file_url, file_name, file_type,
                   document_type, uploaded_by, size_bytes, created_at
            FROM attachments
            WHERE id = ?
        "#;

        let row = sqlx::query(query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error("find attachment"))?;

        row.as_ref().map(Self::row_to_attachment).transpose()
    }

    async fn list_by_application(&self, application_id: i64) -> Result<Vec<Attachment>, DomainError> {
        let query = r#"
            SELECT id, application_id, file_url, file_name, file_type,
                   document_type, uploaded_by, size_bytes, created_at
            FROM attachments
            WHERE application_id = ?
            ORDER BY created_at DESC, id DESC
        "#;

        let rows = sqlx::query(query)
            .bind(application_id)
            .fetch_all(&self.pool)
            .await
            .map_err(query_error("list attachments"))?;

        rows.iter()
            .map(Self::row_to_attachment)
            .collect::<Result<Vec<_>, _>>()
    }

    async fn usage_for_application(&self, application_id: i64) -> Result<AttachmentUsage, DomainError> {
        let query = r#"
            SELECT COUNT(*) AS file_count,
                   CAST(COALESCE(SUM(size_bytes), 0) AS SIGNED) AS total_bytes
            FROM attachments
            WHERE application_id = ?
        "#;

        let row = sqlx::query(query)
            .bind(application_id)
            .fetch_one(&self.pool)
            .await
            .map_err(query_error("sum attachment usage"))?;

        let file_count: i64 = column(&row, "file_count")?;
        let total_bytes: i64 = column(&row, "total_bytes")?;

        Ok(AttachmentUsage {
            file_count: file_count.max(0) as u32,
            total_bytes: total_bytes.max(0) as u64,
        })
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM attachments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(query_error("delete attachment"))?;

        Ok(result.rows_affected() > 0)
    }
}
