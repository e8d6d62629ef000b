use std::sync::Arc;

use ap_shared::config::upload::{MIME_JPEG, MIME_PDF, MIME_PNG};
use ap_shared::UploadConfig;

use super::*;
use crate::domain::entities::attachment::{AttachmentUsage, DocumentType, NewAttachment, UploadedBy};
use crate::errors::{DomainError, QuotaError};
use crate::repositories::MockAttachmentRepository;

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

fn config() -> UploadConfig {
    UploadConfig {
        max_request_bytes: 20 * MIB,
        max_pdf_bytes: 10 * MIB,
        max_image_bytes: 5 * MIB,
        max_application_bytes: 30 * MIB,
        max_files_per_request: 3,
        max_files_per_application: 5,
        ..UploadConfig::default()
    }
}

fn stored(application_id: i64, size_bytes: u64) -> NewAttachment {
    NewAttachment {
        application_id,
        file_url: format!("{}/x_cv.pdf", application_id),
        file_name: "cv.pdf".to_string(),
        file_type: MIME_PDF.to_string(),
        document_type: DocumentType::Cv,
        uploaded_by: UploadedBy::Candidate,
        size_bytes: size_bytes as i64,
    }
}

fn quota_error(result: Result<(), DomainError>) -> QuotaError {
    match result {
        Err(DomainError::Quota(e)) => e,
        other => panic!("expected quota error, got {:?}", other),
    }
}

async fn service_with(stored_sizes: &[u64]) -> QuotaService {
    let repo = Arc::new(MockAttachmentRepository::new());
    for size in stored_sizes {
        repo.seed(stored(1, *size)).await;
    }
    QuotaService::new(repo, config())
}

#[tokio::test]
async fn test_accepts_batch_within_budgets() {
    let service = service_with(&[MIB]).await;
    let files = [
        IncomingFile::new(MIME_PDF, 9 * MIB),
        IncomingFile::new(MIME_PNG, 4 * MIB),
        IncomingFile::new(MIME_JPEG, 200 * KIB),
    ];
    assert!(service.check_quota(1, &files).await.is_ok());
}

#[tokio::test]
async fn test_empty_batch() {
    let service = service_with(&[]).await;
    assert_eq!(quota_error(service.check_quota(1, &[]).await), QuotaError::NoFiles);
}

#[tokio::test]
async fn test_rejects_disallowed_type() {
    let service = service_with(&[]).await;
    let files = [IncomingFile::new("application/zip", 10)];
    assert_eq!(
        quota_error(service.check_quota(1, &files).await),
        QuotaError::InvalidFileType {
            mime: "application/zip".to_string()
        }
    );
}

#[tokio::test]
async fn test_per_file_limit_depends_on_type() {
    let service = service_with(&[]).await;

    // 6 MiB is fine for a PDF but not for an image
    assert!(service.check_quota(1, &[IncomingFile::new(MIME_PDF, 6 * MIB)]).await.is_ok());
    assert_eq!(
        quota_error(service.check_quota(1, &[IncomingFile::new(MIME_PNG, 6 * MIB)]).await),
        QuotaError::FileTooLarge { max_bytes: 5 * MIB }
    );
    // Exactly at the limit is allowed
    assert!(service.check_quota(1, &[IncomingFile::new(MIME_PNG, 5 * MIB)]).await.is_ok());
}

#[tokio::test]
async fn test_request_limit() {
    let service = service_with(&[]).await;
    let files = [
        IncomingFile::new(MIME_PDF, 10 * MIB),
        IncomingFile::new(MIME_PDF, 10 * MIB),
        IncomingFile::new(MIME_PNG, 1),
    ];
    assert_eq!(
        quota_error(service.check_quota(1, &files).await),
        QuotaError::RequestTooLarge { max_bytes: 20 * MIB }
    );
}

#[tokio::test]
async fn test_application_limit_counts_stored_bytes() {
    let service = service_with(&[10 * MIB, 15 * MIB]).await;

    assert!(service.check_quota(1, &[IncomingFile::new(MIME_PDF, 5 * MIB)]).await.is_ok());
    assert_eq!(
        quota_error(service.check_quota(1, &[IncomingFile::new(MIME_PDF, 5 * MIB + 1)]).await),
        QuotaError::ApplicationQuotaExceeded { max_bytes: 30 * MIB }
    );
    // Other applications have their own budget
    assert!(service.check_quota(2, &[IncomingFile::new(MIME_PDF, 10 * MIB)]).await.is_ok());
}

#[tokio::test]
async fn test_file_count_limits() {
    let service = service_with(&[]).await;
    let four = vec![IncomingFile::new(MIME_PNG, 1); 4];
    assert_eq!(
        quota_error(service.check_quota(1, &four).await),
        QuotaError::TooManyFiles { max: 3 }
    );

    let service = service_with(&[1, 1, 1, 1]).await;
    let two = vec![IncomingFile::new(MIME_PNG, 1); 2];
    assert_eq!(
        quota_error(service.check_quota(1, &two).await),
        QuotaError::TooManyFilesForApplication { max: 5 }
    );
}

#[tokio::test]
async fn test_zero_byte_limits_are_unlimited() {
    let repo = Arc::new(MockAttachmentRepository::new());
    let config = UploadConfig {
        max_request_bytes: 0,
        max_pdf_bytes: 0,
        max_application_bytes: 0,
        ..config()
    };
    let service = QuotaService::new(repo, config);

    let files = [IncomingFile::new(MIME_PDF, 500 * MIB)];
    assert!(service.check_quota(1, &files).await.is_ok());
}

#[test]
fn test_session_rejects_oversized_stream_early() {
    let mut session = UploadSession::new(config(), 1, AttachmentUsage::default());
    let mut file = session.begin_file(MIME_PNG).unwrap();

    for _ in 0..5 {
        session.consume(&mut file, MIB).unwrap();
    }
    assert_eq!(
        session.consume(&mut file, 1),
        Err(QuotaError::FileTooLarge { max_bytes: 5 * MIB })
    );
    assert_eq!(file.received(), 5 * MIB);
    assert_eq!(session.total_bytes(), 5 * MIB);
}

#[test]
fn test_session_tracks_request_across_files() {
    let usage = AttachmentUsage {
        file_count: 1,
        total_bytes: 15 * MIB,
    };
    let mut session = UploadSession::new(config(), 1, usage);

    let mut first = session.begin_file(MIME_PDF).unwrap();
    session.consume(&mut first, 10 * MIB).unwrap();
    let mut second = session.begin_file(MIME_PDF).unwrap();
    session.consume(&mut second, 5 * MIB).unwrap();

    assert_eq!(
        session.consume(&mut second, 1),
        Err(QuotaError::ApplicationQuotaExceeded { max_bytes: 30 * MIB })
    );
    assert_eq!(session.file_count(), 2);
    assert!(session.finish().is_ok());
}

#[test]
fn test_session_without_files_fails() {
    let session = UploadSession::new(config(), 1, AttachmentUsage::default());
    assert_eq!(session.finish(), Err(QuotaError::NoFiles));
}
