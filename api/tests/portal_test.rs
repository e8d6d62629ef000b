//! Candidate upload portal behind `/r/{token}`

mod common;

use actix_web::{
    http::{header, StatusCode},
    test,
};
use ap_api::create_app;
use ap_core::domain::entities::attachment::{DocumentType, NewAttachment, UploadedBy};
use ap_core::domain::entities::audit::AuditEventType;
use ap_shared::UploadConfig;
use chrono::{Duration, Utc};
use serde_json::Value;

use common::{multipart_body, multipart_content_type, Part, TestConfig, TestContext, PDF};

const PNG: &[u8] = &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n', 0, 0, 0, 13];

fn upload_request(token: &str, parts: &[Part<'_>]) -> test::TestRequest {
    test::TestRequest::post()
        .uri(&format!("/r/{}/upload", token))
        .insert_header((header::CONTENT_TYPE, multipart_content_type()))
        .set_payload(multipart_body(parts))
}

fn candidate_file(application_id: i64, name: &str, size_bytes: i64) -> NewAttachment {
    NewAttachment {
        application_id,
        file_url: format!("applications/{}/{}", application_id, name),
        file_name: name.to_string(),
        file_type: "application/pdf".to_string(),
        document_type: DocumentType::Cv,
        uploaded_by: UploadedBy::Candidate,
        size_bytes,
    }
}

#[actix_web::test]
async fn test_status_page_for_valid_link() {
    let ctx = TestContext::new();
    let (token, record) = ctx.issue_link(1).await;
    ctx.attachments.seed(candidate_file(1, "cv.pdf", 2048)).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::get().uri(&format!("/r/{}", token)).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CACHE_CONTROL).unwrap(),
        "no-store, no-cache, must-revalidate, private"
    );

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["candidate_name"], "Candidate 1");
    assert_eq!(body["job_title"], "Software Engineer");
    assert_eq!(body["can_resend"], true);
    assert_eq!(body["uploaded_files"][0]["name"], "cv.pdf");
    assert_eq!(body["quota"]["file_count"], 1);
    assert_eq!(body["quota"]["used_bytes"], 2048);
    assert!(body["hours_remaining"].as_i64().unwrap() >= 71);

    // Viewing the status does not count as a use
    let stored = ctx.magic_link_repo.get(record.id).await.unwrap();
    assert!(stored.last_used_at.is_none());
    assert_eq!(stored.fail_count, 0);
}

#[actix_web::test]
async fn test_status_page_unknown_link() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::get().uri("/r/not-a-real-token").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "token_invalid");
    assert_eq!(body["can_resend"], false);
}

#[actix_web::test]
async fn test_status_page_expired_link_offers_resend() {
    let ctx = TestContext::new();
    ctx.applications.seed(1, Some("c@example.com")).await;
    let record = ctx
        .insert_link("expired-token", |link| link.expires_at = Utc::now() - Duration::hours(1))
        .await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::get().uri("/r/expired-token").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::GONE);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "token_expired");
    assert_eq!(body["can_resend"], true);

    assert_eq!(ctx.magic_link_repo.get(record.id).await.unwrap().fail_count, 1);
    assert_eq!(ctx.audit_repo.logs_of_type(AuditEventType::MagicLinkRejected).len(), 1);
}

#[actix_web::test]
async fn test_status_page_locked_link() {
    let ctx = TestContext::new();
    ctx.applications.seed(1, Some("c@example.com")).await;
    ctx.insert_link("locked-token", |link| link.fail_count = 10).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::get().uri("/r/locked-token").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "token_locked");
    assert_eq!(body["can_resend"], false);
}

#[actix_web::test]
async fn test_revoked_link_locks_after_repeated_presentations() {
    let ctx = TestContext::build(TestConfig {
        max_failures: 2,
        ..Default::default()
    });
    ctx.applications.seed(1, Some("c@example.com")).await;
    ctx.insert_link("revoked-token", |link| link.revoked_at = Some(Utc::now())).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    for _ in 0..2 {
        let req = test::TestRequest::get().uri("/r/revoked-token").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    let req = test::TestRequest::get().uri("/r/revoked-token").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_upload_stores_files() {
    let ctx = TestContext::new();
    let (token, record) = ctx.issue_link(1).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = upload_request(
        &token,
        &[
            Part::text("document_type", "cv"),
            Part::file("My CV.pdf", "application/pdf", PDF),
            Part::file("photo.png", "image/png", PNG),
        ],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "uploaded");
    assert_eq!(body["count"], 2);
    assert_eq!(body["uploaded_files"][0]["name"], "My_CV.pdf");
    assert_eq!(body["all_uploaded_files"].as_array().unwrap().len(), 2);
    assert_eq!(body["all_uploaded_files"][0]["document_type"], "cv");
    assert_eq!(body["all_uploaded_files"][0]["uploaded_by"], "candidate");

    assert_eq!(ctx.storage.len().await, 2);
    assert_eq!(ctx.attachments.count().await, 2);
    assert!(ctx.magic_link_repo.get(record.id).await.unwrap().last_used_at.is_some());
    assert_eq!(ctx.audit_repo.logs_of_type(AuditEventType::UploadAccepted).len(), 1);
}

#[actix_web::test]
async fn test_upload_rejects_disallowed_type() {
    let ctx = TestContext::new();
    let (token, _) = ctx.issue_link(1).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = upload_request(&token, &[Part::file("notes.txt", "text/plain", b"hello")]).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_file_type");
    assert_eq!(ctx.storage.len().await, 0);
    assert_eq!(ctx.audit_repo.logs_of_type(AuditEventType::UploadRejected).len(), 1);
}

#[actix_web::test]
async fn test_upload_rejects_content_mismatch() {
    let ctx = TestContext::new();
    let (token, _) = ctx.issue_link(1).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = upload_request(&token, &[Part::file("cv.pdf", "application/pdf", b"MZ not a pdf")]).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "content_mismatch");
    assert_eq!(ctx.attachments.count().await, 0);
}

#[actix_web::test]
async fn test_upload_without_files() {
    let ctx = TestContext::new();
    let (token, _) = ctx.issue_link(1).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = upload_request(&token, &[Part::text("document_type", "cv")]).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "no_files");
}

#[actix_web::test]
async fn test_upload_file_over_type_limit() {
    let ctx = TestContext::build(TestConfig {
        upload: UploadConfig {
            max_pdf_bytes: 16,
            ..Default::default()
        },
        ..Default::default()
    });
    let (token, _) = ctx.issue_link(1).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = upload_request(&token, &[Part::file("cv.pdf", "application/pdf", PDF)]).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "file_too_large");
    assert_eq!(body["details"]["max_bytes"], 16);
}

#[actix_web::test]
async fn test_upload_request_over_limit() {
    let ctx = TestContext::build(TestConfig {
        upload: UploadConfig {
            max_request_bytes: PDF.len() as u64 + 4,
            ..Default::default()
        },
        ..Default::default()
    });
    let (token, _) = ctx.issue_link(1).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = upload_request(
        &token,
        &[
            Part::file("a.pdf", "application/pdf", PDF),
            Part::file("b.pdf", "application/pdf", PDF),
        ],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "request_too_large");
    assert_eq!(ctx.storage.len().await, 0);
}

#[actix_web::test]
async fn test_upload_application_quota() {
    let ctx = TestContext::build(TestConfig {
        upload: UploadConfig {
            max_application_bytes: 1000,
            ..Default::default()
        },
        ..Default::default()
    });
    let (token, _) = ctx.issue_link(1).await;
    ctx.attachments.seed(candidate_file(1, "old.pdf", 990)).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = upload_request(&token, &[Part::file("cv.pdf", "application/pdf", PDF)]).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "quota_exceeded");
    assert_eq!(ctx.attachments.count().await, 1);
}

#[actix_web::test]
async fn test_upload_file_count_for_application() {
    let ctx = TestContext::build(TestConfig {
        upload: UploadConfig {
            max_files_per_application: 1,
            ..Default::default()
        },
        ..Default::default()
    });
    let (token, _) = ctx.issue_link(1).await;
    ctx.attachments.seed(candidate_file(1, "old.pdf", 100)).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = upload_request(&token, &[Part::file("cv.pdf", "application/pdf", PDF)]).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "too_many_files_for_application");
}

#[actix_web::test]
async fn test_upload_without_storage() {
    let ctx = TestContext::build(TestConfig {
        storage: false,
        ..Default::default()
    });
    let (token, _) = ctx.issue_link(1).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = upload_request(&token, &[Part::file("cv.pdf", "application/pdf", PDF)]).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "storage_not_configured");
}

#[actix_web::test]
async fn test_upload_storage_failure_rolls_back() {
    let ctx = TestContext::new();
    ctx.storage.fail_after(1);
    let (token, _) = ctx.issue_link(1).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = upload_request(
        &token,
        &[
            Part::file("a.pdf", "application/pdf", PDF),
            Part::file("b.pdf", "application/pdf", PDF),
        ],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    assert_eq!(ctx.storage.len().await, 0);
    assert_eq!(ctx.attachments.count().await, 0);
}

#[actix_web::test]
async fn test_upload_with_expired_link() {
    let ctx = TestContext::new();
    ctx.applications.seed(1, Some("c@example.com")).await;
    ctx.insert_link("expired-token", |link| link.expires_at = Utc::now() - Duration::minutes(1))
        .await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = upload_request("expired-token", &[Part::file("cv.pdf", "application/pdf", PDF)]).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_or_expired");
    assert_eq!(ctx.storage.len().await, 0);
}

#[actix_web::test]
async fn test_delete_own_upload() {
    let ctx = TestContext::new();
    let (token, record) = ctx.issue_link(1).await;
    let kept = ctx.attachments.seed(candidate_file(1, "keep.pdf", 10)).await;
    let removed = ctx.attachments.seed(candidate_file(1, "remove.pdf", 10)).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/r/{}/attachments/{}", token, removed.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "deleted");
    let remaining = body["all_uploaded_files"].as_array().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["id"], kept.id);

    assert_eq!(ctx.attachments.count().await, 1);
    assert!(ctx.magic_link_repo.get(record.id).await.unwrap().last_used_at.is_some());
    assert_eq!(ctx.audit_repo.logs_of_type(AuditEventType::AttachmentDeleted).len(), 1);
}

#[actix_web::test]
async fn test_delete_recruiter_upload_forbidden() {
    let ctx = TestContext::new();
    let (token, _) = ctx.issue_link(1).await;
    let recruiter_file = ctx
        .attachments
        .seed(NewAttachment {
            uploaded_by: UploadedBy::Recruiter,
            ..candidate_file(1, "offer.pdf", 10)
        })
        .await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/r/{}/attachments/{}", token, recruiter_file.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(ctx.attachments.count().await, 1);
}

#[actix_web::test]
async fn test_delete_other_application_attachment() {
    let ctx = TestContext::new();
    let (token, _) = ctx.issue_link(1).await;
    let foreign = ctx.attachments.seed(candidate_file(2, "theirs.pdf", 10)).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/r/{}/attachments/{}", token, foreign.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "not_found");
    assert_eq!(ctx.attachments.count().await, 1);
}

#[actix_web::test]
async fn test_delete_with_invalid_link() {
    let ctx = TestContext::new();
    let file = ctx.attachments.seed(candidate_file(1, "cv.pdf", 10)).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/r/unknown/attachments/{}", file.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_or_expired");
    assert_eq!(ctx.attachments.count().await, 1);
}

#[actix_web::test]
async fn test_resend_expired_link() {
    let ctx = TestContext::new();
    ctx.applications.seed(1, Some("candidate@example.com")).await;
    ctx.insert_link("expired-token", |link| link.expires_at = Utc::now() - Duration::hours(2))
        .await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::post().uri("/r/expired-token/resend").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "sent");

    let sent = ctx.delivery.magic_links().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipient, "candidate@example.com");

    let fresh = ctx.delivery.last_magic_link_token().await.unwrap();
    let req = test::TestRequest::get().uri(&format!("/r/{}", fresh)).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    assert_eq!(ctx.audit_repo.logs_of_type(AuditEventType::MagicLinkResent).len(), 1);
}

#[actix_web::test]
async fn test_resend_unknown_or_revoked_link() {
    let ctx = TestContext::new();
    ctx.applications.seed(1, Some("candidate@example.com")).await;
    ctx.insert_link("revoked-token", |link| link.revoked_at = Some(Utc::now())).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    for token in ["unknown-token", "revoked-token"] {
        let req = test::TestRequest::post().uri(&format!("/r/{}/resend", token)).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "invalid_or_expired");
    }
    assert!(ctx.delivery.magic_links().await.is_empty());
}

#[actix_web::test]
async fn test_portal_security_headers() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::get().uri("/r/whatever").to_request();
    let resp = test::call_service(&app, req).await;
    let headers = resp.headers();
    assert_eq!(headers.get(header::REFERRER_POLICY).unwrap(), "no-referrer");
    assert_eq!(headers.get(header::X_CONTENT_TYPE_OPTIONS).unwrap(), "nosniff");
    assert_eq!(headers.get(header::X_FRAME_OPTIONS).unwrap(), "DENY");
    assert_eq!(headers.get(header::PRAGMA).unwrap(), "no-cache");
    assert!(headers.get(header::STRICT_TRANSPORT_SECURITY).is_none());
}
