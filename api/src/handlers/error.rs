//! Translation of domain errors into HTTP responses

use actix_web::{http::header, http::StatusCode, HttpResponse};
use ap_core::errors::{DomainError, QuotaError, TokenError, ValidationError};
use ap_shared::{error_codes, ErrorResponse};
use tracing::{error, warn};

/// Map a domain error to its response
///
/// Token errors keep their category here. Routes that act on a token use
/// [`handle_token_route_error`] instead.
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    match error {
        DomainError::Token(token_error) => token_error_response(token_error),
        DomainError::Quota(quota_error) => quota_error_response(quota_error),
        DomainError::ValidationErr(validation_error) => validation_error_response(validation_error),

        DomainError::Validation { message } => {
            HttpResponse::BadRequest().json(ErrorResponse::new(error_codes::VALIDATION_ERROR, message))
        }
        DomainError::NotFound { resource } => HttpResponse::NotFound().json(ErrorResponse::new(
            error_codes::NOT_FOUND,
            format!("{} not found", resource),
        )),
        DomainError::Forbidden { message } => {
            HttpResponse::Forbidden().json(ErrorResponse::new(error_codes::FORBIDDEN, message))
        }
        DomainError::RateLimited { retry_after_seconds } => HttpResponse::TooManyRequests()
            .insert_header((header::RETRY_AFTER, retry_after_seconds.to_string()))
            .json(
                ErrorResponse::new(error_codes::RATE_LIMITED, "Too many requests, please try again later")
                    .add_detail("retry_after_seconds", retry_after_seconds),
            ),
        DomainError::StorageNotConfigured => HttpResponse::ServiceUnavailable().json(ErrorResponse::new(
            error_codes::STORAGE_NOT_CONFIGURED,
            "File uploads are currently unavailable",
        )),
        DomainError::Storage { message } => {
            error!(error = %message, "Storage failure");
            HttpResponse::ServiceUnavailable().json(ErrorResponse::new(
                error_codes::UPLOAD_FAILED,
                "The files could not be stored, please try again later",
            ))
        }
        DomainError::Internal { message } => {
            error!(error = %message, "Internal error");
            internal_error()
        }
    }
}

/// Map an error on a route that acts on a presented token
///
/// Every token failure becomes the same 404 so the caller cannot tell an
/// unknown link from an expired, revoked or locked one.
pub fn handle_token_route_error(error: DomainError) -> HttpResponse {
    match error {
        DomainError::Token(TokenError::GenerationFailed) => handle_domain_error(error),
        DomainError::Token(token_error) => {
            warn!(reason = token_error.reason(), "Token rejected on mutating route");
            invalid_or_expired()
        }
        other => handle_domain_error(other),
    }
}

/// The single response of rejected tokens on mutating routes
pub fn invalid_or_expired() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::INVALID_OR_EXPIRED,
        "This link is invalid or has expired",
    ))
}

/// Response of a request body that failed `validator` checks
pub fn validation_failed(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(
        ErrorResponse::new(error_codes::VALIDATION_ERROR, "Invalid request data").add_detail("validation_errors", errors),
    )
}

pub fn internal_error() -> HttpResponse {
    HttpResponse::InternalServerError().json(ErrorResponse::new(
        error_codes::INTERNAL_ERROR,
        "An internal error occurred",
    ))
}

/// Status and code of a token error
pub fn token_error_status(error: &TokenError) -> (StatusCode, &'static str) {
    match error {
        TokenError::NotFound | TokenError::Revoked => (StatusCode::NOT_FOUND, error_codes::TOKEN_INVALID),
        TokenError::Expired => (StatusCode::GONE, error_codes::TOKEN_EXPIRED),
        TokenError::TooManyAttempts => (StatusCode::FORBIDDEN, error_codes::TOKEN_LOCKED),
        TokenError::AlreadyUsed => (StatusCode::GONE, error_codes::TOKEN_USED),
        TokenError::GenerationFailed => (StatusCode::INTERNAL_SERVER_ERROR, error_codes::INTERNAL_ERROR),
    }
}

fn token_error_response(error: TokenError) -> HttpResponse {
    let (status, code) = token_error_status(&error);
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!(error = %error, "Token generation failed");
        return internal_error();
    }
    let message = match error {
        TokenError::NotFound | TokenError::Revoked => "This link is invalid",
        TokenError::Expired => "This link has expired",
        TokenError::TooManyAttempts => "This link has been locked after too many failed attempts",
        TokenError::AlreadyUsed => "This link has already been used",
        TokenError::GenerationFailed => "An internal error occurred",
    };
    HttpResponse::build(status).json(ErrorResponse::new(code, message))
}

fn quota_error_response(error: QuotaError) -> HttpResponse {
    let message = error.to_string();
    match error {
        QuotaError::NoFiles => HttpResponse::BadRequest().json(ErrorResponse::new(error_codes::NO_FILES, message)),
        QuotaError::InvalidFileType { mime } => HttpResponse::BadRequest()
            .json(ErrorResponse::new(error_codes::INVALID_FILE_TYPE, message).add_detail("mime_type", mime)),
        QuotaError::ContentMismatch { mime } => HttpResponse::BadRequest()
            .json(ErrorResponse::new(error_codes::CONTENT_MISMATCH, message).add_detail("mime_type", mime)),
        QuotaError::FileTooLarge { max_bytes } => HttpResponse::BadRequest()
            .json(ErrorResponse::new(error_codes::FILE_TOO_LARGE, message).add_detail("max_bytes", max_bytes)),
        QuotaError::RequestTooLarge { max_bytes } => HttpResponse::PayloadTooLarge()
            .json(ErrorResponse::new(error_codes::REQUEST_TOO_LARGE, message).add_detail("max_bytes", max_bytes)),
        QuotaError::ApplicationQuotaExceeded { max_bytes } => HttpResponse::BadRequest()
            .json(ErrorResponse::new(error_codes::QUOTA_EXCEEDED, message).add_detail("max_bytes", max_bytes)),
        QuotaError::TooManyFiles { max } => HttpResponse::BadRequest()
            .json(ErrorResponse::new(error_codes::TOO_MANY_FILES, message).add_detail("max_files", max)),
        QuotaError::TooManyFilesForApplication { max } => HttpResponse::BadRequest().json(
            ErrorResponse::new(error_codes::TOO_MANY_FILES_FOR_APPLICATION, message).add_detail("max_files", max),
        ),
    }
}

fn validation_error_response(error: ValidationError) -> HttpResponse {
    let message = error.to_string();
    let code = match &error {
        ValidationError::RequiredField { field } => format!("{}_required", field),
        ValidationError::PasswordPolicy { .. } => error_codes::VALIDATION_ERROR.to_string(),
        ValidationError::PasswordMismatch => error_codes::PASSWORD_MISMATCH.to_string(),
        ValidationError::InvalidFileName => error_codes::INVALID_FILE_NAME.to_string(),
    };
    HttpResponse::BadRequest().json(ErrorResponse::new(code, message))
}
