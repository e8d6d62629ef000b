pub mod application;
pub mod attachment;
pub mod audit;
pub mod magic_link;
pub mod password_reset;
pub mod user;

pub use application::ApplicationRepository;
pub use attachment::AttachmentRepository;
pub use audit::AuditLogRepository;
pub use magic_link::MagicLinkRepository;
pub use password_reset::PasswordResetRepository;
pub use user::UserRepository;

#[cfg(any(test, feature = "test-utils"))]
pub use application::MockApplicationRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use attachment::MockAttachmentRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use audit::MockAuditLogRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use magic_link::MockMagicLinkRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use password_reset::MockPasswordResetRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user::MockUserRepository;
