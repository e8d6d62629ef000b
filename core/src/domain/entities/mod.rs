//! Domain entities representing core business objects.

pub mod application;
pub mod attachment;
pub mod audit;
pub mod magic_link;
pub mod password_reset;
pub mod user;

// Re-export commonly used types
pub use application::{Application, Candidate};
pub use attachment::{Attachment, AttachmentUsage, DocumentType, NewAttachment, UploadedBy};
pub use audit::{AuditEventType, AuditLog};
pub use magic_link::{MagicLinkToken, DEFAULT_MAGIC_LINK_TTL_HOURS, DEFAULT_MAX_FAILURES};
pub use password_reset::{PasswordResetToken, DEFAULT_PASSWORD_RESET_TTL_HOURS};
pub use user::{User, UserRole};
