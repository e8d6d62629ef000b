//! Business services containing domain logic and use cases.

pub mod audit;
pub mod delivery;
pub mod quota;
pub mod rate_limit;
pub mod token;
pub mod upload;

// Re-export commonly used types
pub use audit::{AuditService, AuditServiceConfig};
pub use delivery::{LinkDeliveryTrait, MagicLinkMessage, PasswordResetMessage};
pub use quota::{FileBudget, IncomingFile, QuotaService, UploadSession};
pub use rate_limit::{RateLimitDecision, RateLimitService, RateLimiterTrait};
pub use token::{
    CleanupResult, DispatchedLink, IssuedMagicLink, LinkDispatchService, MagicLinkService,
    MagicLinkServiceConfig, PasswordResetService, PasswordResetServiceConfig, TokenCleanupConfig,
    TokenCleanupService, TokenHasher,
};
pub use upload::{FileStorageTrait, PortalStatus, QuotaUsage, UploadService, UploadedFile};

#[cfg(any(test, feature = "test-utils"))]
pub use delivery::MockLinkDelivery;
#[cfg(any(test, feature = "test-utils"))]
pub use rate_limit::MockRateLimiter;
#[cfg(any(test, feature = "test-utils"))]
pub use upload::MockFileStorage;
