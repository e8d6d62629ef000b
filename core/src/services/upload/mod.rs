//! Candidate document uploads through a magic link.

mod service;
mod sniff;
mod storage;


pub use service::{PortalStatus, QuotaUsage, UploadService, UploadedFile};
pub use sniff::{content_matches, sniff_mime};
pub use storage::FileStorageTrait;

#[cfg(any(test, feature = "test-utils"))]
mod mock;
#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockFileStorage;
