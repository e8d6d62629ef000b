//! Common utility functions

pub mod filename;
pub mod password;
pub mod url;

// Re-export commonly used utilities
pub use filename::{object_name, secure_filename};
pub use password::password_policy_error;
pub use url::{join_public_url, mask_token_url};
