//! Shared utilities and common types for the applicant portal server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types loaded from the environment
//! - Error response structures
//! - Utility functions (filenames, public URLs, password policy)
//! - Common response types

pub mod config;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CleanupConfig, ConfigError, CorsConfig, DatabaseConfig, Environment,
    LoggingConfig, MagicLinkConfig, PasswordResetConfig, RateLimitConfig, RouteLimit,
    ServerConfig, StorageConfig, StorageMode, UploadConfig,
};
pub use errors::{error_codes, ErrorResponse};
pub use types::{HealthResponse, HealthStatus};
pub use utils::{filename, password, url};
