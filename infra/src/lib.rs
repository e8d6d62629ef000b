//! # Infrastructure Layer
//!
//! Concrete implementations of the ports defined in `ap_core`:
//! - **Database**: MySQL repositories using SQLx
//! - **Storage**: local filesystem and Supabase bucket document storage
//! - **Services**: rate limit counters (memory, Redis) and link delivery
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)
//! - `redis-cache`: Enable the Redis rate limit backend (default)

// Re-export core types for convenience
pub use ap_core::errors::*;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Document storage backends
pub mod storage;

/// Services module - Infrastructure service implementations
pub mod services;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Database migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Redis error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
