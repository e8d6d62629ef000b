//! Token services for magic links and password resets
//!
//! This module handles:
//! - Raw token generation and keyed hashing
//! - Magic link issuance, presentation, locking and revocation
//! - Sending and resending upload links
//! - Single-use password reset links
//! - Background cleanup of expired rows

mod cleanup;
mod config;
mod dispatch;
mod hasher;
mod password_reset;
mod service;

#[cfg(test)]
mod tests;

pub use cleanup::{CleanupResult, TokenCleanupService};
pub use config::{MagicLinkServiceConfig, PasswordResetServiceConfig, TokenCleanupConfig};
pub use dispatch::{DispatchedLink, LinkDispatchService};
pub use hasher::{TokenHasher, TOKEN_BYTES};
pub use password_reset::PasswordResetService;
pub use service::{IssuedMagicLink, MagicLinkService};
