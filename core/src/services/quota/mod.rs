//! Upload quotas per file, per request and per application.
//!
//! `QuotaService::check_quota` judges a batch whose sizes are known up front.
//! `UploadSession` applies the same budgets while bytes are still arriving,
//! so an oversized body is refused before it is fully read.

mod service;
mod session;

#[cfg(test)]
mod tests;

pub use service::{IncomingFile, QuotaService};
pub use session::{FileBudget, UploadSession};
