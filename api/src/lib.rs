//! # Applicant Portal API
//!
//! actix-web layer of the applicant portal: internal magic link endpoints,
//! the candidate upload portal reached through a magic link, and the
//! password reset flow. Handlers translate domain errors into JSON responses
//! and never see raw token hashes.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use app::create_app;
pub use state::{AppState, HttpSettings};
