//! Value objects representing immutable domain concepts.

pub mod request_context;

// Re-export commonly used types
pub use request_context::RequestContext;
