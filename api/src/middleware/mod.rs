pub mod client;
pub mod cors;
pub mod internal_auth;
pub mod security;

pub use client::request_context;
pub use cors::create_cors;
pub use internal_auth::InternalAuth;
pub use security::SecurityHeaders;
