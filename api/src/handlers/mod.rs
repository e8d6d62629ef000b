pub mod error;

pub use error::{
    handle_domain_error, handle_token_route_error, internal_error, invalid_or_expired, validation_failed,
};
