//! Outbound delivery of magic links and password reset links.

mod traits;

pub use traits::{LinkDeliveryTrait, MagicLinkMessage, PasswordResetMessage};

#[cfg(any(test, feature = "test-utils"))]
mod mock;
#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockLinkDelivery;
