//! Generation and keyed hashing of raw link tokens.

use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;

use crate::errors::{DomainError, DomainResult, TokenError};

type HmacSha256 = Hmac<Sha256>;

/// Random bytes behind every raw token
pub const TOKEN_BYTES: usize = 32;

/// HMAC-SHA256 keyed with a server secret
///
/// Only `hash(token)` is ever persisted, so a leaked table cannot be turned
/// back into working links without the key.
#[derive(Clone)]
pub struct TokenHasher {
    secret: Vec<u8>,
}

impl TokenHasher {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
        }
    }

    /// 32 random bytes from the OS, URL-safe base64 without padding
    pub fn generate_token() -> Result<String, TokenError> {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|_| TokenError::GenerationFailed)?;
        Ok(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Hex encoded HMAC of the raw token
    pub fn hash(&self, token: &str) -> DomainResult<String> {
        let mut mac = HmacSha256::new_from_slice(&self.secret).map_err(|e| DomainError::Internal {
            message: format!("Invalid HMAC key: {}", e),
        })?;
        mac.update(token.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

impl fmt::Debug for TokenHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenHasher").field("secret", &"[redacted]").finish()
    }
}
