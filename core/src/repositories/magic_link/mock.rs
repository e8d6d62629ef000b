//! Mock implementation of MagicLinkRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::magic_link::MagicLinkToken;
use crate::errors::DomainError;

use super::r#trait::MagicLinkRepository;

/// Mock magic link repository keyed by token id
pub struct MockMagicLinkRepository {
    tokens: Arc<RwLock<HashMap<Uuid, MagicLinkToken>>>,
}

impl MockMagicLinkRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            tokens: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert or replace a token directly, bypassing duplicate checks
    pub async fn insert(&self, token: MagicLinkToken) {
        self.tokens.write().await.insert(token.id, token);
    }

    /// Snapshot of a stored token
    pub async fn get(&self, id: Uuid) -> Option<MagicLinkToken> {
        self.tokens.read().await.get(&id).cloned()
    }

    /// All tokens of an application
    pub async fn tokens_for_application(&self, application_id: i64) -> Vec<MagicLinkToken> {
        self.tokens
            .read()
            .await
            .values()
            .filter(|t| t.application_id == application_id)
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }
}

impl Default for MockMagicLinkRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MagicLinkRepository for MockMagicLinkRepository {
    async fn create(&self, token: MagicLinkToken) -> Result<MagicLinkToken, DomainError> {
        let mut tokens = self.tokens.write().await;

        // Check for duplicate
        if tokens.values().any(|t| t.token_hash == token.token_hash) {
            return Err(DomainError::Validation {
                message: "Token already exists".to_string(),
            });
        }

        tokens.insert(token.id, token.clone());
        Ok(token)
    }

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<MagicLinkToken>, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens.values().find(|t| t.token_hash == token_hash).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<MagicLinkToken>, DomainError> {
        Ok(self.tokens.read().await.get(&id).cloned())
    }

    async fn increment_fail_count(&self, id: Uuid) -> Result<i32, DomainError> {
        let mut tokens = self.tokens.write().await;
        let token = tokens.get_mut(&id).ok_or_else(|| DomainError::NotFound {
            resource: format!("magic link {}", id),
        })?;
        token.fail_count += 1;
        Ok(token.fail_count)
    }

    async fn mark_used(&self, id: Uuid, used_at: DateTime<Utc>) -> Result<(), DomainError> {
        if let Some(token) = self.tokens.write().await.get_mut(&id) {
            token.last_used_at = Some(used_at);
        }
        Ok(())
    }

    async fn revoke(&self, id: Uuid, revoked_at: DateTime<Utc>) -> Result<bool, DomainError> {
        let mut tokens = self.tokens.write().await;
        match tokens.get_mut(&id) {
            Some(token) if token.revoked_at.is_none() => {
                token.revoked_at = Some(revoked_at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn revoke_for_application(
        &self,
        application_id: i64,
        revoked_at: DateTime<Utc>,
    ) -> Result<usize, DomainError> {
        let mut tokens = self.tokens.write().await;
        let mut count = 0;
        for token in tokens
            .values_mut()
            .filter(|t| t.application_id == application_id && t.revoked_at.is_none())
        {
            token.revoked_at = Some(revoked_at);
            count += 1;
        }
        Ok(count)
    }

    async fn delete_stale(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, t| !t.is_stale_at(now));
        Ok(before - tokens.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn token(application_id: i64, hash: &str) -> MagicLinkToken {
        MagicLinkToken::new(application_id, hash.to_string(), "upload_documents", 72)
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_hash() {
        let repo = MockMagicLinkRepository::new();
        repo.create(token(1, "h1")).await.unwrap();
        assert!(repo.create(token(2, "h1")).await.is_err());
    }

    #[tokio::test]
    async fn test_increment_fail_count_returns_new_value() {
        let repo = MockMagicLinkRepository::new();
        let saved = repo.create(token(1, "h1")).await.unwrap();

        assert_eq!(repo.increment_fail_count(saved.id).await.unwrap(), 1);
        assert_eq!(repo.increment_fail_count(saved.id).await.unwrap(), 2);
        assert!(repo.increment_fail_count(Uuid::new_v4()).await.is_err());
    }

    #[tokio::test]
    async fn test_revoke_is_idempotent() {
        let repo = MockMagicLinkRepository::new();
        let saved = repo.create(token(1, "h1")).await.unwrap();

        assert!(repo.revoke(saved.id, Utc::now()).await.unwrap());
        assert!(!repo.revoke(saved.id, Utc::now()).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_stale_removes_expired_and_revoked() {
        let repo = MockMagicLinkRepository::new();
        let live = repo.create(token(1, "live")).await.unwrap();

        let mut expired = token(1, "expired");
        expired.expires_at = Utc::now() - Duration::hours(1);
        repo.insert(expired).await;

        let revoked = repo.create(token(2, "revoked")).await.unwrap();
        repo.revoke(revoked.id, Utc::now()).await.unwrap();

        assert_eq!(repo.delete_stale(Utc::now()).await.unwrap(), 2);
        assert!(repo.get(live.id).await.is_some());
        assert_eq!(repo.len().await, 1);
    }
}
