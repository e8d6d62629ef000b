//! Mock implementation of PasswordResetRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::password_reset::PasswordResetToken;
use crate::errors::DomainError;

use super::r#trait::PasswordResetRepository;

pub struct MockPasswordResetRepository {
    tokens: Arc<RwLock<HashMap<Uuid, PasswordResetToken>>>,
}

impl MockPasswordResetRepository {
    pub fn new() -> Self {
        Self {
            tokens: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn insert(&self, token: PasswordResetToken) {
        self.tokens.write().await.insert(token.id, token);
    }

    pub async fn get(&self, id: Uuid) -> Option<PasswordResetToken> {
        self.tokens.read().await.get(&id).cloned()
    }

    pub async fn tokens_for_user(&self, user_id: i64) -> Vec<PasswordResetToken> {
        self.tokens
            .read()
            .await
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect()
    }
}

impl Default for MockPasswordResetRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PasswordResetRepository for MockPasswordResetRepository {
    async fn create(&self, token: PasswordResetToken) -> Result<PasswordResetToken, DomainError> {
        let mut tokens = self.tokens.write().await;
        if tokens.values().any(|t| t.token_hash == token.token_hash) {
            return Err(DomainError::Validation {
                message: "Token already exists".to_string(),
            });
        }
        tokens.insert(token.id, token.clone());
        Ok(token)
    }

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<PasswordResetToken>, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens.values().find(|t| t.token_hash == token_hash).cloned())
    }

    async fn claim(&self, id: Uuid, used_at: DateTime<Utc>) -> Result<bool, DomainError> {
        let mut tokens = self.tokens.write().await;
        match tokens.get_mut(&id) {
            Some(token) if token.used_at.is_none() => {
                token.used_at = Some(used_at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn invalidate_for_user(&self, user_id: i64, used_at: DateTime<Utc>) -> Result<usize, DomainError> {
        let mut tokens = self.tokens.write().await;
        let mut count = 0;
        for token in tokens
            .values_mut()
            .filter(|t| t.user_id == user_id && t.used_at.is_none())
        {
            token.used_at = Some(used_at);
            count += 1;
        }
        Ok(count)
    }

    async fn delete_stale(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, t| t.is_usable_at(now));
        Ok(before - tokens.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_claim_succeeds_once() {
        let repo = MockPasswordResetRepository::new();
        let token = repo
            .create(PasswordResetToken::new(1, "hash".to_string(), 2))
            .await
            .unwrap();

        assert!(repo.claim(token.id, Utc::now()).await.unwrap());
        assert!(!repo.claim(token.id, Utc::now()).await.unwrap());
    }

    #[tokio::test]
    async fn test_invalidate_for_user_only_touches_that_user() {
        let repo = MockPasswordResetRepository::new();
        repo.create(PasswordResetToken::new(1, "a".to_string(), 2)).await.unwrap();
        repo.create(PasswordResetToken::new(1, "b".to_string(), 2)).await.unwrap();
        let other = repo.create(PasswordResetToken::new(2, "c".to_string(), 2)).await.unwrap();

        assert_eq!(repo.invalidate_for_user(1, Utc::now()).await.unwrap(), 2);
        assert!(repo.get(other.id).await.unwrap().used_at.is_none());
    }
}
