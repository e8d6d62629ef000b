//! Mock implementation of UserRepository for testing

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::user::{User, UserRole};
use crate::errors::DomainError;

use super::r#trait::UserRepository;

pub struct MockUserRepository {
    users: Arc<RwLock<HashMap<i64, User>>>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Seed an active recruiter account
    pub async fn seed(&self, id: i64, email: &str) -> User {
        let user = User {
            id,
            email: User::normalize_email(email),
            password_hash: "$2b$12$placeholder".to_string(),
            role: UserRole::Recruiter,
            is_active: true,
            updated_at: Utc::now(),
        };
        self.users.write().await.insert(id, user.clone());
        user
    }

    pub async fn insert(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }

    pub async fn get(&self, id: i64) -> Option<User> {
        self.users.read().await.get(&id).cloned()
    }
}

impl Default for MockUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let email = User::normalize_email(email);
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn update_password_hash(&self, user_id: i64, password_hash: &str) -> Result<(), DomainError> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&user_id).ok_or_else(|| DomainError::NotFound {
            resource: format!("user {}", user_id),
        })?;
        user.password_hash = password_hash.to_string();
        user.updated_at = Utc::now();
        Ok(())
    }
}
