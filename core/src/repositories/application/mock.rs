//! Mock implementation of ApplicationRepository for testing

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::application::{Application, Candidate};
use crate::errors::DomainError;

use super::r#trait::ApplicationRepository;

pub struct MockApplicationRepository {
    applications: Arc<RwLock<HashMap<i64, Application>>>,
    candidates: Arc<RwLock<HashMap<i64, Candidate>>>,
}

impl MockApplicationRepository {
    pub fn new() -> Self {
        Self {
            applications: Arc::new(RwLock::new(HashMap::new())),
            candidates: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn add_application(&self, application: Application) {
        self.applications.write().await.insert(application.id, application);
    }

    pub async fn add_candidate(&self, candidate: Candidate) {
        self.candidates.write().await.insert(candidate.id, candidate);
    }

    /// Seed an application with a candidate using the same id for both
    pub async fn seed(&self, id: i64, candidate_email: Option<&str>) -> Application {
        let application = Application {
            id,
            candidate_id: id,
            job_id: 1,
            reference_number: Some(format!("BW-{:04}", id)),
            job_title: Some("Software Engineer".to_string()),
            created_at: Utc::now(),
        };
        self.add_candidate(Candidate {
            id,
            name: format!("Candidate {}", id),
            email: candidate_email.map(str::to_string),
        })
        .await;
        self.add_application(application.clone()).await;
        application
    }
}

impl Default for MockApplicationRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ApplicationRepository for MockApplicationRepository {
    async fn find_application(&self, id: i64) -> Result<Option<Application>, DomainError> {
        Ok(self.applications.read().await.get(&id).cloned())
    }

    async fn find_candidate(&self, id: i64) -> Result<Option<Candidate>, DomainError> {
        Ok(self.candidates.read().await.get(&id).cloned())
    }
}
