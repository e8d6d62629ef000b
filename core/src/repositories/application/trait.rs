//! Read access to applications and candidates owned by the recruiting workflow.

use async_trait::async_trait;

use crate::domain::entities::application::{Application, Candidate};
use crate::errors::DomainError;

#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Find an application by ID
    async fn find_application(&self, id: i64) -> Result<Option<Application>, DomainError>;

    /// Find a candidate by ID
    async fn find_candidate(&self, id: i64) -> Result<Option<Candidate>, DomainError>;
}
