//! Subject repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{Subject, SubjectId, UserId};

#[async_trait]
pub trait SubjectRepository: Send + Sync {
    /// All subjects owned by `owner_id`, in storage order.
    async fn list_subjects_by_owner(&self, owner_id: &UserId) -> RepositoryResult<Vec<Subject>>;

    /// Retrieve a subject by ID, `RepositoryError::NotFound` if absent.
    async fn get_subject(&self, subject_id: &SubjectId) -> RepositoryResult<Subject>;

    async fn create_subject(&self, subject: &Subject) -> RepositoryResult<()>;

    /// Delete a subject by ID. `Ok(false)` when nothing was removed.
    async fn delete_subject(&self, subject_id: &SubjectId) -> RepositoryResult<bool>;
}
