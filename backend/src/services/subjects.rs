//! Per-owner subject bookkeeping.

use log::{info, warn};

use super::error::{ScheduleError, ServiceResult};
use crate::db::repository::SubjectRepository;
use crate::models::{now, Subject, SubjectId, UserId};

pub struct SubjectService<'a, R: SubjectRepository + ?Sized> {
    repository: &'a R,
}

impl<'a, R: SubjectRepository + ?Sized> SubjectService<'a, R> {
    pub fn new(repository: &'a R) -> Self {
        Self { repository }
    }

    /// Subjects of `owner_id`, oldest first.
    pub async fn list(&self, owner_id: &UserId) -> ServiceResult<Vec<Subject>> {
        Ok(self.repository.list_subjects_by_owner(owner_id).await?)
    }

    pub async fn create(
        &self,
        owner_id: UserId,
        name: String,
        color: String,
    ) -> ServiceResult<Subject> {
        let stamp = now();
        let subject = Subject {
            id: SubjectId::generate(),
            owner_id,
            name,
            color,
            created_at: stamp,
            updated_at: stamp,
        };
        self.repository.create_subject(&subject).await?;
        info!("Created subject {} for {}", subject.id, subject.owner_id);
        Ok(subject)
    }

    pub async fn get_owned(&self, subject_id: &SubjectId, caller: &UserId) -> ServiceResult<Subject> {
        let subject = self
            .repository
            .get_subject(subject_id)
            .await
            .map_err(|e| ScheduleError::from_read("subject", subject_id, e))?;
        if &subject.owner_id != caller {
            warn!("User {} tried to access subject {}", caller, subject_id);
            return Err(ScheduleError::Forbidden);
        }
        Ok(subject)
    }

    pub async fn delete(&self, subject_id: &SubjectId) -> ServiceResult<()> {
        if !self.repository.delete_subject(subject_id).await? {
            return Err(ScheduleError::not_found("subject", subject_id));
        }
        info!("Deleted subject {}", subject_id);
        Ok(())
    }

    pub async fn delete_owned(&self, subject_id: &SubjectId, caller: &UserId) -> ServiceResult<()> {
        self.get_owned(subject_id, caller).await?;
        self.delete(subject_id).await
    }
}
