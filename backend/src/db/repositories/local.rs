//! In-memory local repository implementation.
//!
//! This module provides a local implementation of all repository traits
//! suitable for unit testing and local development. Records live in
//! `HashMap`s tagged with an insertion sequence so listings come back in
//! storage order, which keeps results deterministic.

use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::db::repository::*;
use crate::models::{Schedule, ScheduleId, Subject, SubjectId, UserId};

/// In-memory local repository.
///
/// Cloning is cheap and every clone shares the same storage.
///
/// # Example
/// ```
/// use attendance_plan::db::repositories::LocalRepository;
/// use attendance_plan::db::repository::ScheduleRepository;
/// use attendance_plan::models::UserId;
///
/// let repo = LocalRepository::new();
/// let runtime = tokio::runtime::Runtime::new().unwrap();
/// let schedules = runtime
///     .block_on(repo.list_schedules_by_owner(&UserId::new("user-1")))
///     .unwrap();
/// assert!(schedules.is_empty());
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    schedules: HashMap<ScheduleId, (u64, Schedule)>,
    subjects: HashMap<SubjectId, (u64, Subject)>,

    // Insertion counter shared by every table
    next_seq: u64,

    // Fault injection
    is_healthy: bool,
    is_writable: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            schedules: HashMap::new(),
            subjects: HashMap::new(),
            next_seq: 1,
            is_healthy: true,
            is_writable: true,
        }
    }
}

impl LocalData {
    fn take_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

fn in_storage_order<T: Clone>(mut rows: Vec<&(u64, T)>) -> Vec<T> {
    rows.sort_by_key(|(seq, _)| *seq);
    rows.into_iter().map(|(_, row)| row.clone()).collect()
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Set the health status for testing connection failures.
    ///
    /// An unhealthy repository fails every read and write with a connection error.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Allow or reject writes, for testing persistence failures while reads succeed.
    pub fn set_writable(&self, writable: bool) {
        self.data.write().is_writable = writable;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            is_writable: data.is_writable,
            ..Default::default()
        };
    }

    /// Get the number of schedules stored.
    pub fn schedule_count(&self) -> usize {
        self.data.read().schedules.len()
    }

    /// Check if a schedule exists.
    pub fn has_schedule(&self, schedule_id: &ScheduleId) -> bool {
        self.data.read().schedules.contains_key(schedule_id)
    }

    /// Get the number of subjects stored.
    pub fn subject_count(&self) -> usize {
        self.data.read().subjects.len()
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self, operation: &str) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::connection_with_context(
                "Repository is not healthy",
                ErrorContext::new(operation),
            ));
        }
        Ok(())
    }

    /// Helper to check that writes are accepted.
    fn check_writable(&self, operation: &str) -> RepositoryResult<()> {
        self.check_health(operation)?;
        if !self.data.read().is_writable {
            return Err(RepositoryError::query_with_context(
                "Repository rejected the write",
                ErrorContext::new(operation),
            ));
        }
        Ok(())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScheduleRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn get_schedule(&self, schedule_id: &ScheduleId) -> RepositoryResult<Schedule> {
        self.check_health("get_schedule")?;
        let data = self.data.read();
        data.schedules
            .get(schedule_id)
            .map(|(_, schedule)| schedule.clone())
            .ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    format!("Schedule {} not found", schedule_id),
                    ErrorContext::new("get_schedule")
                        .with_entity("schedule")
                        .with_entity_id(schedule_id),
                )
            })
    }

    async fn list_schedules_by_owner(&self, owner_id: &UserId) -> RepositoryResult<Vec<Schedule>> {
        self.check_health("list_schedules_by_owner")?;
        let data = self.data.read();
        let rows = data
            .schedules
            .values()
            .filter(|(_, s)| &s.owner_id == owner_id)
            .collect();
        Ok(in_storage_order(rows))
    }

    async fn list_schedules_by_owner_and_date(
        &self,
        owner_id: &UserId,
        date: NaiveDate,
    ) -> RepositoryResult<Vec<Schedule>> {
        self.check_health("list_schedules_by_owner_and_date")?;
        let data = self.data.read();
        let rows = data
            .schedules
            .values()
            .filter(|(_, s)| &s.owner_id == owner_id && s.start_date() == date)
            .collect();
        Ok(in_storage_order(rows))
    }

    async fn create_schedule(&self, schedule: &Schedule) -> RepositoryResult<()> {
        self.check_writable("create_schedule")?;
        let mut data = self.data.write();
        if data.schedules.contains_key(&schedule.id) {
            return Err(RepositoryError::validation_with_context(
                format!("Schedule {} already exists", schedule.id),
                ErrorContext::new("create_schedule")
                    .with_entity("schedule")
                    .with_entity_id(&schedule.id),
            ));
        }
        let seq = data.take_seq();
        data.schedules
            .insert(schedule.id.clone(), (seq, schedule.clone()));
        debug!("Stored schedule {} (seq {})", schedule.id, seq);
        Ok(())
    }

    async fn update_schedule(&self, schedule: &Schedule) -> RepositoryResult<()> {
        self.check_writable("update_schedule")?;
        let mut data = self.data.write();
        match data.schedules.get_mut(&schedule.id) {
            Some((_, stored)) => {
                *stored = schedule.clone();
                Ok(())
            }
            None => Err(RepositoryError::not_found_with_context(
                format!("Schedule {} not found", schedule.id),
                ErrorContext::new("update_schedule")
                    .with_entity("schedule")
                    .with_entity_id(&schedule.id),
            )),
        }
    }

    async fn delete_schedule(&self, schedule_id: &ScheduleId) -> RepositoryResult<bool> {
        self.check_writable("delete_schedule")?;
        Ok(self.data.write().schedules.remove(schedule_id).is_some())
    }
}

#[async_trait]
impl SubjectRepository for LocalRepository {
    async fn list_subjects_by_owner(&self, owner_id: &UserId) -> RepositoryResult<Vec<Subject>> {
        self.check_health("list_subjects_by_owner")?;
        let data = self.data.read();
        let rows = data
            .subjects
            .values()
            .filter(|(_, s)| &s.owner_id == owner_id)
            .collect();
        Ok(in_storage_order(rows))
    }

    async fn get_subject(&self, subject_id: &SubjectId) -> RepositoryResult<Subject> {
        self.check_health("get_subject")?;
        let data = self.data.read();
        data.subjects
            .get(subject_id)
            .map(|(_, subject)| subject.clone())
            .ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    format!("Subject {} not found", subject_id),
                    ErrorContext::new("get_subject")
                        .with_entity("subject")
                        .with_entity_id(subject_id),
                )
            })
    }

    async fn create_subject(&self, subject: &Subject) -> RepositoryResult<()> {
        self.check_writable("create_subject")?;
        let mut data = self.data.write();
        if data.subjects.contains_key(&subject.id) {
            return Err(RepositoryError::validation_with_context(
                format!("Subject {} already exists", subject.id),
                ErrorContext::new("create_subject")
                    .with_entity("subject")
                    .with_entity_id(&subject.id),
            ));
        }
        let seq = data.take_seq();
        data.subjects.insert(subject.id.clone(), (seq, subject.clone()));
        Ok(())
    }

    async fn delete_subject(&self, subject_id: &SubjectId) -> RepositoryResult<bool> {
        self.check_writable("delete_subject")?;
        Ok(self.data.write().subjects.remove(subject_id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{parse_date, parse_date_time, Order, ScheduleType};

    fn schedule(id: &str, owner: &str, starts_at: &str) -> Schedule {
        let at = parse_date_time(starts_at).unwrap();
        Schedule {
            id: ScheduleId::new(id),
            owner_id: UserId::new(owner),
            name: id.to_string(),
            starts_at: at,
            ends_at: at,
            color: "green".to_string(),
            schedule_type: ScheduleType::Master,
            order: Order::new(1),
            created_at: at,
            updated_at: at,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = LocalRepository::new();
        let s = schedule("s1", "u1", "2024-04-01 10:00:00");
        repo.create_schedule(&s).await.unwrap();
        assert_eq!(repo.get_schedule(&s.id).await.unwrap(), s);
        assert_eq!(repo.schedule_count(), 1);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let repo = LocalRepository::new();
        let err = repo.get_schedule(&ScheduleId::new("nope")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_duplicate_create_rejected() {
        let repo = LocalRepository::new();
        let s = schedule("s1", "u1", "2024-04-01 10:00:00");
        repo.create_schedule(&s).await.unwrap();
        let err = repo.create_schedule(&s).await.unwrap_err();
        assert!(matches!(err, RepositoryError::ValidationError { .. }));
    }

    #[tokio::test]
    async fn test_listing_keeps_storage_order() {
        let repo = LocalRepository::new();
        for id in ["c", "a", "b"] {
            repo.create_schedule(&schedule(id, "u1", "2024-04-01 10:00:00"))
                .await
                .unwrap();
        }
        let ids: Vec<String> = repo
            .list_schedules_by_owner(&UserId::new("u1"))
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id.0)
            .collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_list_by_owner_and_date() {
        let repo = LocalRepository::new();
        repo.create_schedule(&schedule("a", "u1", "2024-04-01 00:00:00"))
            .await
            .unwrap();
        repo.create_schedule(&schedule("b", "u1", "2024-04-01 23:59:59"))
            .await
            .unwrap();
        repo.create_schedule(&schedule("c", "u1", "2024-04-02 00:00:00"))
            .await
            .unwrap();
        repo.create_schedule(&schedule("d", "u2", "2024-04-01 12:00:00"))
            .await
            .unwrap();

        let found = repo
            .list_schedules_by_owner_and_date(&UserId::new("u1"), parse_date("2024-04-01").unwrap())
            .await
            .unwrap();
        let ids: Vec<&str> = found.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = LocalRepository::new();
        let err = repo
            .update_schedule(&schedule("ghost", "u1", "2024-04-01 10:00:00"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_reports_removal() {
        let repo = LocalRepository::new();
        let s = schedule("s1", "u1", "2024-04-01 10:00:00");
        repo.create_schedule(&s).await.unwrap();
        assert!(repo.delete_schedule(&s.id).await.unwrap());
        assert!(!repo.delete_schedule(&s.id).await.unwrap());
        assert!(!repo.has_schedule(&s.id));
    }

    #[tokio::test]
    async fn test_unhealthy_repository_fails_reads() {
        let repo = LocalRepository::new();
        repo.set_healthy(false);
        assert!(!repo.health_check().await.unwrap());
        let err = repo
            .list_schedules_by_owner(&UserId::new("u1"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::ConnectionError { .. }));
        assert!(err.to_string().contains("operation=list_schedules_by_owner"));
    }

    #[tokio::test]
    async fn test_read_only_repository_fails_writes() {
        let repo = LocalRepository::new();
        repo.set_writable(false);
        let err = repo
            .create_schedule(&schedule("s1", "u1", "2024-04-01 10:00:00"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::QueryError { .. }));
        assert!(repo
            .list_schedules_by_owner(&UserId::new("u1"))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_clear_keeps_fault_flags() {
        let repo = LocalRepository::new();
        repo.create_schedule(&schedule("s1", "u1", "2024-04-01 10:00:00"))
            .await
            .unwrap();
        repo.set_writable(false);
        repo.clear();
        assert_eq!(repo.schedule_count(), 0);
        assert!(repo
            .delete_schedule(&ScheduleId::new("s1"))
            .await
            .is_err());
    }
}
