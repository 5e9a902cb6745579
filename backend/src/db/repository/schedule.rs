//! Schedule repository trait.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::error::RepositoryResult;
use crate::models::{Schedule, ScheduleId, UserId};

/// Repository trait for schedule storage.
///
/// Each call is independent; implementations do not offer transactions that
/// span several calls.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    /// Check if the storage backend is healthy.
    ///
    /// # Returns
    /// - `Ok(true)` if the backend is healthy
    /// - `Ok(false)` if it is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if an error occurred during the check
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Retrieve a schedule by ID.
    ///
    /// # Returns
    /// * `Ok(Schedule)` - The stored schedule
    /// * `Err(RepositoryError::NotFound)` - If the schedule doesn't exist
    /// * `Err(RepositoryError)` - If the operation fails
    async fn get_schedule(&self, schedule_id: &ScheduleId) -> RepositoryResult<Schedule>;

    /// All schedules owned by `owner_id`, in storage order.
    async fn list_schedules_by_owner(&self, owner_id: &UserId) -> RepositoryResult<Vec<Schedule>>;

    /// Schedules owned by `owner_id` whose start falls on `date`, in storage order.
    async fn list_schedules_by_owner_and_date(
        &self,
        owner_id: &UserId,
        date: NaiveDate,
    ) -> RepositoryResult<Vec<Schedule>>;

    /// Persist a new schedule.
    ///
    /// # Returns
    /// * `Err(RepositoryError::ValidationError)` - If the ID is already taken
    async fn create_schedule(&self, schedule: &Schedule) -> RepositoryResult<()>;

    /// Replace a stored schedule.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If no schedule has this ID
    async fn update_schedule(&self, schedule: &Schedule) -> RepositoryResult<()>;

    /// Delete a schedule by ID.
    ///
    /// # Returns
    /// * `Ok(true)` - A schedule was removed
    /// * `Ok(false)` - No schedule had this ID
    async fn delete_schedule(&self, schedule_id: &ScheduleId) -> RepositoryResult<bool>;
}
