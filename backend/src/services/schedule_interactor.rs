//! Schedule use cases: calendar listing, single and bulk writes, deletion.
//!
//! The interactor works against any [`ScheduleRepository`] and owns the two
//! rules storage does not know about: display order assignment and the
//! date/type grouping of the calendar view.
//!
//! # Consistency
//!
//! * Auto-assigned orders are computed with a read followed by a write. Two
//!   concurrent creates for the same owner, date and type can therefore end up
//!   with the same order. Nothing detects or repairs this.
//! * Bulk operations stop at the first failing item and report its index.
//!   Items processed before it are already persisted and are not rolled back.

use chrono::{DateTime, NaiveDate, Utc};
use log::{error, info, warn};
use serde::Serialize;

use super::error::{ScheduleError, ServiceResult};
use crate::db::repository::{RepositoryError, ScheduleRepository};
use crate::models::{
    now, parse_date_time, DateItemList, Order, Schedule, ScheduleId, ScheduleList, ScheduleType,
    UserId,
};

/// Input of the create path. Dates are still in wire format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSchedule {
    pub owner_id: UserId,
    pub name: String,
    pub starts_at: String,
    pub ends_at: String,
    pub color: String,
    pub schedule_type: ScheduleType,
    /// `None` or [`Order::UNASSIGNED`] requests automatic assignment.
    pub order: Option<Order>,
}

/// Input of the update path. The order is stored as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleUpdate {
    pub id: ScheduleId,
    pub name: String,
    pub starts_at: String,
    pub ends_at: String,
    pub color: String,
    pub schedule_type: ScheduleType,
    pub order: Order,
}

/// Calendar view of one owner, split by schedule type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScheduleListView {
    pub master_schedules: DateItemList,
    pub custom_schedules: DateItemList,
}

pub struct ScheduleInteractor<'a, R: ScheduleRepository + ?Sized> {
    repository: &'a R,
}

impl<'a, R: ScheduleRepository + ?Sized> ScheduleInteractor<'a, R> {
    pub fn new(repository: &'a R) -> Self {
        Self { repository }
    }

    /// Every schedule of `owner_id`, grouped per day and type.
    pub async fn get_list(&self, owner_id: &UserId) -> ServiceResult<ScheduleListView> {
        let schedules: ScheduleList = self
            .repository
            .list_schedules_by_owner(owner_id)
            .await
            .map_err(|e| storage_failure("list schedules", e))?
            .into();

        let mut by_type = schedules.to_date_item_list().to_type_map();
        Ok(ScheduleListView {
            master_schedules: by_type.remove(&ScheduleType::Master).unwrap_or_default(),
            custom_schedules: by_type.remove(&ScheduleType::Custom).unwrap_or_default(),
        })
    }

    pub async fn get_one(&self, schedule_id: &ScheduleId) -> ServiceResult<Schedule> {
        self.repository
            .get_schedule(schedule_id)
            .await
            .map_err(|e| read_failure(schedule_id, e))
    }

    /// Like [`get_one`](Self::get_one), but [`ScheduleError::Forbidden`] when
    /// `caller` does not own the schedule.
    pub async fn get_owned(
        &self,
        schedule_id: &ScheduleId,
        caller: &UserId,
    ) -> ServiceResult<Schedule> {
        let schedule = self.get_one(schedule_id).await?;
        if &schedule.owner_id != caller {
            warn!(
                "User {} tried to access schedule {} owned by {}",
                caller, schedule_id, schedule.owner_id
            );
            return Err(ScheduleError::Forbidden);
        }
        Ok(schedule)
    }

    pub async fn create(&self, input: NewSchedule) -> ServiceResult<Schedule> {
        let starts_at = parse_field(&input.starts_at, "starts_at")?;
        let ends_at = parse_field(&input.ends_at, "ends_at")?;

        let order = match input.order {
            Some(order) if !order.is_empty() => order,
            _ => {
                self.next_order(&input.owner_id, starts_at.date_naive(), input.schedule_type)
                    .await?
            }
        };

        let stamp = now();
        let schedule = Schedule {
            id: ScheduleId::generate(),
            owner_id: input.owner_id,
            name: input.name,
            starts_at,
            ends_at,
            color: input.color,
            schedule_type: input.schedule_type,
            order,
            created_at: stamp,
            updated_at: stamp,
        };

        self.repository
            .create_schedule(&schedule)
            .await
            .map_err(|e| storage_failure("create schedule", e))?;

        info!(
            "Created {} schedule {} for {} with order {}",
            schedule.schedule_type, schedule.id, schedule.owner_id, schedule.order
        );
        Ok(schedule)
    }

    pub async fn update(&self, update: ScheduleUpdate) -> ServiceResult<Schedule> {
        self.apply_update(update, None).await
    }

    /// Update on behalf of `caller`, who must own the schedule.
    pub async fn update_owned(
        &self,
        update: ScheduleUpdate,
        caller: &UserId,
    ) -> ServiceResult<Schedule> {
        self.apply_update(update, Some(caller)).await
    }

    /// Create every item in order, stopping at the first failure.
    pub async fn create_bulk(&self, items: Vec<NewSchedule>) -> ServiceResult<Vec<Schedule>> {
        let mut created = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            match self.create(item).await {
                Ok(schedule) => created.push(schedule),
                Err(cause) => return Err(bulk_aborted("create", index, created.len(), cause)),
            }
        }
        Ok(created)
    }

    /// Update every item in order, stopping at the first failure.
    pub async fn update_bulk(&self, items: Vec<ScheduleUpdate>) -> ServiceResult<Vec<Schedule>> {
        self.apply_update_bulk(items, None).await
    }

    /// Bulk update on behalf of `caller`, who must own every item.
    pub async fn update_bulk_owned(
        &self,
        items: Vec<ScheduleUpdate>,
        caller: &UserId,
    ) -> ServiceResult<Vec<Schedule>> {
        self.apply_update_bulk(items, Some(caller)).await
    }

    /// Remove a schedule. [`ScheduleError::NotFound`] if nothing was removed.
    pub async fn delete(&self, schedule_id: &ScheduleId) -> ServiceResult<()> {
        let removed = self
            .repository
            .delete_schedule(schedule_id)
            .await
            .map_err(|e| storage_failure("delete schedule", e))?;

        if !removed {
            warn!("Schedule {} not found for deletion", schedule_id);
            return Err(ScheduleError::not_found("schedule", schedule_id));
        }
        info!("Deleted schedule {}", schedule_id);
        Ok(())
    }

    pub async fn delete_owned(&self, schedule_id: &ScheduleId, caller: &UserId) -> ServiceResult<()> {
        self.get_owned(schedule_id, caller).await?;
        self.delete(schedule_id).await
    }

    async fn next_order(
        &self,
        owner_id: &UserId,
        date: NaiveDate,
        schedule_type: ScheduleType,
    ) -> ServiceResult<Order> {
        let same_day: ScheduleList = self
            .repository
            .list_schedules_by_owner_and_date(owner_id, date)
            .await
            .map_err(|e| storage_failure("list sibling schedules", e))?
            .into();
        Ok(same_day.filter_by_type(schedule_type).next_order())
    }

    async fn apply_update(
        &self,
        update: ScheduleUpdate,
        caller: Option<&UserId>,
    ) -> ServiceResult<Schedule> {
        let starts_at = parse_field(&update.starts_at, "starts_at")?;
        let ends_at = parse_field(&update.ends_at, "ends_at")?;

        let existing = match caller {
            Some(caller) => self.get_owned(&update.id, caller).await?,
            None => self.get_one(&update.id).await?,
        };

        let schedule = Schedule {
            name: update.name,
            starts_at,
            ends_at,
            color: update.color,
            schedule_type: update.schedule_type,
            order: update.order,
            updated_at: now(),
            ..existing
        };

        self.repository
            .update_schedule(&schedule)
            .await
            .map_err(|e| match e {
                e if e.is_not_found() => read_failure(&schedule.id, e),
                e => storage_failure("update schedule", e),
            })?;

        info!("Updated schedule {}", schedule.id);
        self.get_one(&schedule.id).await
    }

    async fn apply_update_bulk(
        &self,
        items: Vec<ScheduleUpdate>,
        caller: Option<&UserId>,
    ) -> ServiceResult<Vec<Schedule>> {
        let mut updated = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            match self.apply_update(item, caller).await {
                Ok(schedule) => updated.push(schedule),
                Err(cause) => return Err(bulk_aborted("update", index, updated.len(), cause)),
            }
        }
        Ok(updated)
    }
}

fn parse_field(value: &str, field: &'static str) -> ServiceResult<DateTime<Utc>> {
    parse_date_time(value).map_err(|e| {
        warn!("Invalid {} '{}': {}", field, value, e);
        ScheduleError::FormatInvalid { field }
    })
}

fn read_failure(schedule_id: &ScheduleId, err: RepositoryError) -> ScheduleError {
    if err.is_not_found() {
        warn!("Schedule {} not found", schedule_id);
    } else {
        error!("Failed to read schedule {}: {}", schedule_id, err);
    }
    ScheduleError::from_read("schedule", schedule_id, err)
}

fn storage_failure(operation: &str, err: RepositoryError) -> ScheduleError {
    error!("Failed to {}: {}", operation, err);
    ScheduleError::InternalStorage(err)
}

fn bulk_aborted(
    operation: &str,
    index: usize,
    persisted: usize,
    cause: ScheduleError,
) -> ScheduleError {
    warn!(
        "Bulk {} aborted at item {} ({} item(s) already persisted): {}",
        operation, index, persisted, cause
    );
    ScheduleError::BulkAborted {
        index,
        cause: Box::new(cause),
    }
}
