//! Data Transfer Objects for the HTTP API.
//!
//! Request bodies deserialize leniently (missing strings default to empty) so
//! that `validate` can report a precise 400 instead of a generic rejection.

use serde::{Deserialize, Serialize};

use crate::models::{
    parse_date_time, Order, Schedule, ScheduleId, ScheduleType, Subject, UserId,
};
use crate::services::{NewSchedule, ScheduleUpdate};

pub const MAX_NAME_LENGTH: usize = 50;

/// Fields shared by schedule create and update bodies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleFields {
    pub name: String,
    pub starts_at: String,
    pub ends_at: String,
    pub color: String,
    #[serde(rename = "type")]
    pub schedule_type: String,
}

impl ScheduleFields {
    /// Check the field rules and return the parsed type.
    pub fn validate(&self) -> Result<ScheduleType, String> {
        validate_name(&self.name)?;

        if self.starts_at.is_empty() {
            return Err("starts_at is required".to_string());
        }
        if self.ends_at.is_empty() {
            return Err("ends_at is required".to_string());
        }
        let starts_at = parse_date_time(&self.starts_at)
            .map_err(|_| "starts_at must be formatted as YYYY-MM-DD HH:MM:SS".to_string())?;
        let ends_at = parse_date_time(&self.ends_at)
            .map_err(|_| "ends_at must be formatted as YYYY-MM-DD HH:MM:SS".to_string())?;
        if starts_at > ends_at {
            return Err("starts_at must not be after ends_at".to_string());
        }

        validate_color(&self.color)?;

        self.schedule_type.parse().map_err(|e| format!("type: {}", e))
    }
}

fn validate_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("name is required".to_string());
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(format!(
            "name must be at most {} characters",
            MAX_NAME_LENGTH
        ));
    }
    Ok(())
}

fn validate_color(color: &str) -> Result<(), String> {
    if color.is_empty() {
        return Err("color is required".to_string());
    }
    Ok(())
}

fn item_error(position: usize, message: String) -> String {
    format!("item {}: {}", position + 1, message)
}

/// Body of `POST /v1/schedules`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateScheduleRequest {
    #[serde(flatten)]
    pub fields: ScheduleFields,
    /// Omitted or `0` lets the server pick the next free order.
    #[serde(default)]
    pub order: Option<u32>,
}

impl CreateScheduleRequest {
    pub fn into_new_schedule(self, owner_id: UserId) -> Result<NewSchedule, String> {
        let schedule_type = self.fields.validate()?;
        Ok(NewSchedule {
            owner_id,
            name: self.fields.name,
            starts_at: self.fields.starts_at,
            ends_at: self.fields.ends_at,
            color: self.fields.color,
            schedule_type,
            order: self.order.map(Order::new),
        })
    }
}

/// Body of `PUT /v1/schedules/{schedule_id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateScheduleRequest {
    #[serde(flatten)]
    pub fields: ScheduleFields,
    #[serde(default)]
    pub order: u32,
}

impl UpdateScheduleRequest {
    pub fn into_update(self, id: ScheduleId) -> Result<ScheduleUpdate, String> {
        let schedule_type = self.fields.validate()?;
        Ok(ScheduleUpdate {
            id,
            name: self.fields.name,
            starts_at: self.fields.starts_at,
            ends_at: self.fields.ends_at,
            color: self.fields.color,
            schedule_type,
            order: Order::new(self.order),
        })
    }
}

/// One element of a bulk update body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkUpdateItem {
    #[serde(default)]
    pub id: String,
    #[serde(flatten)]
    pub request: UpdateScheduleRequest,
}

/// Body of `POST /v1/schedules/bulk`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkCreateRequest {
    #[serde(default)]
    pub schedules: Vec<CreateScheduleRequest>,
}

impl BulkCreateRequest {
    /// Validate every item; the first failure names its 1-based position.
    pub fn into_new_schedules(self, owner_id: &UserId) -> Result<Vec<NewSchedule>, String> {
        if self.schedules.is_empty() {
            return Err("schedules must not be empty".to_string());
        }
        self.schedules
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                item.into_new_schedule(owner_id.clone())
                    .map_err(|e| item_error(i, e))
            })
            .collect()
    }
}

/// Body of `PUT /v1/schedules/bulk`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkUpdateRequest {
    #[serde(default)]
    pub schedules: Vec<BulkUpdateItem>,
}

impl BulkUpdateRequest {
    pub fn into_updates(self) -> Result<Vec<ScheduleUpdate>, String> {
        if self.schedules.is_empty() {
            return Err("schedules must not be empty".to_string());
        }
        self.schedules
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                if item.id.is_empty() {
                    return Err(item_error(i, "id is required".to_string()));
                }
                item.request
                    .into_update(ScheduleId::new(item.id))
                    .map_err(|e| item_error(i, e))
            })
            .collect()
    }
}

/// Response of both bulk endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkSchedulesResponse {
    pub schedules: Vec<Schedule>,
}

/// Body of `POST /v1/subjects`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateSubjectRequest {
    pub name: String,
    pub color: String,
}

impl CreateSubjectRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_name(&self.name)?;
        validate_color(&self.color)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectListResponse {
    pub subjects: Vec<Subject>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// API version
    pub version: String,
    /// Storage backend status
    pub repository: String,
}
