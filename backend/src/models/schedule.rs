//! Schedule entity and its value types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::time::date_time_format;
use crate::define_id_type;

define_id_type!(ScheduleId);
define_id_type!(UserId);

/// Kind of calendar entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleType {
    /// Institutionally defined event (academic calendar).
    Master,
    /// User defined event (attended course).
    Custom,
}

impl ScheduleType {
    pub const ALL: [ScheduleType; 2] = [ScheduleType::Master, ScheduleType::Custom];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleType::Master => "master",
            ScheduleType::Custom => "custom",
        }
    }
}

impl fmt::Display for ScheduleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown schedule type '{0}', expected 'master' or 'custom'")]
pub struct UnknownScheduleType(pub String);

impl FromStr for ScheduleType {
    type Err = UnknownScheduleType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "master" => Ok(ScheduleType::Master),
            "custom" => Ok(ScheduleType::Custom),
            other => Err(UnknownScheduleType(other.to_string())),
        }
    }
}

/// Display rank of a schedule among its siblings (same owner, date and type).
///
/// `0` means the rank has not been assigned yet.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Order(pub u32);

impl Order {
    pub const UNASSIGNED: Order = Order(0);

    pub fn new(value: u32) -> Self {
        Order(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Rank that follows every sibling: `1` for no siblings, otherwise `max + 1`.
    ///
    /// `siblings` must already be narrowed to one owner, date and type.
    pub fn next_after(siblings: &[Schedule]) -> Order {
        siblings
            .iter()
            .map(|s| s.order)
            .max()
            .map_or(Order(1), |max| Order(max.0.saturating_add(1)))
    }
}

impl From<u32> for Order {
    fn from(v: u32) -> Self {
        Order(v)
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A calendar entry owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: ScheduleId,
    #[serde(rename = "user_id")]
    pub owner_id: UserId,
    pub name: String,
    #[serde(with = "date_time_format")]
    pub starts_at: DateTime<Utc>,
    #[serde(with = "date_time_format")]
    pub ends_at: DateTime<Utc>,
    pub color: String,
    #[serde(rename = "type")]
    pub schedule_type: ScheduleType,
    pub order: Order,
    #[serde(with = "date_time_format")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "date_time_format")]
    pub updated_at: DateTime<Utc>,
}

impl Schedule {
    /// Calendar date the schedule belongs to (time of day ignored).
    pub fn start_date(&self) -> NaiveDate {
        self.starts_at.date_naive()
    }
}
