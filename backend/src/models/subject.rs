use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::schedule::UserId;
use super::time::date_time_format;
use crate::define_id_type;

define_id_type!(SubjectId);

/// A course label whose name and color pre-fill custom schedules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    #[serde(rename = "user_id")]
    pub owner_id: UserId,
    pub name: String,
    pub color: String,
    #[serde(with = "date_time_format")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "date_time_format")]
    pub updated_at: DateTime<Utc>,
}
