#![allow(dead_code)]

use std::sync::Mutex;

use attendance_plan::models::{Order, ScheduleType, UserId};
use attendance_plan::services::NewSchedule;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily set (`Some`) or removed (`None`).
///
/// Calls are serialized on a process-wide lock, and the previous values are
/// restored even if `f` panics.
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _restore = EnvRestore::apply(changes);
    f()
}

struct EnvRestore(Vec<(String, Option<String>)>);

impl EnvRestore {
    fn apply(changes: &[(&str, Option<&str>)]) -> Self {
        let mut previous = Vec::with_capacity(changes.len());
        for (key, value) in changes {
            if !previous.iter().any(|(k, _): &(String, Option<String>)| k == key) {
                previous.push((key.to_string(), std::env::var(key).ok()));
            }
            set_or_remove(key, *value);
        }
        Self(previous)
    }
}

impl Drop for EnvRestore {
    fn drop(&mut self) {
        for (key, value) in self.0.drain(..) {
            set_or_remove(&key, value.as_deref());
        }
    }
}

fn set_or_remove(key: &str, value: Option<&str>) {
    match value {
        Some(v) => std::env::set_var(key, v),
        None => std::env::remove_var(key),
    }
}

/// A zero-length custom schedule for `owner` at `starts_at`.
pub fn custom_schedule(owner: &str, name: &str, starts_at: &str, order: Option<u32>) -> NewSchedule {
    NewSchedule {
        owner_id: UserId::new(owner),
        name: name.to_string(),
        starts_at: starts_at.to_string(),
        ends_at: starts_at.to_string(),
        color: "indigo".to_string(),
        schedule_type: ScheduleType::Custom,
        order: order.map(Order::new),
    }
}

pub fn master_schedule(owner: &str, name: &str, starts_at: &str, order: Option<u32>) -> NewSchedule {
    NewSchedule {
        schedule_type: ScheduleType::Master,
        color: "gold".to_string(),
        ..custom_schedule(owner, name, starts_at, order)
    }
}
