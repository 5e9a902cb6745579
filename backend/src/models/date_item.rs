//! Per-day, per-type bundles of schedules used to render the calendar view.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Deref;

use super::schedule::{Schedule, ScheduleType};
use super::schedule_list::ScheduleList;
use super::time::date_format;

/// Grouping key of a [`DateItem`]. Orders by date first, then by type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey {
    pub date: NaiveDate,
    pub schedule_type: ScheduleType,
}

impl DateKey {
    pub fn of(schedule: &Schedule) -> Self {
        Self {
            date: schedule.start_date(),
            schedule_type: schedule.schedule_type,
        }
    }
}

/// Schedules of one type starting on one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateItem {
    #[serde(with = "date_format")]
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub schedule_type: ScheduleType,
    pub schedules: ScheduleList,
}

impl DateItem {
    pub fn new(key: DateKey, schedules: ScheduleList) -> Self {
        Self {
            date: key.date,
            schedule_type: key.schedule_type,
            schedules,
        }
    }

    pub fn key(&self) -> DateKey {
        DateKey {
            date: self.date,
            schedule_type: self.schedule_type,
        }
    }

    /// Sort the contained schedules by order.
    pub fn sort(&mut self) {
        self.schedules.sort();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateItemList(Vec<DateItem>);

impl DateItemList {
    pub fn new(items: Vec<DateItem>) -> Self {
        Self(items)
    }

    pub fn push(&mut self, item: DateItem) {
        self.0.push(item);
    }

    pub fn into_inner(self) -> Vec<DateItem> {
        self.0
    }

    /// Stable ascending sort by date.
    pub fn sort(&mut self) {
        self.0.sort_by_key(|item| item.date);
    }

    pub fn filter_by_type(&self, schedule_type: ScheduleType) -> DateItemList {
        self.0
            .iter()
            .filter(|item| item.schedule_type == schedule_type)
            .cloned()
            .collect()
    }

    /// Partition by type. Every [`ScheduleType`] is present as a key, possibly
    /// with an empty list; relative order is kept.
    pub fn to_type_map(&self) -> BTreeMap<ScheduleType, DateItemList> {
        let mut map: BTreeMap<ScheduleType, DateItemList> = ScheduleType::ALL
            .iter()
            .map(|t| (*t, DateItemList::default()))
            .collect();
        for item in &self.0 {
            map.entry(item.schedule_type)
                .or_default()
                .push(item.clone());
        }
        map
    }
}

impl Deref for DateItemList {
    type Target = [DateItem];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<DateItem>> for DateItemList {
    fn from(items: Vec<DateItem>) -> Self {
        Self(items)
    }
}

impl FromIterator<DateItem> for DateItemList {
    fn from_iter<I: IntoIterator<Item = DateItem>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for DateItemList {
    type Item = DateItem;
    type IntoIter = std::vec::IntoIter<DateItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a DateItemList {
    type Item = &'a DateItem;
    type IntoIter = std::slice::Iter<'a, DateItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
