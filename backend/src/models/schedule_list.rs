//! Operations over a flat collection of schedules.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Deref;

use super::date_item::{DateItem, DateItemList, DateKey};
use super::schedule::{Order, Schedule, ScheduleType};

/// Flat, ordered collection of schedules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleList(Vec<Schedule>);

impl ScheduleList {
    pub fn new(schedules: Vec<Schedule>) -> Self {
        Self(schedules)
    }

    pub fn push(&mut self, schedule: Schedule) {
        self.0.push(schedule);
    }

    pub fn into_inner(self) -> Vec<Schedule> {
        self.0
    }

    /// Schedules of type `schedule_type`, in their current relative order.
    pub fn filter_by_type(&self, schedule_type: ScheduleType) -> ScheduleList {
        self.0
            .iter()
            .filter(|s| s.schedule_type == schedule_type)
            .cloned()
            .collect()
    }

    /// Sort ascending by order. Stable: equal orders keep their relative position.
    pub fn sort(&mut self) {
        self.0.sort_by_key(|s| s.order);
    }

    /// Next free order when `self` is the sibling set of a new schedule.
    pub fn next_order(&self) -> Order {
        Order::next_after(&self.0)
    }

    /// Group by (start date, type), each group sorted by order, groups sorted by date.
    pub fn to_date_item_list(&self) -> DateItemList {
        let mut groups: BTreeMap<DateKey, ScheduleList> = BTreeMap::new();
        for schedule in &self.0 {
            groups
                .entry(DateKey::of(schedule))
                .or_default()
                .push(schedule.clone());
        }

        let mut items: DateItemList = groups
            .into_iter()
            .map(|(key, schedules)| {
                let mut item = DateItem::new(key, schedules);
                item.sort();
                item
            })
            .collect();
        items.sort();
        items
    }
}

impl Deref for ScheduleList {
    type Target = [Schedule];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Schedule>> for ScheduleList {
    fn from(schedules: Vec<Schedule>) -> Self {
        Self(schedules)
    }
}

impl FromIterator<Schedule> for ScheduleList {
    fn from_iter<I: IntoIterator<Item = Schedule>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ScheduleList {
    type Item = Schedule;
    type IntoIter = std::vec::IntoIter<Schedule>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ScheduleList {
    type Item = &'a Schedule;
    type IntoIter = std::slice::Iter<'a, Schedule>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
