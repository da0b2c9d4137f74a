use chrono::NaiveDate;

use crate::models::prediction::PredictionsByDate;
use crate::service::color_policy::{color_for_count, ColorTier};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub title: String,
    pub start: NaiveDate,
    pub count: usize,
    pub color: ColorTier,
}

impl CalendarEvent {
    pub fn for_day(start: NaiveDate, count: usize) -> Self {
        Self {
            title: format!("{} Services", count),
            start,
            count,
            color: color_for_count(count),
        }
    }
}

pub fn events_from_groups(groups: &PredictionsByDate) -> Vec<CalendarEvent> {
    groups
        .iter()
        .map(|(day, items)| CalendarEvent::for_day(day, items.len()))
        .collect()
}
