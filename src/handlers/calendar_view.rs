use chrono::{Datelike, NaiveDate};

use crate::models::calendar_event::CalendarEvent;
use crate::service::date_utils::{first_of_month, last_of_month};
use crate::service::details::DetailsContent;
use crate::service::overview::OverviewCounts;

/// Everything the sync controller may do to a rendering surface.
///
/// Day selection flows the other way, as `UiEvent::DaySelected` on the event bus.
pub trait DashboardView: Send {
    /// Swap the whole event set in one step.
    fn replace_events(&mut self, events: Vec<CalendarEvent>);
    fn remove_all_events(&mut self);
    fn show_month(&mut self, year: i32, month: u32);
    fn visible_days(&self) -> Vec<NaiveDate>;
    fn mark_disabled(&mut self, day: NaiveDate);
    /// At most one day is highlighted; `None` clears it.
    fn set_highlight(&mut self, day: Option<NaiveDate>);
    fn write_overview(&mut self, counts: &OverviewCounts);
    fn write_details(&mut self, content: &DetailsContent);
    fn set_stale(&mut self, stale: bool);
    fn present(&mut self) {}
}

// At most five characters wide.
pub fn render_day_badge(event: &CalendarEvent) -> String {
    if event.count > 999 {
        "(1k+)".to_string()
    } else {
        format!("({})", event.count)
    }
}

pub fn days_of_month(year: i32, month: u32) -> Vec<NaiveDate> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    first.iter_days().take_while(|d| d.month() == month).collect()
}

pub fn month_after(year: i32, month: u32) -> (i32, u32) {
    if month == 12 { (year + 1, 1) } else { (year, month + 1) }
}

pub fn month_before(year: i32, month: u32) -> (i32, u32) {
    if month == 1 { (year - 1, 12) } else { (year, month - 1) }
}

// Sunday-first rows of the month containing `anchor`, padded with `None`.
pub fn month_grid(anchor: NaiveDate) -> Vec<[Option<NaiveDate>; 7]> {
    let first = first_of_month(anchor);
    let last = last_of_month(anchor);
    let mut rows = Vec::new();
    let mut row = [None; 7];
    let mut col = first.weekday().num_days_from_sunday() as usize;
    for day in first.iter_days().take_while(|d| *d <= last) {
        row[col] = Some(day);
        col += 1;
        if col == 7 {
            rows.push(row);
            row = [None; 7];
            col = 0;
        }
    }
    if col > 0 {
        rows.push(row);
    }
    rows
}
