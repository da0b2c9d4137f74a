use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;

use chrono::{Datelike, NaiveDate};

use crate::handlers::calendar_view::{days_of_month, month_grid, render_day_badge, DashboardView};
use crate::models::calendar_event::CalendarEvent;
use crate::service::details::DetailsContent;
use crate::service::overview::OverviewCounts;

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
// Marker, two-digit day, five-wide badge, marker.
const CELL_WIDTH: usize = 9;
const ANSI_RESET: &str = "\x1b[0m";
const ANSI_DIM: &str = "\x1b[2m";

/// Plain-text dashboard: month grid, overview counts, and the details panel.
pub struct TerminalView<W: Write + Send> {
    out: W,
    anchor: NaiveDate,
    events: BTreeMap<NaiveDate, CalendarEvent>,
    disabled: BTreeSet<NaiveDate>,
    highlight: Option<NaiveDate>,
    overview: OverviewCounts,
    details: Option<DetailsContent>,
    stale: bool,
    color: bool,
    dirty: bool,
}

impl<W: Write + Send> TerminalView<W> {
    pub fn new(out: W, today: NaiveDate) -> Self {
        Self {
            out,
            anchor: today,
            events: BTreeMap::new(),
            disabled: BTreeSet::new(),
            highlight: None,
            overview: OverviewCounts::default(),
            details: None,
            stale: false,
            color: false,
            dirty: true,
        }
    }

    /// Paint badges in their tier colour with ANSI escapes.
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn events(&self) -> Vec<CalendarEvent> {
        self.events.values().cloned().collect()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn cell(&self, day: NaiveDate) -> String {
        let event = self.events.get(&day);
        let badge = format!("{:<5}", event.map(render_day_badge).unwrap_or_default());
        let badge = match event {
            Some(event) if self.color => {
                let (r, g, b) = event.color.rgb();
                format!("\x1b[97;48;2;{};{};{}m{}{}", r, g, b, badge.trim_end(), ANSI_RESET)
                    + &" ".repeat(badge.len() - badge.trim_end().len())
            }
            _ => badge,
        };
        let disabled = self.disabled.contains(&day);
        let (left, right) = if self.highlight == Some(day) {
            ('[', ']')
        } else if disabled {
            ('~', ' ')
        } else {
            (' ', ' ')
        };
        let cell = format!("{}{:>2}{}{}", left, day.day(), badge, right);
        if disabled && self.color {
            format!("{}{}{}", ANSI_DIM, cell, ANSI_RESET)
        } else {
            cell
        }
    }

    pub fn render(&self) -> String {
        let mut text = String::new();
        let title = self.anchor.format("%B %Y").to_string();
        text.push_str(&format!("{:^width$}\n", title, width = CELL_WIDTH * 7));
        let header: String = WEEKDAYS
            .iter()
            .map(|name| format!("{:^width$}", name, width = CELL_WIDTH))
            .collect();
        text.push_str(header.trim_end());
        text.push('\n');
        for row in month_grid(self.anchor) {
            let line: Vec<String> = row
                .iter()
                .map(|slot| match slot {
                    Some(day) => self.cell(*day),
                    None => " ".repeat(CELL_WIDTH),
                })
                .collect();
            text.push_str(line.join("").trim_end());
            text.push('\n');
        }
        text.push('\n');
        text.push_str(&format!(
            "Today: {}   This week: {}   This month: {}\n",
            self.overview.today, self.overview.week, self.overview.month
        ));
        if self.stale {
            text.push_str("(last refresh failed, showing previous data)\n");
        }
        if let Some(details) = &self.details {
            text.push('\n');
            text.push_str(&details.to_text());
            text.push('\n');
        }
        text
    }
}

impl<W: Write + Send> DashboardView for TerminalView<W> {
    fn replace_events(&mut self, events: Vec<CalendarEvent>) {
        self.events = events.into_iter().map(|e| (e.start, e)).collect();
        self.dirty = true;
    }

    fn remove_all_events(&mut self) {
        self.events.clear();
        self.dirty = true;
    }

    fn show_month(&mut self, year: i32, month: u32) {
        if let Some(anchor) = NaiveDate::from_ymd_opt(year, month, 1) {
            self.anchor = anchor;
            self.dirty = true;
        }
    }

    fn visible_days(&self) -> Vec<NaiveDate> {
        days_of_month(self.anchor.year(), self.anchor.month())
    }

    fn mark_disabled(&mut self, day: NaiveDate) {
        self.dirty |= self.disabled.insert(day);
    }

    fn set_highlight(&mut self, day: Option<NaiveDate>) {
        if self.highlight != day {
            self.highlight = day;
            self.dirty = true;
        }
    }

    fn write_overview(&mut self, counts: &OverviewCounts) {
        self.overview = *counts;
        self.dirty = true;
    }

    fn write_details(&mut self, content: &DetailsContent) {
        self.details = Some(content.clone());
        self.dirty = true;
    }

    fn set_stale(&mut self, stale: bool) {
        if self.stale != stale {
            self.stale = stale;
            self.dirty = true;
        }
    }

    fn present(&mut self) {
        if !self.dirty {
            return;
        }
        let frame = self.render();
        if let Err(err) = writeln!(self.out, "{}", frame).and_then(|_| self.out.flush()) {
            tracing::warn!(error = %err, "failed to draw dashboard");
            return;
        }
        self.dirty = false;
    }
}
