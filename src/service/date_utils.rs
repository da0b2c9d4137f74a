use chrono::{Datelike, Local, NaiveDate, Utc};
use chrono_tz::Tz;

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Source of "today" for every date comparison in the dashboard.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall clock, read in the configured zone or the host's local zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    tz: Option<Tz>,
}

impl SystemClock {
    pub fn new(tz: Option<Tz>) -> Self {
        Self { tz }
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        let now = Utc::now();
        match self.tz {
            Some(tz) => now.with_timezone(&tz).date_naive(),
            None => now.with_timezone(&Local).date_naive(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

pub fn is_past_date(date: NaiveDate, today: NaiveDate) -> bool {
    date < today
}

pub fn format_date_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    let key = key.trim();
    if key.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(key, DATE_KEY_FORMAT).ok()
}

/// en-US short form, e.g. `Wed, Jun 12, 2024`.
pub fn format_display_date(date: NaiveDate) -> String {
    date.format("%a, %b %-d, %Y").to_string()
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

// Weeks run Sunday through Saturday.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_sunday() as u64;
    date.checked_sub_days(chrono::Days::new(offset)).unwrap_or(date)
}

pub fn end_of_week(date: NaiveDate) -> NaiveDate {
    let start = start_of_week(date);
    start.checked_add_days(chrono::Days::new(6)).unwrap_or(start)
}
