use chrono::NaiveDate;

use crate::models::prediction::Prediction;
use crate::service::date_utils::{end_of_week, first_of_month, last_of_month, start_of_week};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverviewCounts {
    pub today: usize,
    pub week: usize,
    pub month: usize,
}

/// Counts over the full set; each window is an independent filter.
pub fn recompute(predictions: &[Prediction], today: NaiveDate) -> OverviewCounts {
    let week = start_of_week(today)..=end_of_week(today);
    let month = first_of_month(today)..=last_of_month(today);

    OverviewCounts {
        today: predictions.iter().filter(|p| p.date == today).count(),
        week: predictions.iter().filter(|p| week.contains(&p.date)).count(),
        month: predictions.iter().filter(|p| month.contains(&p.date)).count(),
    }
}
