use chrono::{Datelike, NaiveDate};
use tracing::{debug, info, warn};

use crate::clients::prediction_client::FetchError;
use crate::handlers::calendar_view::DashboardView;
use crate::models::calendar_event::{events_from_groups, CalendarEvent};
use crate::models::prediction::{Prediction, PredictionsByDate};
use crate::service::date_utils::{format_date_key, is_past_date};
use crate::service::details::{load_for, DetailsContent};
use crate::service::overview::{recompute, OverviewCounts};
use crate::service::prediction_service::PredictionSource;

/// Handed out when a full refresh starts; only the newest resolved ticket may apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket {
    seq: u64,
}

/// Handed out per detail load; only the ticket for the current selection may apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailTicket {
    seq: u64,
    pub day: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied { days: usize },
    Failed,
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailsOutcome {
    Rendered,
    Failed,
    Superseded,
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub selected: Option<NaiveDate>,
    pub predictions: Vec<Prediction>,
    pub events: Vec<CalendarEvent>,
    pub overview: OverviewCounts,
    pub stale: bool,
    refresh_issued: u64,
    refresh_applied: u64,
    detail_issued: u64,
    pending_details: Option<DetailTicket>,
}

pub struct SyncController<V: DashboardView> {
    state: AppState,
    view: V,
}

impl<V: DashboardView> SyncController<V> {
    pub fn new(mut view: V, today: NaiveDate) -> Self {
        view.show_month(today.year(), today.month());
        view.set_highlight(Some(today));
        let mut controller = Self {
            state: AppState {
                selected: Some(today),
                ..AppState::default()
            },
            view,
        };
        controller.apply_past_styling(today);
        controller
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.state.refresh_issued += 1;
        RefreshTicket {
            seq: self.state.refresh_issued,
        }
    }

    pub fn apply_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: Result<Vec<Prediction>, FetchError>,
        today: NaiveDate,
    ) -> RefreshOutcome {
        if ticket.seq <= self.state.refresh_applied {
            debug!(seq = ticket.seq, "dropping refresh overtaken by a newer one");
            return RefreshOutcome::Superseded;
        }

        let predictions = match result {
            Ok(predictions) => predictions,
            Err(err) => {
                warn!(error = %err, "failed to refresh predictions, keeping previous calendar");
                self.state.stale = true;
                self.view.set_stale(true);
                return RefreshOutcome::Failed;
            }
        };

        let groups = PredictionsByDate::group(&predictions);
        let events = events_from_groups(&groups);
        let overview = recompute(&predictions, today);
        let days = events.len();

        if events.is_empty() {
            self.view.remove_all_events();
        } else {
            self.view.replace_events(events.clone());
        }
        self.view.write_overview(&overview);
        self.apply_past_styling(today);
        self.roll_selection_forward(today);
        self.view.set_highlight(self.state.selected);
        self.view.set_stale(false);

        self.state.refresh_applied = ticket.seq;
        self.state.predictions = predictions;
        self.state.events = events;
        self.state.overview = overview;
        self.state.stale = false;

        info!(days, total = self.state.predictions.len(), "calendar refreshed");
        RefreshOutcome::Applied { days }
    }

    pub async fn refresh_all<S: PredictionSource + ?Sized>(
        &mut self,
        source: &S,
        today: NaiveDate,
    ) -> RefreshOutcome {
        let ticket = self.begin_refresh();
        let result = source.fetch_all().await;
        let outcome = self.apply_refresh(ticket, result, today);
        if let Some(details) = self.take_pending_details() {
            self.load_details(source, details).await;
        }
        outcome
    }

    /// Detail load queued because the selection moved without user input.
    pub fn take_pending_details(&mut self) -> Option<DetailTicket> {
        self.state.pending_details.take()
    }

    /// Moves the highlight to `day` unless it is in the past.
    pub fn select_day(&mut self, day: NaiveDate, today: NaiveDate) -> Option<DetailTicket> {
        if is_past_date(day, today) {
            debug!(day = %format_date_key(day), "ignoring selection of past day");
            return None;
        }
        if !self.view.visible_days().contains(&day) {
            self.show_month(day.year(), day.month(), today);
        }
        self.view.set_highlight(None);
        self.view.set_highlight(Some(day));
        self.state.selected = Some(day);
        Some(self.begin_details(day))
    }

    pub fn begin_details(&mut self, day: NaiveDate) -> DetailTicket {
        self.state.detail_issued += 1;
        DetailTicket {
            seq: self.state.detail_issued,
            day,
        }
    }

    pub fn apply_details(
        &mut self,
        ticket: DetailTicket,
        result: Result<DetailsContent, FetchError>,
    ) -> DetailsOutcome {
        if ticket.seq != self.state.detail_issued {
            debug!(day = %format_date_key(ticket.day), "dropping details for superseded selection");
            return DetailsOutcome::Superseded;
        }
        match result {
            Ok(content) => {
                self.view.write_details(&content);
                DetailsOutcome::Rendered
            }
            Err(err) => {
                warn!(
                    day = %format_date_key(ticket.day),
                    error = %err,
                    "failed to load service details"
                );
                DetailsOutcome::Failed
            }
        }
    }

    pub async fn load_details<S: PredictionSource + ?Sized>(
        &mut self,
        source: &S,
        ticket: DetailTicket,
    ) -> DetailsOutcome {
        let result = load_for(source, ticket.day).await;
        self.apply_details(ticket, result)
    }

    pub async fn select_and_load<S: PredictionSource + ?Sized>(
        &mut self,
        source: &S,
        day: NaiveDate,
        today: NaiveDate,
    ) -> Option<DetailsOutcome> {
        let ticket = self.select_day(day, today)?;
        Some(self.load_details(source, ticket).await)
    }

    pub fn show_month(&mut self, year: i32, month: u32, today: NaiveDate) {
        self.view.show_month(year, month);
        self.apply_past_styling(today);
        self.roll_selection_forward(today);
        self.view.set_highlight(self.state.selected);
    }

    pub fn present(&mut self) {
        self.view.present();
    }

    // A selection left behind by a date change moves to today.
    fn roll_selection_forward(&mut self, today: NaiveDate) {
        let behind = match self.state.selected {
            Some(selected) => is_past_date(selected, today),
            None => true,
        };
        if !behind {
            return;
        }
        debug!(day = %format_date_key(today), "selection rolled forward to today");
        self.state.selected = Some(today);
        self.state.pending_details = Some(self.begin_details(today));
    }

    fn apply_past_styling(&mut self, today: NaiveDate) {
        for day in self.view.visible_days() {
            if is_past_date(day, today) {
                self.view.mark_disabled(day);
            }
        }
    }
}
