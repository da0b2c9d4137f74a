use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::NaiveDate;
use serviceCalendar::clients::prediction_client::FetchError;
use serviceCalendar::handlers::calendar_view::{days_of_month, DashboardView};
use serviceCalendar::models::calendar_event::CalendarEvent;
use serviceCalendar::models::prediction::{Prediction, SparePart};
use serviceCalendar::service::details::DetailsContent;
use serviceCalendar::service::overview::OverviewCounts;
use serviceCalendar::service::prediction_service::PredictionSource;
use serviceCalendar::service::sync_controller::{DetailsOutcome, RefreshOutcome, SyncController};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
}

fn today() -> NaiveDate {
    day(12)
}

fn prediction(date: NaiveDate, phone: &str) -> Prediction {
    Prediction {
        date,
        phone_number: phone.to_string(),
        avg_km_per_month: Some(1000.0),
        spare_parts: vec![SparePart {
            name: "Spark Plug".to_string(),
            reason: "Worn out".to_string(),
            price: Some(25000),
        }],
    }
}

fn fetch_failure() -> FetchError {
    FetchError::Decode {
        url: "http://localhost:8000/api/predictions".to_string(),
        details: "expected value at line 1 column 1".to_string(),
    }
}

#[derive(Default)]
struct RecordingView {
    year_month: (i32, u32),
    events: Vec<CalendarEvent>,
    replace_calls: usize,
    remove_calls: usize,
    disabled: Vec<NaiveDate>,
    highlight: Option<NaiveDate>,
    overview: Option<OverviewCounts>,
    details: Vec<DetailsContent>,
    stale: bool,
}

impl DashboardView for RecordingView {
    fn replace_events(&mut self, events: Vec<CalendarEvent>) {
        self.replace_calls += 1;
        self.events = events;
    }

    fn remove_all_events(&mut self) {
        self.remove_calls += 1;
        self.events.clear();
    }

    fn show_month(&mut self, year: i32, month: u32) {
        self.year_month = (year, month);
    }

    fn visible_days(&self) -> Vec<NaiveDate> {
        days_of_month(self.year_month.0, self.year_month.1)
    }

    fn mark_disabled(&mut self, day: NaiveDate) {
        if !self.disabled.contains(&day) {
            self.disabled.push(day);
        }
    }

    fn set_highlight(&mut self, day: Option<NaiveDate>) {
        self.highlight = day;
    }

    fn write_overview(&mut self, counts: &OverviewCounts) {
        self.overview = Some(*counts);
    }

    fn write_details(&mut self, content: &DetailsContent) {
        self.details.push(content.clone());
    }

    fn set_stale(&mut self, stale: bool) {
        self.stale = stale;
    }
}

struct ScriptedSource {
    all: Mutex<VecDeque<Result<Vec<Prediction>, FetchError>>>,
    day_results: Vec<Prediction>,
    day_calls: Mutex<Vec<NaiveDate>>,
}

impl ScriptedSource {
    fn new(all: Vec<Result<Vec<Prediction>, FetchError>>, day_results: Vec<Prediction>) -> Self {
        Self {
            all: Mutex::new(all.into()),
            day_results,
            day_calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl PredictionSource for ScriptedSource {
    async fn fetch_all(&self) -> Result<Vec<Prediction>, FetchError> {
        self.all
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(fetch_failure()))
    }

    async fn fetch_day(&self, day: NaiveDate) -> Result<Vec<Prediction>, FetchError> {
        self.day_calls.lock().unwrap().push(day);
        Ok(self
            .day_results
            .iter()
            .filter(|p| p.date == day)
            .cloned()
            .collect())
    }
}

#[tokio::test]
async fn refresh_groups_predictions_into_one_event_per_day() {
    let source = ScriptedSource::new(
        vec![Ok(vec![
            prediction(day(10), "+62812345678"),
            prediction(day(10), "+62823456789"),
            prediction(day(16), "+62834567890"),
        ])],
        vec![],
    );
    let mut controller = SyncController::new(RecordingView::default(), today());

    let outcome = controller.refresh_all(&source, today()).await;

    assert_eq!(outcome, RefreshOutcome::Applied { days: 2 });
    let view = controller.view();
    assert_eq!(view.replace_calls, 1);
    let titles: Vec<&str> = view.events.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["2 Services", "1 Services"]);
    assert_eq!(view.events[0].start, day(10));
    assert_eq!(view.events[1].start, day(16));
    assert_eq!(
        view.overview,
        Some(OverviewCounts {
            today: 0,
            week: 2,
            month: 3
        })
    );
    assert_eq!(view.highlight, Some(today()));
    assert!(view.disabled.contains(&day(11)));
    assert!(!view.disabled.contains(&today()));
    assert_eq!(view.disabled.len(), 11);
}

#[tokio::test]
async fn failed_refresh_keeps_previous_calendar() {
    let source = ScriptedSource::new(
        vec![
            Ok(vec![prediction(day(14), "+62845678901")]),
            Err(fetch_failure()),
        ],
        vec![],
    );
    let mut controller = SyncController::new(RecordingView::default(), today());
    controller.refresh_all(&source, today()).await;
    let events_before = controller.view().events.clone();
    let overview_before = controller.view().overview;

    let outcome = controller.refresh_all(&source, today()).await;

    assert_eq!(outcome, RefreshOutcome::Failed);
    assert_eq!(controller.view().events, events_before);
    assert_eq!(controller.view().overview, overview_before);
    assert_eq!(controller.view().replace_calls, 1);
    assert!(controller.view().stale);
    assert_eq!(controller.state().predictions.len(), 1);

    let recovered = ScriptedSource::new(vec![Ok(vec![])], vec![]);
    controller.refresh_all(&recovered, today()).await;
    assert!(!controller.view().stale);
    assert_eq!(controller.view().remove_calls, 1);
    assert!(controller.view().events.is_empty());
}

#[tokio::test]
async fn selecting_a_past_day_changes_nothing() {
    let source = ScriptedSource::new(vec![], vec![prediction(day(3), "+62856789012")]);
    let mut controller = SyncController::new(RecordingView::default(), today());

    let outcome = controller.select_and_load(&source, day(3), today()).await;

    assert_eq!(outcome, None);
    assert_eq!(controller.state().selected, Some(today()));
    assert_eq!(controller.view().highlight, Some(today()));
    assert!(controller.view().details.is_empty());
    assert!(source.day_calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn selecting_a_future_day_loads_its_details_once() {
    let source = ScriptedSource::new(
        vec![],
        vec![
            prediction(day(20), "+62867890123"),
            prediction(day(21), "+62812345678"),
        ],
    );
    let mut controller = SyncController::new(RecordingView::default(), today());

    let outcome = controller.select_and_load(&source, day(20), today()).await;

    assert_eq!(outcome, Some(DetailsOutcome::Rendered));
    assert_eq!(controller.state().selected, Some(day(20)));
    assert_eq!(controller.view().highlight, Some(day(20)));
    assert_eq!(*source.day_calls.lock().unwrap(), vec![day(20)]);
    assert_eq!(controller.view().details.len(), 1);
    match &controller.view().details[0] {
        DetailsContent::Services { heading, entries } => {
            assert_eq!(heading, "Services for Thu, Jun 20, 2024");
            assert_eq!(entries.len(), 1);
            assert_eq!(entries[0].phone_number, "+62867890123");
        }
        other => panic!("unexpected details: {:?}", other),
    }
}

#[tokio::test]
async fn selecting_today_is_allowed_and_empty_days_say_so() {
    let source = ScriptedSource::new(vec![], vec![]);
    let mut controller = SyncController::new(RecordingView::default(), today());

    let outcome = controller.select_and_load(&source, today(), today()).await;

    assert_eq!(outcome, Some(DetailsOutcome::Rendered));
    assert_eq!(
        controller.view().details[0],
        DetailsContent::Empty {
            message: "No services predicted for Wed, Jun 12, 2024".to_string()
        }
    );
}

#[test]
fn older_refresh_cannot_overwrite_newer_one() {
    let mut controller = SyncController::new(RecordingView::default(), today());
    let first = controller.begin_refresh();
    let second = controller.begin_refresh();

    let applied = controller.apply_refresh(
        second,
        Ok(vec![prediction(day(15), "+62812345678")]),
        today(),
    );
    let late = controller.apply_refresh(
        first,
        Ok(vec![prediction(day(16), "+62823456789")]),
        today(),
    );

    assert_eq!(applied, RefreshOutcome::Applied { days: 1 });
    assert_eq!(late, RefreshOutcome::Superseded);
    assert_eq!(controller.view().events[0].start, day(15));
}

#[test]
fn details_for_an_abandoned_selection_are_dropped() {
    let mut controller = SyncController::new(RecordingView::default(), today());
    let first = controller.select_day(day(18), today()).expect("future day");
    let second = controller.select_day(day(19), today()).expect("future day");

    let current = controller.apply_details(
        second,
        Ok(DetailsContent::Empty {
            message: "No services predicted for Wed, Jun 19, 2024".to_string(),
        }),
    );
    let stale = controller.apply_details(
        first,
        Ok(DetailsContent::Empty {
            message: "No services predicted for Tue, Jun 18, 2024".to_string(),
        }),
    );

    assert_eq!(current, DetailsOutcome::Rendered);
    assert_eq!(stale, DetailsOutcome::Superseded);
    assert_eq!(controller.view().details.len(), 1);
    assert_eq!(controller.view().highlight, Some(day(19)));
}

#[test]
fn refresh_after_midnight_moves_selection_to_the_new_day() {
    let mut controller = SyncController::new(RecordingView::default(), today());
    let ticket = controller.begin_refresh();

    let outcome = controller.apply_refresh(ticket, Ok(vec![]), day(13));

    assert_eq!(outcome, RefreshOutcome::Applied { days: 0 });
    assert_eq!(controller.state().selected, Some(day(13)));
    assert_eq!(controller.view().highlight, Some(day(13)));
    assert!(controller.view().disabled.contains(&day(12)));
    let reload = controller.take_pending_details().expect("details reload for the new day");
    assert_eq!(reload.day, day(13));
    assert_eq!(controller.take_pending_details(), None);
}

#[test]
fn future_selection_survives_a_day_change() {
    let mut controller = SyncController::new(RecordingView::default(), today());
    controller.select_day(day(20), today()).expect("future day");
    let ticket = controller.begin_refresh();

    controller.apply_refresh(ticket, Ok(vec![]), day(13));

    assert_eq!(controller.state().selected, Some(day(20)));
    assert_eq!(controller.view().highlight, Some(day(20)));
    assert_eq!(controller.take_pending_details(), None);
}

#[tokio::test]
async fn refresh_all_reloads_details_when_the_day_rolls_over() {
    let source = ScriptedSource::new(
        vec![Ok(vec![prediction(day(13), "+62845678901")])],
        vec![prediction(day(13), "+62845678901")],
    );
    let mut controller = SyncController::new(RecordingView::default(), today());

    controller.refresh_all(&source, day(13)).await;

    assert_eq!(*source.day_calls.lock().unwrap(), vec![day(13)]);
    match &controller.view().details[0] {
        DetailsContent::Services { heading, .. } => {
            assert_eq!(heading, "Services for Thu, Jun 13, 2024")
        }
        other => panic!("unexpected details: {:?}", other),
    }
}

#[test]
fn failed_details_leave_the_panel_alone() {
    let mut controller = SyncController::new(RecordingView::default(), today());
    let ticket = controller.select_day(day(22), today()).expect("future day");

    let outcome = controller.apply_details(ticket, Err(fetch_failure()));

    assert_eq!(outcome, DetailsOutcome::Failed);
    assert!(controller.view().details.is_empty());
}

#[test]
fn selecting_a_day_in_another_month_shows_that_month() {
    let mut controller = SyncController::new(RecordingView::default(), today());
    controller
        .select_day(NaiveDate::from_ymd_opt(2024, 7, 4).unwrap(), today())
        .expect("future day");
    assert_eq!(controller.view().year_month, (2024, 7));
    assert_eq!(
        controller.view().highlight,
        NaiveDate::from_ymd_opt(2024, 7, 4)
    );
}
