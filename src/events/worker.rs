use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use tokio::sync::mpsc;
use tracing::debug;

use crate::events::queue::{EventBus, UiEvent};
use crate::handlers::calendar_view::{month_after, month_before, DashboardView};
use crate::service::date_utils::Clock;
use crate::service::details::load_for;
use crate::service::prediction_service::PredictionSource;
use crate::service::sync_controller::{DetailTicket, SyncController};

/// Owns the controller and applies every event in arrival order.
///
/// Fetches run on spawned tasks and report back through `bus`, so a slow
/// request never blocks selection or navigation. Returns the controller once
/// `UiEvent::Quit` arrives.
pub async fn run_event_worker<V: DashboardView>(
    mut rx: mpsc::Receiver<UiEvent>,
    bus: EventBus,
    mut controller: SyncController<V>,
    source: Arc<dyn PredictionSource>,
    clock: Arc<dyn Clock>,
) -> SyncController<V> {
    while let Some(event) = rx.recv().await {
        let today = clock.today();
        match event {
            UiEvent::RefreshRequested => {
                let ticket = controller.begin_refresh();
                let source = source.clone();
                let bus = bus.clone();
                tokio::spawn(async move {
                    let result = source.fetch_all().await;
                    bus.emit(UiEvent::RefreshCompleted { ticket, result }).await;
                });
            }
            UiEvent::RefreshCompleted { ticket, result } => {
                controller.apply_refresh(ticket, result, today);
            }
            UiEvent::DaySelected(day) => {
                if let Some(ticket) = controller.select_day(day, today) {
                    spawn_details(&source, &bus, ticket);
                }
            }
            UiEvent::DetailsCompleted { ticket, result } => {
                controller.apply_details(ticket, result);
            }
            UiEvent::PreviousMonth | UiEvent::NextMonth | UiEvent::CurrentMonth => {
                let (year, month) = shown_month(&controller, today);
                let (year, month) = match event {
                    UiEvent::PreviousMonth => month_before(year, month),
                    UiEvent::NextMonth => month_after(year, month),
                    _ => (today.year(), today.month()),
                };
                controller.show_month(year, month, today);
            }
            UiEvent::Quit => {
                debug!("event worker stopping");
                break;
            }
        }
        if let Some(ticket) = controller.take_pending_details() {
            spawn_details(&source, &bus, ticket);
        }
        controller.present();
    }
    controller
}

pub fn spawn_details(source: &Arc<dyn PredictionSource>, bus: &EventBus, ticket: DetailTicket) {
    let source = source.clone();
    let bus = bus.clone();
    tokio::spawn(async move {
        let result = load_for(source.as_ref(), ticket.day).await;
        bus.emit(UiEvent::DetailsCompleted { ticket, result }).await;
    });
}

fn shown_month<V: DashboardView>(controller: &SyncController<V>, today: NaiveDate) -> (i32, u32) {
    controller
        .view()
        .visible_days()
        .first()
        .map(|day| (day.year(), day.month()))
        .unwrap_or((today.year(), today.month()))
}
