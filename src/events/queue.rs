use chrono::NaiveDate;
use tokio::sync::mpsc;

use crate::clients::prediction_client::FetchError;
use crate::models::prediction::Prediction;
use crate::service::details::DetailsContent;
use crate::service::sync_controller::{DetailTicket, RefreshTicket};

#[derive(Debug)]
pub enum UiEvent {
    /// A day cell or its event was picked.
    DaySelected(NaiveDate),
    PreviousMonth,
    NextMonth,
    CurrentMonth,
    RefreshRequested,
    RefreshCompleted {
        ticket: RefreshTicket,
        result: Result<Vec<Prediction>, FetchError>,
    },
    DetailsCompleted {
        ticket: DetailTicket,
        result: Result<DetailsContent, FetchError>,
    },
    Quit,
}

#[derive(Clone)]
pub struct EventBus {
    tx: mpsc::Sender<UiEvent>,
}

impl EventBus {
    pub fn new(buffer: usize) -> (Self, mpsc::Receiver<UiEvent>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self { tx }, rx)
    }

    pub async fn emit(&self, event: UiEvent) {
        let _ = self.tx.send(event).await;
    }

    // For producers living outside the runtime, such as the prompt thread.
    pub fn emit_blocking(&self, event: UiEvent) -> bool {
        self.tx.blocking_send(event).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
