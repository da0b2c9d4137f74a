use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};

use crate::events::queue::{EventBus, UiEvent};

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Requests a full refresh immediately, then once per `period`.
///
/// Not failure-aware: a failed refresh just waits for the next tick. Ends when
/// the bus closes or the task is aborted.
pub async fn run_refresh_loop(bus: EventBus, period: Duration) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        if bus.is_closed() {
            break;
        }
        tracing::debug!("scheduling prediction refresh");
        bus.emit(UiEvent::RefreshRequested).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_refresh_is_immediate_then_periodic() {
        let (bus, mut rx) = EventBus::new(8);
        let handle = tokio::spawn(run_refresh_loop(bus, Duration::from_millis(20)));

        for _ in 0..3 {
            let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
                .await
                .expect("tick should arrive")
                .expect("bus open");
            assert!(matches!(event, UiEvent::RefreshRequested));
        }
        handle.abort();
    }

    #[tokio::test]
    async fn stops_when_receiver_is_gone() {
        let (bus, rx) = EventBus::new(1);
        drop(rx);
        tokio::time::timeout(
            Duration::from_secs(2),
            run_refresh_loop(bus, Duration::from_millis(10)),
        )
        .await
        .expect("loop should end once the bus closes");
    }
}
