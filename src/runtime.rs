use std::io::IsTerminal;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use chrono::NaiveDate;
use tracing_subscriber::EnvFilter;

use crate::cli::{run_prompt_loop, Commands};
use crate::config::Settings;
use crate::events::queue::EventBus;
use crate::events::worker::{run_event_worker, spawn_details};
use crate::handlers::terminal_view::TerminalView;
use crate::service::date_utils::{Clock, SystemClock};
use crate::service::details::load_for;
use crate::service::prediction_service::{PredictionService, PredictionSource};
use crate::service::sync_controller::{RefreshOutcome, SyncController};
use crate::tasks::refresh_loop::run_refresh_loop;
use crate::tasks::task_runner::TaskRunner;

const EVENT_BUFFER: usize = 64;

pub fn init_tracing(verbose: u8) -> anyhow::Result<()> {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();
    if let Err(err) = init_result {
        tracing::debug!(error = %err, "tracing subscriber already set, continuing");
    }
    Ok(())
}

fn stdout_view(today: NaiveDate) -> TerminalView<std::io::Stdout> {
    let color = std::io::stdout().is_terminal();
    TerminalView::new(std::io::stdout(), today).with_color(color)
}

pub async fn run(settings: Settings, command: Commands) -> anyhow::Result<()> {
    let service = PredictionService::new(settings.api_base_url.clone(), settings.request_timeout)
        .context("failed to build http client")?;
    let source: Arc<dyn PredictionSource> = Arc::new(service);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new(settings.timezone));
    match command {
        Commands::Watch => run_watch(&settings, source, clock).await,
        Commands::Day { date } => run_day(source.as_ref(), date).await,
        Commands::Overview => run_overview(source.as_ref(), clock.as_ref()).await,
    }
}

pub async fn run_watch(
    settings: &Settings,
    source: Arc<dyn PredictionSource>,
    clock: Arc<dyn Clock>,
) -> anyhow::Result<()> {
    let today = clock.today();
    let (bus, rx) = EventBus::new(EVENT_BUFFER);
    let mut controller = SyncController::new(stdout_view(today), today);
    controller.present();

    let ticket = controller.begin_details(today);
    spawn_details(&source, &bus, ticket);

    let mut task_runner = TaskRunner::new();
    task_runner.add_task("refresh-loop", {
        let bus = bus.clone();
        let period = settings.refresh_interval;
        move || tokio::spawn(run_refresh_loop(bus, period))
    });
    task_runner.add_task("prompt", {
        let bus = bus.clone();
        move || {
            tokio::spawn(async move {
                if let Err(err) = tokio::task::spawn_blocking(move || run_prompt_loop(bus)).await {
                    tracing::warn!(error = %err, "prompt thread failed");
                }
            })
        }
    });
    let running = task_runner.start_all();

    run_event_worker(rx, bus, controller, source, clock).await;
    running.shutdown().await;
    Ok(())
}

pub async fn run_day(source: &dyn PredictionSource, date: NaiveDate) -> anyhow::Result<()> {
    let content = load_for(source, date)
        .await
        .with_context(|| format!("failed to load services for {}", date))?;
    println!("{}", content.to_text());
    Ok(())
}

pub async fn run_overview(source: &dyn PredictionSource, clock: &dyn Clock) -> anyhow::Result<()> {
    let today = clock.today();
    let mut controller = SyncController::new(stdout_view(today), today);
    match controller.refresh_all(source, today).await {
        RefreshOutcome::Applied { .. } => {
            controller.present();
            Ok(())
        }
        outcome => Err(anyhow!("prediction refresh did not complete: {:?}", outcome)),
    }
}
