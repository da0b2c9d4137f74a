use clap::{Parser, Subcommand};
use chrono::NaiveDate;
use inquire::Text;

use crate::events::queue::{EventBus, UiEvent};
use crate::service::date_utils::parse_date_key;

#[derive(Parser, Debug)]
#[command(name = "service-calendar", about = "Calendar of predicted service visits")]
pub struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Live dashboard refreshed on a timer; pick days at the prompt.
    Watch,
    /// Print the services predicted for one day.
    Day {
        #[arg(value_parser = parse_day_arg)]
        date: NaiveDate,
    },
    /// Refresh once and print the calendar with overview counts.
    Overview,
}

fn parse_day_arg(raw: &str) -> Result<NaiveDate, String> {
    parse_date_key(raw).ok_or_else(|| format!("expected YYYY-MM-DD, got {:?}", raw))
}

pub const PROMPT_HELP: &str = "Select a day (YYYY-MM-DD), or prev / next / today / refresh / quit";

/// Maps one line of prompt input to a dashboard event.
pub fn parse_input(line: &str) -> Result<UiEvent, String> {
    let input = line.trim();
    match input.to_ascii_lowercase().as_str() {
        "q" | "quit" | "exit" => Ok(UiEvent::Quit),
        "p" | "prev" => Ok(UiEvent::PreviousMonth),
        "n" | "next" => Ok(UiEvent::NextMonth),
        "t" | "today" => Ok(UiEvent::CurrentMonth),
        "r" | "refresh" => Ok(UiEvent::RefreshRequested),
        _ => parse_date_key(input)
            .map(UiEvent::DaySelected)
            .ok_or_else(|| format!("Not a command or YYYY-MM-DD date: {}", input)),
    }
}

// Runs on a blocking thread; ends on quit, prompt cancel, or a closed bus.
pub fn run_prompt_loop(bus: EventBus) {
    loop {
        let line = match Text::new(PROMPT_HELP).prompt() {
            Ok(line) => line,
            Err(err) => {
                tracing::debug!(error = %err, "prompt closed");
                let _ = bus.emit_blocking(UiEvent::Quit);
                return;
            }
        };
        match parse_input(&line) {
            Ok(event) => {
                let quit = matches!(event, UiEvent::Quit);
                if !bus.emit_blocking(event) || quit {
                    return;
                }
            }
            Err(message) => println!("{}", message),
        }
    }
}
