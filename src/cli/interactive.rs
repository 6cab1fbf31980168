use super::{compare, ui};
use crate::comparison::{ComparisonService, LoadedSeries, normalize_symbol};
use crate::core::series::LookbackWindow;
use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

/// One line of user input.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionInput {
    /// Select a symbol, or clear the selection to show the benchmark alone.
    Select(Option<String>),
    Range(LookbackWindow),
    Quit,
    Invalid(String),
}

pub fn parse_input(line: &str) -> SessionInput {
    let line = line.trim();
    let Some(command) = line.strip_prefix(':') else {
        return SessionInput::Select(normalize_symbol(line));
    };

    let mut parts = command.split_whitespace();
    match (parts.next().map(str::to_lowercase).as_deref(), parts.next()) {
        (Some("q" | "quit" | "exit"), None) => SessionInput::Quit,
        (Some("spy" | "clear"), None) => SessionInput::Select(None),
        (Some("range" | "r"), Some(arg)) => match arg.parse() {
            Ok(window) => SessionInput::Range(window),
            Err(e) => SessionInput::Invalid(e.to_string()),
        },
        _ => SessionInput::Invalid(format!("Unknown command: {line}")),
    }
}

fn print_help() {
    println!(
        "{}",
        ui::style_text(
            "Enter a symbol to compare, ':range 1Y|3Y|5Y|ALL' to change the window, \
             an empty line or ':clear' for the benchmark alone, ':quit' to exit.",
            ui::StyleType::Subtle
        )
    );
}

/// Reads selections from `input` until EOF or `:quit`, re-rendering after each one.
///
/// The cache behind `service` lives for the whole session, so repeated symbols and the
/// benchmark are fetched at most once per month.
pub async fn run<R: AsyncBufRead + Unpin>(
    service: &ComparisonService,
    input: R,
    mut window: LookbackWindow,
) -> Result<()> {
    print_help();
    let mut current = compare::show(service, None, window).await;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        match parse_input(&line) {
            SessionInput::Quit => break,
            SessionInput::Select(symbol) => {
                debug!(?symbol, "Symbol selected");
                ui::print_separator();
                current = compare::show(service, symbol.as_deref(), window).await;
            }
            SessionInput::Range(new_window) => {
                window = new_window;
                ui::print_separator();
                match &current {
                    Some(loaded) => redraw(service, loaded, window),
                    None => println!("Lookback window set to {window}"),
                }
            }
            SessionInput::Invalid(message) => {
                println!("{}", ui::style_text(&message, ui::StyleType::Error));
                print_help();
            }
        }
    }

    Ok(())
}

fn redraw(service: &ComparisonService, loaded: &LoadedSeries, window: LookbackWindow) {
    let comparison = service.align(loaded, window);
    print!("{}", compare::render(loaded, &comparison));
}
