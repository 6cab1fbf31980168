use super::ui;
use crate::comparison::{ComparisonService, FETCH_ERROR_MESSAGE, LoadedSeries};
use crate::core::align::Comparison;
use crate::core::series::LookbackWindow;
use anyhow::Result;
use comfy_table::Cell;
use std::fmt::Write;
use tracing::error;

fn performance_label(symbol: &str) -> String {
    if symbol == crate::core::config::DEFAULT_BENCHMARK {
        "S&P 500 Performance".to_string()
    } else {
        format!("{symbol} Performance")
    }
}

/// Renders the metrics, axis range and comparison table for one selection.
pub fn render(loaded: &LoadedSeries, comparison: &Comparison) -> String {
    let subject = loaded.subject_symbol.as_deref();
    let benchmark = loaded.benchmark_symbol.as_str();
    let mut out = String::new();

    let title = match subject {
        Some(s) => format!("{s} vs {benchmark} ({})", comparison.window),
        None => format!("{benchmark} ({})", comparison.window),
    };
    let _ = writeln!(out, "{}", ui::style_text(&title, ui::StyleType::Title));

    let mut metrics = ui::new_styled_table();
    let mut header = Vec::new();
    let mut row = Vec::new();
    if let Some(s) = subject {
        header.push(ui::header_cell(&performance_label(s)));
        row.push(ui::performance_cell(comparison.performance.subject));
    }
    header.push(ui::header_cell(&performance_label(benchmark)));
    row.push(ui::performance_cell(comparison.performance.benchmark));
    metrics.set_header(header);
    metrics.add_row(row);
    let _ = writeln!(out, "{metrics}");

    if comparison.is_empty() {
        let _ = writeln!(
            out,
            "{}",
            ui::style_text(
                "No data to display for the selected range.",
                ui::StyleType::Subtle
            )
        );
        return out;
    }

    let _ = writeln!(
        out,
        "{} {}",
        ui::style_text("Range:", ui::StyleType::Label),
        comparison.bounds
    );

    let mut table = ui::new_styled_table();
    let mut header = vec![ui::header_cell("Date")];
    if let Some(s) = subject {
        header.push(ui::header_cell(&format!("Returns on $1000 ({s})")));
    }
    header.push(ui::header_cell(&format!("Returns on $1000 ({benchmark})")));
    table.set_header(header);

    for point in &comparison.points {
        let mut cells = vec![Cell::new(point.date.format("%Y-%m-%d").to_string())];
        if subject.is_some() {
            cells.push(ui::format_optional_cell(point.subject, ui::money));
        }
        cells.push(ui::format_optional_cell(Some(point.benchmark), ui::money));
        table.add_row(cells);
    }
    let _ = writeln!(out, "{table}");

    out
}

/// Loads and prints one selection. A failed fetch replaces the view with a single message.
pub async fn show(
    service: &ComparisonService,
    subject: Option<&str>,
    window: LookbackWindow,
) -> Option<LoadedSeries> {
    let label = subject.unwrap_or(service.benchmark()).to_string();
    let pb = ui::new_spinner(format!("Loading {label}"));
    let result = service.compare(subject, window).await;
    pb.finish_and_clear();

    match result {
        Ok((loaded, comparison)) => {
            print!("{}", render(&loaded, &comparison));
            Some(loaded)
        }
        Err(e) => {
            error!(error = %e, symbol = %label, "Failed to load comparison");
            println!("{}", ui::style_text(FETCH_ERROR_MESSAGE, ui::StyleType::Error));
            None
        }
    }
}

pub async fn run(
    service: &ComparisonService,
    symbols: &[String],
    window: LookbackWindow,
) -> Result<()> {
    if symbols.is_empty() {
        show(service, None, window).await;
        return Ok(());
    }

    let count = symbols.len();
    for (i, symbol) in symbols.iter().enumerate() {
        show(service, Some(symbol.as_str()), window).await;
        if i < count - 1 {
            ui::print_separator();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::align::PairingStrategy;
    use crate::core::series::PricePoint;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn loaded(subject: Option<&str>) -> LoadedSeries {
        LoadedSeries {
            subject_symbol: subject.map(str::to_string),
            benchmark_symbol: "SPY".to_string(),
            subject: if subject.is_some() {
                vec![
                    PricePoint::new(date(2024, 9, 30), 80.0),
                    PricePoint::new(date(2024, 8, 30), 100.0),
                ]
            } else {
                Vec::new()
            },
            benchmark: vec![
                PricePoint::new(date(2024, 9, 30), 150.0),
                PricePoint::new(date(2024, 8, 30), 100.0),
            ],
        }
    }

    #[test]
    fn test_render_subject_view() {
        console::set_colors_enabled(false);
        let loaded = loaded(Some("AAPL"));
        let comparison = loaded.align(
            LookbackWindow::OneYear,
            date(2024, 10, 17),
            PairingStrategy::Index,
        );

        let out = render(&loaded, &comparison);
        assert!(out.contains("AAPL vs SPY (1Y)"));
        assert!(out.contains("AAPL Performance"));
        assert!(out.contains("S&P 500 Performance"));
        assert!(out.contains("-20.00%"));
        assert!(out.contains("+50.00%"));
        assert!(out.contains("Returns on $1000 (AAPL)"));
        assert!(out.contains("2024-08-30"));
        assert!(out.contains("$1500.00"));
        assert!(out.contains("$700 - $1600"));
    }

    #[test]
    fn test_render_benchmark_only_view() {
        console::set_colors_enabled(false);
        let loaded = loaded(None);
        let comparison =
            loaded.align(LookbackWindow::All, date(2024, 10, 17), PairingStrategy::Index);

        let out = render(&loaded, &comparison);
        assert!(out.contains("SPY (ALL)"));
        assert!(!out.contains("Returns on $1000 (AAPL)"));
        assert!(out.contains("Returns on $1000 (SPY)"));
    }

    #[test]
    fn test_render_empty_window() {
        console::set_colors_enabled(false);
        let loaded = loaded(Some("AAPL"));
        let comparison = loaded.align(
            LookbackWindow::OneYear,
            date(2030, 1, 1),
            PairingStrategy::Index,
        );

        let out = render(&loaded, &comparison);
        assert!(out.contains("N/A"));
        assert!(out.contains("No data to display for the selected range."));
    }
}
