//! Combines a subject series and a benchmark series into one chartable comparison.

use crate::core::series::{ComparisonPoint, LookbackWindow, PricePoint};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;
use tracing::debug;

/// Notional amount every normalized series starts from.
pub const BASELINE: f64 = 1000.0;

const AXIS_STEP: f64 = 100.0;

/// How points of the two series are matched up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PairingStrategy {
    /// Pair the i-th point of each series over the shorter length. Both series must share
    /// the same ordering; differing histories misalign silently.
    #[default]
    Index,
    /// Pair only points whose dates appear in both series.
    Date,
}

/// Raw, un-normalized prices for one date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairedPoint {
    pub date: NaiveDate,
    pub subject: Option<f64>,
    pub benchmark: f64,
}

/// Matches `subject` against `benchmark`. An empty `subject` means no symbol is selected,
/// in which case every benchmark point is kept with no subject price.
pub fn pair_series(
    subject: &[PricePoint],
    benchmark: &[PricePoint],
    strategy: PairingStrategy,
) -> Vec<PairedPoint> {
    if subject.is_empty() {
        return benchmark
            .iter()
            .map(|b| PairedPoint {
                date: b.date,
                subject: None,
                benchmark: b.price,
            })
            .collect();
    }

    match strategy {
        PairingStrategy::Index => subject
            .iter()
            .zip(benchmark)
            .map(|(s, b)| PairedPoint {
                date: s.date,
                subject: Some(s.price),
                benchmark: b.price,
            })
            .collect(),
        PairingStrategy::Date => {
            let by_date: HashMap<NaiveDate, f64> =
                subject.iter().map(|s| (s.date, s.price)).collect();
            benchmark
                .iter()
                .filter_map(|b| {
                    by_date.get(&b.date).map(|price| PairedPoint {
                        date: b.date,
                        subject: Some(*price),
                        benchmark: b.price,
                    })
                })
                .collect()
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn non_zero_or_one(value: f64) -> f64 {
    if value == 0.0 { 1.0 } else { value }
}

/// Windows, sorts and rebases paired prices so both series start at [`BASELINE`].
pub fn normalize(
    paired: Vec<PairedPoint>,
    window: LookbackWindow,
    today: NaiveDate,
) -> Vec<ComparisonPoint> {
    let mut retained: Vec<PairedPoint> = paired
        .into_iter()
        .filter(|p| window.contains(p.date, today))
        .collect();
    retained.sort_by_key(|p| p.date);

    let Some(first) = retained.first() else {
        return Vec::new();
    };
    let benchmark_base = non_zero_or_one(first.benchmark);
    let subject_base = non_zero_or_one(first.subject.unwrap_or(1.0));

    retained
        .iter()
        .map(|p| ComparisonPoint {
            date: p.date,
            subject: p.subject.map(|s| round2(s / subject_base * BASELINE)),
            benchmark: round2(p.benchmark / benchmark_base * BASELINE),
        })
        .collect()
}

/// Percentage growth across the displayed window.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PerformanceSummary {
    pub subject: Option<f64>,
    pub benchmark: Option<f64>,
}

fn percent_change(first: f64, last: f64) -> Option<f64> {
    (first != 0.0).then(|| (last - first) / first * 100.0)
}

impl PerformanceSummary {
    pub fn from_points(points: &[ComparisonPoint]) -> Self {
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            return Self::default();
        };

        let subject = match (first.subject, last.subject) {
            (Some(f), Some(l)) => percent_change(f, l),
            _ => None,
        };

        Self {
            subject,
            benchmark: percent_change(first.benchmark, last.benchmark),
        }
    }
}

/// Formats a percentage the way the metrics panel shows it, e.g. `+50.00%` or `N/A`.
pub fn format_performance(value: Option<f64>) -> String {
    match value {
        Some(v) if v > 0.0 => format!("+{v:.2}%"),
        Some(v) => format!("{v:.2}%"),
        None => "N/A".to_string(),
    }
}

/// Vertical chart range covering every normalized value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisBounds {
    pub lower: f64,
    pub upper: f64,
}

impl Default for AxisBounds {
    fn default() -> Self {
        Self {
            lower: 0.0,
            upper: BASELINE,
        }
    }
}

impl Display for AxisBounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${:.0} - ${:.0}", self.lower, self.upper)
    }
}

impl AxisBounds {
    /// Rounds the extremes out to the next hundred and pads by another hundred, never going
    /// below zero or topping out under the baseline.
    pub fn from_points(points: &[ComparisonPoint]) -> Self {
        let values = points
            .iter()
            .flat_map(|p| p.subject.into_iter().chain(std::iter::once(p.benchmark)));

        let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        if !min.is_finite() || !max.is_finite() {
            return Self::default();
        }

        let min = (min / AXIS_STEP).floor() * AXIS_STEP;
        let max = (max / AXIS_STEP).ceil() * AXIS_STEP;

        Self {
            lower: (min - AXIS_STEP).max(0.0),
            upper: (max + AXIS_STEP).max(BASELINE),
        }
    }
}

/// Everything the presentation needs for one subject/benchmark view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub window: LookbackWindow,
    pub points: Vec<ComparisonPoint>,
    pub performance: PerformanceSummary,
    pub bounds: AxisBounds,
}

impl Comparison {
    pub fn build(
        subject: &[PricePoint],
        benchmark: &[PricePoint],
        window: LookbackWindow,
        today: NaiveDate,
        strategy: PairingStrategy,
    ) -> Self {
        let paired = pair_series(subject, benchmark, strategy);
        debug!(
            subject_len = subject.len(),
            benchmark_len = benchmark.len(),
            paired_len = paired.len(),
            %window,
            "Aligned series"
        );
        let points = normalize(paired, window, today);

        Self {
            window,
            performance: PerformanceSummary::from_points(&points),
            bounds: AxisBounds::from_points(&points),
            points,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
