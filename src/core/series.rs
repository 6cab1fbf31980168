//! Price series and comparison types

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// One monthly adjusted close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }
}

/// A subject/benchmark pair on a common date, normalized to a 1000-unit start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComparisonPoint {
    pub date: NaiveDate,
    pub subject: Option<f64>,
    pub benchmark: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LookbackWindow {
    #[serde(rename = "1Y", alias = "1y")]
    OneYear,
    #[serde(rename = "3Y", alias = "3y")]
    ThreeYears,
    #[default]
    #[serde(rename = "5Y", alias = "5y")]
    FiveYears,
    #[serde(rename = "ALL", alias = "all")]
    All,
}

impl LookbackWindow {
    pub fn years(&self) -> Option<i32> {
        match self {
            LookbackWindow::OneYear => Some(1),
            LookbackWindow::ThreeYears => Some(3),
            LookbackWindow::FiveYears => Some(5),
            LookbackWindow::All => None,
        }
    }

    /// First day of the month `years()` years before `today`; `None` for an unbounded window.
    pub fn start_date(&self, today: NaiveDate) -> Option<NaiveDate> {
        let years = self.years()?;
        NaiveDate::from_ymd_opt(today.year() - years, today.month(), 1)
    }

    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        self.start_date(today).is_none_or(|start| date >= start)
    }
}

impl Display for LookbackWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                LookbackWindow::OneYear => "1Y",
                LookbackWindow::ThreeYears => "3Y",
                LookbackWindow::FiveYears => "5Y",
                LookbackWindow::All => "ALL",
            }
        )
    }
}

impl FromStr for LookbackWindow {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "1Y" => Ok(LookbackWindow::OneYear),
            "3Y" => Ok(LookbackWindow::ThreeYears),
            "5Y" => Ok(LookbackWindow::FiveYears),
            "ALL" | "MAX" => Ok(LookbackWindow::All),
            _ => Err(anyhow::anyhow!("Invalid lookback window: {}", s)),
        }
    }
}
