//! Symbol selection flow: fetch (through the cache) and align subject and benchmark.

use crate::core::align::{Comparison, PairingStrategy};
use crate::core::clock::Clock;
use crate::core::market::{MarketDataProvider, Result};
use crate::core::series::{LookbackWindow, PricePoint};
use futures::future::try_join;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Message shown in place of the comparison when any fetch fails.
pub const FETCH_ERROR_MESSAGE: &str =
    "Error fetching stock data. Please enter valid symbol or try again later.";

/// Trims and uppercases user input; blank input means no subject.
pub fn normalize_symbol(input: &str) -> Option<String> {
    let symbol = input.trim();
    (!symbol.is_empty()).then(|| symbol.to_uppercase())
}

/// Raw series for one selection, kept so the window can change without refetching.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSeries {
    pub subject_symbol: Option<String>,
    pub benchmark_symbol: String,
    pub subject: Vec<PricePoint>,
    pub benchmark: Vec<PricePoint>,
}

impl LoadedSeries {
    pub fn align(
        &self,
        window: LookbackWindow,
        today: chrono::NaiveDate,
        pairing: PairingStrategy,
    ) -> Comparison {
        Comparison::build(&self.subject, &self.benchmark, window, today, pairing)
    }
}

pub struct ComparisonService {
    market: Arc<dyn MarketDataProvider>,
    clock: Arc<dyn Clock>,
    benchmark: String,
    pairing: PairingStrategy,
}

impl ComparisonService {
    /// `market` is expected to be cache-backed; this type does no caching of its own.
    pub fn new(
        market: Arc<dyn MarketDataProvider>,
        clock: Arc<dyn Clock>,
        benchmark: &str,
        pairing: PairingStrategy,
    ) -> Self {
        Self {
            market,
            clock,
            benchmark: benchmark.to_string(),
            pairing,
        }
    }

    pub fn benchmark(&self) -> &str {
        &self.benchmark
    }

    pub fn pairing(&self) -> PairingStrategy {
        self.pairing
    }

    /// Fetches the subject (if any) and benchmark concurrently. Either failure fails the load.
    #[instrument(name = "LoadComparison", skip(self), fields(benchmark = %self.benchmark))]
    pub async fn load(&self, subject: Option<&str>) -> Result<LoadedSeries> {
        let subject_fut = async {
            match subject {
                Some(symbol) => self.market.fetch_series(symbol).await,
                None => Ok(Vec::new()),
            }
        };
        let benchmark_fut = self.market.fetch_series(&self.benchmark);

        let (subject_series, benchmark_series) = try_join(subject_fut, benchmark_fut).await?;
        info!(
            subject_points = subject_series.len(),
            benchmark_points = benchmark_series.len(),
            "Loaded series"
        );

        Ok(LoadedSeries {
            subject_symbol: subject.map(str::to_string),
            benchmark_symbol: self.benchmark.clone(),
            subject: subject_series,
            benchmark: benchmark_series,
        })
    }

    pub fn align(&self, loaded: &LoadedSeries, window: LookbackWindow) -> Comparison {
        let comparison = loaded.align(window, self.clock.today(), self.pairing);
        debug!(points = comparison.points.len(), %window, "Built comparison");
        comparison
    }

    pub async fn compare(
        &self,
        subject: Option<&str>,
        window: LookbackWindow,
    ) -> Result<(LoadedSeries, Comparison)> {
        let loaded = self.load(subject).await?;
        let comparison = self.align(&loaded, window);
        Ok((loaded, comparison))
    }
}
