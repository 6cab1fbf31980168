use crate::core::cache::MonthlyCache;
use crate::core::clock::Clock;
use crate::core::market::{MarketDataProvider, Result};
use crate::core::series::PricePoint;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

pub type SeriesCache = MonthlyCache<String, Vec<PricePoint>>;

/// Serves series from a [`SeriesCache`] and only calls `inner` on a miss.
///
/// Only successful fetches are stored. The cache lock is not held across the fetch, so two
/// concurrent misses for one symbol both go upstream and the later write wins.
pub struct CachingMarketDataProvider<T: MarketDataProvider> {
    inner: T,
    cache: Arc<SeriesCache>,
    clock: Arc<dyn Clock>,
}

impl<T: MarketDataProvider> CachingMarketDataProvider<T> {
    pub fn new(inner: T, cache: Arc<SeriesCache>, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner,
            cache,
            clock,
        }
    }
}

#[async_trait]
impl<T: MarketDataProvider> MarketDataProvider for CachingMarketDataProvider<T> {
    async fn fetch_series(&self, symbol: &str) -> Result<Vec<PricePoint>> {
        let key = symbol.to_string();
        if let Some(series) = self.cache.get(&key, self.clock.now()).await {
            debug!("Cache hit for series: {}", symbol);
            return Ok(series);
        }

        debug!("Cache miss for series: {}", symbol);
        let series = self.inner.fetch_series(symbol).await?;
        self.cache.set(key, series.clone(), self.clock.now()).await;
        Ok(series)
    }
}
