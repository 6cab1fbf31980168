pub mod alpha_vantage;
pub mod caching;
pub mod finnhub;

pub use caching::{CachingMarketDataProvider, SeriesCache};
