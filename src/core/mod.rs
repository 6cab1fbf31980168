//! Core business logic abstractions

pub mod align;
pub mod cache;
pub mod clock;
pub mod config;
pub mod log;
pub mod market;
pub mod series;

// Re-export main types for cleaner imports
pub use align::{AxisBounds, Comparison, PairingStrategy, PerformanceSummary};
pub use cache::MonthlyCache;
pub use clock::{Clock, FixedClock, SystemClock};
pub use market::{MarketDataProvider, ProviderError, SymbolMatch, SymbolSearchProvider};
pub use series::{ComparisonPoint, LookbackWindow, PricePoint};
