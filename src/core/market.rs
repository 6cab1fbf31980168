//! Market data abstractions

use crate::core::series::PricePoint;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure to obtain data from an upstream provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Request error for symbol {symbol}: {source}")]
    Request {
        symbol: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error: {status} for symbol: {symbol}")]
    Status {
        symbol: String,
        status: reqwest::StatusCode,
    },

    #[error("No data found for symbol: {symbol}{}", detail_suffix(.detail))]
    NotFound {
        symbol: String,
        detail: Option<String>,
    },

    #[error("Failed to parse response for {symbol}: {message}")]
    Parse { symbol: String, message: String },

    #[error("Invalid provider URL {url}: {message}")]
    InvalidUrl { url: String, message: String },
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail.as_deref().map(|d| format!(" ({d})")).unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, ProviderError>;

/// Source of monthly adjusted-close history.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Returns the full monthly series for `symbol`, newest first.
    async fn fetch_series(&self, symbol: &str) -> Result<Vec<PricePoint>>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolMatch {
    pub symbol: String,
    pub description: String,
    pub kind: String,
}

#[async_trait]
pub trait SymbolSearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SymbolMatch>>;
}
