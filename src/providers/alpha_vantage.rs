use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Url;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::core::market::{MarketDataProvider, ProviderError, Result};
use crate::core::series::PricePoint;

const MONTHLY_ADJUSTED: &str = "TIME_SERIES_MONTHLY_ADJUSTED";

/// Builds `{base_url}{endpoint}?params`, shared by the HTTP providers.
pub(crate) fn build_url(base_url: &str, endpoint: &str, params: &[(&str, &str)]) -> Result<Url> {
    let raw = format!("{}{}", base_url.trim_end_matches('/'), endpoint);
    Url::parse_with_params(&raw, params).map_err(|e| ProviderError::InvalidUrl {
        url: raw.clone(),
        message: e.to_string(),
    })
}

// AlphaVantageProvider implementation for MarketDataProvider
pub struct AlphaVantageProvider {
    base_url: String,
    api_key: String,
}

impl AlphaVantageProvider {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        AlphaVantageProvider {
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct MonthlyAdjustedResponse {
    #[serde(rename = "Monthly Adjusted Time Series")]
    series: Option<HashMap<String, MonthlyBar>>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

#[derive(Deserialize, Debug)]
struct MonthlyBar {
    #[serde(rename = "5. adjusted close")]
    adjusted_close: String,
}

fn parse_series(symbol: &str, series: HashMap<String, MonthlyBar>) -> Result<Vec<PricePoint>> {
    let parse_error = |message: String| ProviderError::Parse {
        symbol: symbol.to_string(),
        message,
    };

    let mut points = series
        .into_iter()
        .map(|(date, bar)| {
            let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                .map_err(|e| parse_error(format!("invalid date '{date}': {e}")))?;
            let price = bar.adjusted_close.trim().parse::<f64>().map_err(|e| {
                parse_error(format!("invalid price '{}': {e}", bar.adjusted_close))
            })?;
            Ok(PricePoint::new(date, price))
        })
        .collect::<Result<Vec<_>>>()?;

    // Provider order: most recent month first
    points.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(points)
}

#[async_trait]
impl MarketDataProvider for AlphaVantageProvider {
    #[instrument(
        name = "AlphaVantageSeriesFetch",
        skip(self),
        fields(symbol = %symbol)
    )]
    async fn fetch_series(&self, symbol: &str) -> Result<Vec<PricePoint>> {
        let url = build_url(
            &self.base_url,
            "/query",
            &[
                ("function", MONTHLY_ADJUSTED),
                ("symbol", symbol),
                ("apikey", self.api_key.as_str()),
            ],
        )?;
        debug!("Requesting monthly series from {}/query", self.base_url);

        let request_error = |source| ProviderError::Request {
            symbol: symbol.to_string(),
            source,
        };

        let client = reqwest::Client::builder()
            .user_agent("spycompare/1.0")
            .build()
            .map_err(request_error)?;
        let response = client.get(url).send().await.map_err(request_error)?;

        debug!(status = %response.status(), "Received Alpha Vantage response");
        if !response.status().is_success() {
            return Err(ProviderError::Status {
                symbol: symbol.to_string(),
                status: response.status(),
            });
        }

        let text = response.text().await.map_err(request_error)?;
        let data: MonthlyAdjustedResponse =
            serde_json::from_str(&text).map_err(|e| ProviderError::Parse {
                symbol: symbol.to_string(),
                message: e.to_string(),
            })?;

        let series = match data.series {
            Some(series) if !series.is_empty() => series,
            _ => {
                return Err(ProviderError::NotFound {
                    symbol: symbol.to_string(),
                    detail: data.error_message.or(data.note).or(data.information),
                });
            }
        };

        let points = parse_series(symbol, series)?;
        debug!(points = points.len(), "Parsed monthly series");
        Ok(points)
    }
}
