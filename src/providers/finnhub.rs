use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::alpha_vantage::build_url;
use crate::core::market::{ProviderError, Result, SymbolMatch, SymbolSearchProvider};

/// Queries shorter than this return no suggestions without hitting the network.
pub const MIN_QUERY_LEN: usize = 2;

pub struct FinnhubSearchProvider {
    base_url: String,
    api_key: String,
}

impl FinnhubSearchProvider {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        FinnhubSearchProvider {
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct SearchResponse {
    #[serde(default)]
    result: Vec<SearchItem>,
}

#[derive(Deserialize, Debug)]
struct SearchItem {
    #[serde(default)]
    description: String,
    #[serde(alias = "displaySymbol")]
    display_symbol: Option<String>,
    symbol: String,
    #[serde(rename = "type", default)]
    kind: String,
}

impl From<SearchItem> for SymbolMatch {
    fn from(item: SearchItem) -> Self {
        SymbolMatch {
            symbol: item.display_symbol.unwrap_or(item.symbol),
            description: item.description,
            kind: item.kind,
        }
    }
}

#[async_trait]
impl SymbolSearchProvider for FinnhubSearchProvider {
    #[instrument(name = "FinnhubSymbolSearch", skip(self), fields(query = %query))]
    async fn search(&self, query: &str) -> Result<Vec<SymbolMatch>> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_LEN {
            debug!("Query too short, skipping search");
            return Ok(Vec::new());
        }

        let url = build_url(
            &self.base_url,
            "/api/v1/search",
            &[("q", query), ("token", self.api_key.as_str()), ("exchange", "US")],
        )?;
        debug!("Requesting symbol search from {}/api/v1/search", self.base_url);

        let request_error = |source| ProviderError::Request {
            symbol: query.to_string(),
            source,
        };
        let client = reqwest::Client::builder()
            .user_agent("spycompare/1.0")
            .build()
            .map_err(request_error)?;
        let response = client.get(url).send().await.map_err(request_error)?;

        if !response.status().is_success() {
            return Err(ProviderError::Status {
                symbol: query.to_string(),
                status: response.status(),
            });
        }

        let text = response.text().await.map_err(request_error)?;
        let data: SearchResponse =
            serde_json::from_str(&text).map_err(|e| ProviderError::Parse {
                symbol: query.to_string(),
                message: e.to_string(),
            })?;

        debug!(matches = data.result.len(), "Received Finnhub suggestions");
        Ok(data.result.into_iter().map(SymbolMatch::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_mock_server(query: &str, status: u16, body: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/search"))
            .and(query_param("q", query))
            .and(query_param("token", "tok"))
            .and(query_param("exchange", "US"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;

        mock_server
    }

    #[tokio::test]
    async fn test_successful_search() {
        let mock_response = r#"{
            "count": 2,
            "result": [
                {
                    "description": "APPLE INC",
                    "displaySymbol": "AAPL",
                    "symbol": "AAPL",
                    "type": "Common Stock"
                },
                {
                    "description": "APPLE HOSPITALITY REIT INC",
                    "displaySymbol": "APLE",
                    "symbol": "APLE",
                    "type": "REIT"
                }
            ]
        }"#;
        let mock_server = create_mock_server("apple", 200, mock_response).await;
        let provider = FinnhubSearchProvider::new(&mock_server.uri(), "tok");

        let matches = provider.search("apple").await.unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(
            matches[0],
            SymbolMatch {
                symbol: "AAPL".to_string(),
                description: "APPLE INC".to_string(),
                kind: "Common Stock".to_string(),
            }
        );
        assert_eq!(matches[1].kind, "REIT");
    }

    #[tokio::test]
    async fn test_short_query_skips_request() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;
        let provider = FinnhubSearchProvider::new(&mock_server.uri(), "tok");

        assert!(provider.search(" a ").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_result_is_empty() {
        let mock_server = create_mock_server("zzzz", 200, r#"{"count": 0}"#).await;
        let provider = FinnhubSearchProvider::new(&mock_server.uri(), "tok");

        assert!(provider.search("zzzz").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_api_error() {
        let mock_server = create_mock_server("apple", 401, r#"{"error": "Invalid API key"}"#).await;
        let provider = FinnhubSearchProvider::new(&mock_server.uri(), "tok");

        let err = provider.search("apple").await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP error: 401 Unauthorized for symbol: apple");
    }
}
