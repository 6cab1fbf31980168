use std::fs;
use tracing::info;

mod test_utils {
    use chrono::{Datelike, Local, Months, NaiveDate};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Alpha Vantage style body with `months` month-end closes ending last month.
    pub fn monthly_body(months: u32, start_price: f64, step: f64) -> String {
        let today = Local::now().date_naive();
        let first_of_month = NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap();
        let entries: Vec<String> = (0..months)
            .map(|i| {
                let month_end = first_of_month - Months::new(i) - chrono::Duration::days(1);
                let price = start_price + step * f64::from(months - 1 - i);
                format!(
                    r#""{month_end}": {{ "4. close": "{price:.2}", "5. adjusted close": "{price:.4}" }}"#
                )
            })
            .collect();
        format!(
            r#"{{ "Monthly Adjusted Time Series": {{ {} }} }}"#,
            entries.join(",\n")
        )
    }

    pub async fn mount_series(server: &MockServer, symbol: &str, body: String, times: u64) {
        Mock::given(method("GET"))
            .and(path("/query"))
            .and(query_param("function", "TIME_SERIES_MONTHLY_ADJUSTED"))
            .and(query_param("symbol", symbol))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(times)
            .mount(server)
            .await;
    }

    pub fn write_config(server_uri: &str) -> tempfile::NamedTempFile {
        let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        let config_content = format!(
            r#"
            benchmark: "SPY"
            default_range: "ALL"
            providers:
              alpha_vantage:
                base_url: {server_uri}
                api_key: "test-key"
              finnhub:
                base_url: {server_uri}
                api_key: "test-token"
        "#
        );
        std::fs::write(config_file.path(), config_content).expect("Failed to write config file");
        config_file
    }
}

#[test_log::test(tokio::test)]
async fn test_compare_flow_fetches_benchmark_once() {
    let mock_server = wiremock::MockServer::start().await;
    test_utils::mount_series(&mock_server, "SPY", test_utils::monthly_body(24, 400.0, 5.0), 1)
        .await;
    test_utils::mount_series(&mock_server, "AAPL", test_utils::monthly_body(30, 150.0, 2.0), 1)
        .await;
    test_utils::mount_series(&mock_server, "MSFT", test_utils::monthly_body(12, 300.0, 4.0), 1)
        .await;

    let config_file = test_utils::write_config(&mock_server.uri());

    // Lowercase input is normalized; the shared cache serves SPY for the second symbol
    let result = spycompare::run_command(
        spycompare::AppCommand::Compare {
            symbols: vec!["aapl".to_string(), " MSFT ".to_string()],
            range: None,
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Compare command failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_benchmark_only_flow() {
    let mock_server = wiremock::MockServer::start().await;
    test_utils::mount_series(&mock_server, "SPY", test_utils::monthly_body(6, 400.0, 5.0), 1)
        .await;

    let config_file = test_utils::write_config(&mock_server.uri());

    let result = spycompare::run_command(
        spycompare::AppCommand::Compare {
            symbols: Vec::new(),
            range: Some(spycompare::core::series::LookbackWindow::OneYear),
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Compare command failed: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_unknown_symbol_shows_error_view() {
    let mock_server = wiremock::MockServer::start().await;
    test_utils::mount_series(&mock_server, "SPY", test_utils::monthly_body(6, 400.0, 5.0), 1)
        .await;
    test_utils::mount_series(
        &mock_server,
        "NOPE",
        r#"{"Error Message": "Invalid API call."}"#.to_string(),
        1,
    )
    .await;

    let config_file = test_utils::write_config(&mock_server.uri());

    // The failed view is reported to the user, not returned as an application error
    let result = spycompare::run_command(
        spycompare::AppCommand::Compare {
            symbols: vec!["NOPE".to_string()],
            range: None,
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Compare command failed: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_search_flow_with_mock() {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, ResponseTemplate};

    let mock_server = wiremock::MockServer::start().await;
    let mock_response = r#"{
        "count": 1,
        "result": [{
            "description": "APPLE INC",
            "displaySymbol": "AAPL",
            "symbol": "AAPL",
            "type": "Common Stock"
        }]
    }"#;
    Mock::given(method("GET"))
        .and(path("/api/v1/search"))
        .and(query_param("q", "apple"))
        .and(query_param("token", "test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config_file = test_utils::write_config(&mock_server.uri());
    info!(uri = %mock_server.uri(), "Running search against mock server");

    let result = spycompare::run_command(
        spycompare::AppCommand::Search {
            query: "apple".to_string(),
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Search command failed: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_search_failure_is_an_error() {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, ResponseTemplate};

    let mock_server = wiremock::MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let config_file = test_utils::write_config(&mock_server.uri());

    let result = spycompare::run_command(
        spycompare::AppCommand::Search {
            query: "apple".to_string(),
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    let err = result.expect_err("Search should fail on a server error");
    assert!(err.to_string().contains("Failed to search symbols for 'apple'"));
}

#[test_log::test(tokio::test)]
async fn test_invalid_config_path_fails() {
    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let missing = dir.path().join("missing.yaml");

    let result = spycompare::run_command(
        spycompare::AppCommand::Compare {
            symbols: Vec::new(),
            range: None,
        },
        Some(missing.to_str().unwrap()),
    )
    .await;
    assert!(result.is_err());
}

#[test_log::test(tokio::test)]
async fn test_malformed_config_fails() {
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    fs::write(config_file.path(), "default_range: [not, a, range]")
        .expect("Failed to write config file");

    let result = spycompare::run_command(
        spycompare::AppCommand::Compare {
            symbols: Vec::new(),
            range: None,
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(
        result
            .unwrap_err()
            .to_string()
            .contains("Failed to parse config file")
    );
}
