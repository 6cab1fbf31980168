pub mod cli;
pub mod comparison;
pub mod core;
pub mod providers;

use crate::comparison::ComparisonService;
use crate::core::clock::{Clock, SystemClock};
use crate::core::config::AppConfig;
use crate::core::series::LookbackWindow;
use crate::providers::alpha_vantage::AlphaVantageProvider;
use crate::providers::finnhub::FinnhubSearchProvider;
use crate::providers::{CachingMarketDataProvider, SeriesCache};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Compare each symbol against the benchmark; no symbols shows the benchmark alone.
    Compare {
        symbols: Vec<String>,
        range: Option<LookbackWindow>,
    },
    Search {
        query: String,
    },
    Interactive {
        range: Option<LookbackWindow>,
    },
}

fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");
    Ok(config)
}

fn build_service(config: &AppConfig, clock: Arc<dyn Clock>) -> ComparisonService {
    // One cache per process, shared by every selection made during this run
    let cache = Arc::new(SeriesCache::new());

    let alpha_vantage = &config.providers.alpha_vantage;
    let gateway = AlphaVantageProvider::new(&alpha_vantage.base_url, &alpha_vantage.api_key());
    let market = CachingMarketDataProvider::new(gateway, cache, Arc::clone(&clock));

    ComparisonService::new(Arc::new(market), clock, &config.benchmark, config.pairing)
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("SPY Compare starting...");
    let config = load_config(config_path)?;

    match command {
        AppCommand::Compare { symbols, range } => {
            let service = build_service(&config, Arc::new(SystemClock));
            let symbols: Vec<String> = symbols
                .iter()
                .filter_map(|s| comparison::normalize_symbol(s))
                .collect();
            let window = range.unwrap_or(config.default_range);
            cli::compare::run(&service, &symbols, window).await
        }
        AppCommand::Search { query } => {
            let finnhub = &config.providers.finnhub;
            let provider = FinnhubSearchProvider::new(&finnhub.base_url, &finnhub.api_key());
            cli::search::run(&provider, &query).await
        }
        AppCommand::Interactive { range } => {
            let service = build_service(&config, Arc::new(SystemClock));
            let window = range.unwrap_or(config.default_range);
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            cli::interactive::run(&service, stdin, window).await
        }
    }
}
