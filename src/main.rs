// src/main.rs
use stock_decompose::adapter::ReportCoordinator;
use stock_decompose::analysis::ClassicalDecomposer;
use stock_decompose::application::dto::DecompositionRequest;
use stock_decompose::application::usecase::DecompositionProcessor;
use stock_decompose::config::Config;
use stock_decompose::domain::errors::{AppError, AppResult};
use stock_decompose::domain::repository::PriceRepository;
use stock_decompose::infrastructure::{CsvPriceSource, YahooPriceSource};
use stock_decompose::market_data::PriceCache;

use std::path::PathBuf;
use std::sync::Arc;
use tokio::time::Duration;

#[tokio::main]
async fn main() -> AppResult<()> {
    // Load configuration, from CONFIG_FILE when set
    dotenv::dotenv().ok();
    let config = match std::env::var("CONFIG_FILE") {
        Ok(path) => Config::from_file(path)?,
        Err(_) => Config::from_env()?,
    };

    // Initialize logging
    config.init_logging()?;
    config.validate()?;

    log::info!("Starting stock_decompose v{}", env!("CARGO_PKG_VERSION"));
    log::info!(
        "Tickers {:?}, {} to {}, {} model, period {}",
        config.data.tickers,
        config.data.start_date,
        config.data.end_date,
        config.decomposition.model,
        config.decomposition.period
    );

    let repository = create_price_source(&config)?;
    log::info!("Using {} price source", repository.name());

    let processor = DecompositionProcessor::new(
        repository,
        PriceCache::new(),
        Arc::new(ClassicalDecomposer::new()),
        DecompositionRequest::from(&config),
    );

    let coordinator = ReportCoordinator::new(
        Arc::new(processor),
        config.output.format,
        config.output.directory.as_ref().map(PathBuf::from),
    );

    let summary = coordinator.run(&config.data.tickers).await?;
    if summary.failed > 0 {
        log::warn!("{} ticker(s) could not be decomposed", summary.failed);
    }

    log::info!("Done.");
    Ok(())
}

/// Create the price source named in the configuration
fn create_price_source(config: &Config) -> AppResult<Arc<dyn PriceRepository>> {
    match config.data.source.to_lowercase().as_str() {
        "yahoo" => Ok(Arc::new(YahooPriceSource::new(Duration::from_secs(
            config.data.request_timeout_secs,
        )))),
        "csv" => {
            let dir = config.data.csv_dir.as_deref().ok_or_else(|| {
                AppError::Config("CSV_DIR is required for the csv data source".to_string())
            })?;
            Ok(Arc::new(CsvPriceSource::new(dir)))
        }
        _ => Err(AppError::Config(format!(
            "Unsupported data source: {}",
            config.data.source
        ))),
    }
}
