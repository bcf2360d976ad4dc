// src/adapter/coordinator.rs
// Runs the decomposition use case and hands each outcome to the renderer

use std::path::PathBuf;
use std::sync::Arc;

use crate::adapter::report::{render, OutputFormat};
use crate::application::usecase::DecompositionUseCase;
use crate::domain::errors::AppResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
}

pub struct ReportCoordinator {
    usecase: Arc<dyn DecompositionUseCase + Send + Sync>,
    format: OutputFormat,
    directory: Option<PathBuf>,
}

impl ReportCoordinator {
    pub fn new(
        usecase: Arc<dyn DecompositionUseCase + Send + Sync>,
        format: OutputFormat,
        directory: Option<PathBuf>,
    ) -> Self {
        Self {
            usecase,
            format,
            directory,
        }
    }

    /// Decompose and report every ticker. A ticker that fails is counted and
    /// skipped; only output errors abort the run.
    pub async fn run(&self, tickers: &[String]) -> AppResult<RunSummary> {
        let mut summary = RunSummary::default();

        for (ticker, outcome) in self.usecase.decompose_all(tickers).await {
            match outcome {
                Ok(decomposition) => {
                    let rendered = render(&decomposition, self.format)?;
                    self.emit(&ticker, &rendered)?;
                    summary.succeeded += 1;
                }
                Err(_) => summary.failed += 1,
            }
        }

        log::info!(
            "Decomposed {} of {} tickers",
            summary.succeeded,
            summary.succeeded + summary.failed
        );
        Ok(summary)
    }

    fn emit(&self, ticker: &str, rendered: &str) -> AppResult<()> {
        match &self.directory {
            Some(dir) => {
                std::fs::create_dir_all(dir)?;
                let path = dir.join(format!(
                    "{}_decomposition.{}",
                    ticker.to_uppercase(),
                    self.format.extension()
                ));
                std::fs::write(&path, rendered)?;
                log::info!("Wrote {}", path.display());
            }
            None => println!("{}", rendered),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dto::TickerDecomposition;
    use crate::analysis::seasonal_decompose;
    use crate::domain::errors::MarketDataError;
    use crate::domain::models::{DecompositionModel, Series};
    use async_trait::async_trait;

    struct StubUseCase;

    #[async_trait]
    impl DecompositionUseCase for StubUseCase {
        async fn decompose_ticker(&self, ticker: &str) -> AppResult<TickerDecomposition> {
            if ticker == "BAD" {
                return Err(MarketDataError::NoData(ticker.to_string()).into());
            }
            let values: Vec<f64> = (0..12).map(|i| 10.0 + (i % 3) as f64).collect();
            let result = seasonal_decompose(&values, 3, DecompositionModel::Additive)?;
            Ok(TickerDecomposition {
                ticker: ticker.to_string(),
                series: Series::regular(ticker, values),
                result,
            })
        }

        async fn decompose_all(
            &self,
            tickers: &[String],
        ) -> Vec<(String, AppResult<TickerDecomposition>)> {
            let mut outcomes = Vec::new();
            for ticker in tickers {
                outcomes.push((ticker.clone(), self.decompose_ticker(ticker).await));
            }
            outcomes
        }
    }

    #[tokio::test]
    async fn test_run_writes_one_file_per_ticker() {
        let dir = tempfile::tempdir().unwrap();
        let coordinator = ReportCoordinator::new(
            Arc::new(StubUseCase),
            OutputFormat::Csv,
            Some(dir.path().join("out")),
        );
        let tickers = vec!["aapl".to_string(), "BAD".to_string(), "MSFT".to_string()];

        let summary = coordinator.run(&tickers).await.unwrap();
        assert_eq!(
            summary,
            RunSummary {
                succeeded: 2,
                failed: 1
            }
        );

        let written = std::fs::read_to_string(dir.path().join("out/AAPL_decomposition.csv")).unwrap();
        assert_eq!(written.lines().count(), 13);
        assert!(dir.path().join("out/MSFT_decomposition.csv").exists());
        assert!(!dir.path().join("out/BAD_decomposition.csv").exists());
    }
}
