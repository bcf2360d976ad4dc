// src/application/usecase/decomposition_usecase.rs
// Fetch -> regularize -> decompose, per ticker

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::join_all;

use crate::application::dto::{DecompositionRequest, TickerDecomposition};
use crate::domain::errors::{AppError, AppResult};
use crate::domain::repository::PriceRepository;
use crate::domain::service::DecompositionService;
use crate::market_data::{to_business_days, PriceCache};

#[async_trait]
pub trait DecompositionUseCase {
    /// Decompose the configured date range of one ticker.
    async fn decompose_ticker(&self, ticker: &str) -> AppResult<TickerDecomposition>;

    /// Decompose several tickers concurrently. Each outcome is reported
    /// independently; one failure does not stop the others.
    async fn decompose_all(&self, tickers: &[String]) -> Vec<(String, AppResult<TickerDecomposition>)>;
}

pub struct DecompositionProcessor {
    repository: Arc<dyn PriceRepository>,
    cache: PriceCache,
    service: Arc<dyn DecompositionService>,
    request: DecompositionRequest,
}

impl DecompositionProcessor {
    pub fn new(
        repository: Arc<dyn PriceRepository>,
        cache: PriceCache,
        service: Arc<dyn DecompositionService>,
        request: DecompositionRequest,
    ) -> Self {
        Self {
            repository,
            cache,
            service,
            request,
        }
    }
}

#[async_trait]
impl DecompositionUseCase for DecompositionProcessor {
    async fn decompose_ticker(&self, ticker: &str) -> AppResult<TickerDecomposition> {
        let request = &self.request;
        let prices = self
            .cache
            .get_or_fetch(self.repository.as_ref(), ticker, request.start, request.end)
            .await?;

        let series = to_business_days(&prices)?;
        log::info!(
            "{}: {} business days, decomposing with period {} ({} model)",
            ticker,
            series.len(),
            request.period,
            request.model
        );

        // The engine is CPU-bound; keep it off the async workers and bound it
        let service = self.service.clone();
        let (period, model) = (request.period, request.model);
        let job = tokio::task::spawn_blocking(move || {
            let result = service.decompose(&series, period, model);
            (series, result)
        });

        let (series, result) = tokio::time::timeout(request.timeout, job)
            .await
            .map_err(|_| {
                AppError::Timeout(format!(
                    "{}: decomposition exceeded {}s",
                    ticker,
                    request.timeout.as_secs()
                ))
            })?
            .map_err(|e| AppError::Unknown(format!("{}: decomposition task failed: {}", ticker, e)))?;

        Ok(TickerDecomposition {
            ticker: prices.ticker.clone(),
            series,
            result: result?,
        })
    }

    async fn decompose_all(&self, tickers: &[String]) -> Vec<(String, AppResult<TickerDecomposition>)> {
        let jobs = tickers.iter().map(|ticker| async move {
            let outcome = self.decompose_ticker(ticker).await;
            if let Err(e) = &outcome {
                log::warn!("Unable to perform decomposition for {}: {}", ticker, e);
            }
            (ticker.clone(), outcome)
        });

        join_all(jobs).await
    }
}
