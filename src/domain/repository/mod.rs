// src/domain/repository/mod.rs
// Repository interfaces for price data

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::errors::MarketDataResult;
use crate::domain::models::PriceSeries;

/// Source of daily close prices for a ticker.
#[async_trait]
pub trait PriceRepository: Send + Sync {
    /// Fetch prices for `ticker` on dates in `[start, end)`.
    async fn fetch_prices(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> MarketDataResult<PriceSeries>;

    /// Short name used in log lines.
    fn name(&self) -> &str;
}
