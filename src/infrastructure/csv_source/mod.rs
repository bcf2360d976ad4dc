// src/infrastructure/csv_source/mod.rs
// Price repository backed by local CSV exports

use async_trait::async_trait;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

use crate::domain::errors::{MarketDataError, MarketDataResult};
use crate::domain::models::PriceSeries;
use crate::domain::repository::PriceRepository;

const DATE_COLUMN: &str = "date";
// Preferred first
const PRICE_COLUMNS: [&str; 2] = ["adj close", "close"];

/// Reads `{dir}/{TICKER}.csv` files with a `Date` column and an `Adj Close`
/// or `Close` column, as exported by most quote providers.
pub struct CsvPriceSource {
    dir: PathBuf,
}

impl CsvPriceSource {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, ticker: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", ticker.to_uppercase()))
    }
}

#[async_trait]
impl PriceRepository for CsvPriceSource {
    async fn fetch_prices(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> MarketDataResult<PriceSeries> {
        let path = self.path_for(ticker);
        if !path.exists() {
            return Err(MarketDataError::NoData(format!(
                "{}: {} not found",
                ticker,
                path.display()
            )));
        }

        let contents = tokio::fs::read_to_string(&path).await?;
        let mut prices = parse_price_csv(ticker, &contents)?;
        prices.points.retain(|p| p.date >= start && p.date < end);

        if prices.points.is_empty() {
            return Err(MarketDataError::NoData(format!(
                "{} between {} and {}",
                ticker, start, end
            )));
        }

        log::info!(
            "Loaded {} daily prices for {} from {}",
            prices.points.len(),
            ticker,
            path.display()
        );
        Ok(prices)
    }

    fn name(&self) -> &str {
        "csv"
    }
}

fn parse_date(field: &str) -> MarketDataResult<NaiveDate> {
    // Accept both "2024-01-02" and "2024-01-02 00:00:00-05:00"
    let day = field.trim().get(..10).unwrap_or(field);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|e| MarketDataError::Parse(format!("Invalid date '{}': {}", field, e)))
}

/// Parse CSV text into a price series. Rows with an empty or `null` price are
/// skipped so the regularization step can interpolate them.
pub fn parse_price_csv(ticker: &str, contents: &str) -> MarketDataResult<PriceSeries> {
    let mut reader = csv::Reader::from_reader(contents.as_bytes());
    let headers = reader.headers()?.clone();

    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    };

    let date_idx = find(DATE_COLUMN).ok_or_else(|| {
        MarketDataError::InvalidFormat(format!("{}: missing Date column", ticker))
    })?;
    let price_idx = PRICE_COLUMNS
        .iter()
        .find_map(|name| find(*name))
        .ok_or_else(|| {
            MarketDataError::InvalidFormat(format!("{}: missing Adj Close or Close column", ticker))
        })?;

    let mut prices = PriceSeries::new(ticker);
    for record in reader.records() {
        let record = record?;
        let (Some(date), Some(price)) = (record.get(date_idx), record.get(price_idx)) else {
            continue;
        };

        let price = price.trim();
        if price.is_empty() || price.eq_ignore_ascii_case("null") {
            continue;
        }

        let close = price
            .parse::<f64>()
            .map_err(|e| MarketDataError::Parse(format!("Invalid price '{}': {}", price, e)))?;
        prices.add_point(parse_date(date)?, close);
    }

    prices.normalize();
    Ok(prices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const SAMPLE: &str = "Date,Open,High,Low,Close,Adj Close,Volume\n\
        2024-01-03,184.2,185.8,183.4,184.25,183.5,58414500\n\
        2024-01-02,187.1,188.4,183.8,185.64,184.9,82488700\n\
        2024-01-04,182.1,183.0,180.8,181.91,null,71983600\n\
        2024-01-05,181.9,182.7,180.1,181.18,180.4,62303300\n";

    #[test]
    fn test_parse_prefers_adjusted_close() {
        let prices = parse_price_csv("AAPL", SAMPLE).unwrap();
        assert_eq!(prices.close_prices(), vec![184.9, 183.5, 180.4]);
        assert_eq!(prices.points[0].date, date(2024, 1, 2));
    }

    #[test]
    fn test_parse_close_only() {
        let csv = "date,close\n2024-01-02 00:00:00-05:00,10.5\n";
        let prices = parse_price_csv("MSFT", csv).unwrap();
        assert_eq!(prices.close_prices(), vec![10.5]);
        assert_eq!(prices.dates(), vec![date(2024, 1, 2)]);
    }

    #[test]
    fn test_parse_missing_columns() {
        assert!(matches!(
            parse_price_csv("MSFT", "Date,Volume\n2024-01-02,100\n"),
            Err(MarketDataError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_price_csv("MSFT", "Date,Close\n2024-01-02,abc\n"),
            Err(MarketDataError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_filters_range() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("AAPL.csv"), SAMPLE).unwrap();
        let source = CsvPriceSource::new(dir.path());

        let prices = source
            .fetch_prices("aapl", date(2024, 1, 3), date(2024, 1, 5))
            .await
            .unwrap();
        assert_eq!(prices.close_prices(), vec![183.5]);
    }

    #[tokio::test]
    async fn test_fetch_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = CsvPriceSource::new(dir.path());
        let result = source
            .fetch_prices("NVDA", date(2024, 1, 1), date(2024, 2, 1))
            .await;
        assert!(matches!(result, Err(MarketDataError::NoData(_))));
    }
}
