// src/infrastructure/yahoo/mod.rs
// Yahoo Finance chart API price repository

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime};
use hyper::client::HttpConnector;
use hyper::{header, Body, Client, Method, Request};
use hyper_tls::HttpsConnector;
use serde_json::Value;
use std::time::Duration;

use crate::domain::errors::{MarketDataError, MarketDataResult};
use crate::domain::models::PriceSeries;
use crate::domain::repository::PriceRepository;

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

const USER_AGENT: &str = "Mozilla/5.0 (compatible; stock_decompose)";

pub struct YahooPriceSource {
    client: Client<HttpsConnector<HttpConnector>>,
    base_url: String,
    timeout: Duration,
}

impl YahooPriceSource {
    pub fn new(timeout: Duration) -> Self {
        let https = HttpsConnector::new();
        let client = Client::builder().build::<_, Body>(https);

        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Daily chart URL covering `[start, end)`.
    pub fn chart_url(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> String {
        format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d&events=history&includeAdjustedClose=true",
            self.base_url,
            encode_symbol(ticker),
            unix_seconds(start),
            unix_seconds(end)
        )
    }

    async fn get(&self, url: &str) -> MarketDataResult<Vec<u8>> {
        let request = Request::builder()
            .method(Method::GET)
            .uri(url)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::ACCEPT, "application/json")
            .body(Body::empty())
            .map_err(|e| MarketDataError::Request(format!("Invalid request for {}: {}", url, e)))?;

        let response = tokio::time::timeout(self.timeout, self.client.request(request))
            .await
            .map_err(|_| {
                MarketDataError::Request(format!(
                    "Request timed out after {}s",
                    self.timeout.as_secs()
                ))
            })??;

        let status = response.status();
        let body = hyper::body::to_bytes(response.into_body()).await?;

        if !status.is_success() {
            return Err(MarketDataError::Http(format!(
                "{} returned {}: {}",
                url,
                status,
                String::from_utf8_lossy(&body)
            )));
        }

        Ok(body.to_vec())
    }
}

#[async_trait]
impl PriceRepository for YahooPriceSource {
    async fn fetch_prices(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> MarketDataResult<PriceSeries> {
        let url = self.chart_url(ticker, start, end);
        log::debug!("GET {}", url);

        let body = self.get(&url).await?;
        let mut prices = parse_chart_response(ticker, &body)?;
        prices.points.retain(|p| p.date >= start && p.date < end);

        if prices.points.is_empty() {
            return Err(MarketDataError::NoData(format!(
                "{} between {} and {}",
                ticker, start, end
            )));
        }

        log::info!("Fetched {} daily prices for {}", prices.points.len(), ticker);
        Ok(prices)
    }

    fn name(&self) -> &str {
        "yahoo"
    }
}

/// Percent-encode a symbol for use as a path segment. Index symbols such as
/// `^GSPC` and share classes such as `BRK/B` carry reserved characters.
fn encode_symbol(symbol: &str) -> String {
    let mut encoded = String::with_capacity(symbol.len());
    for byte in symbol.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

fn unix_seconds(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

/// Parse a chart API response. Adjusted close is preferred over close;
/// `null` prices are skipped.
pub fn parse_chart_response(ticker: &str, body: &[u8]) -> MarketDataResult<PriceSeries> {
    let json: Value = serde_json::from_slice(body)
        .map_err(|e| MarketDataError::InvalidFormat(format!("{}: {}", ticker, e)))?;

    let chart = json
        .get("chart")
        .ok_or_else(|| MarketDataError::InvalidFormat(format!("{}: missing chart", ticker)))?;

    if let Some(error) = chart.get("error").filter(|e| !e.is_null()) {
        let description = error
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        return Err(MarketDataError::NoData(format!("{}: {}", ticker, description)));
    }

    let result = chart
        .get("result")
        .and_then(|r| r.get(0))
        .ok_or_else(|| MarketDataError::NoData(ticker.to_string()))?;

    let timestamps = result
        .get("timestamp")
        .and_then(Value::as_array)
        .ok_or_else(|| MarketDataError::NoData(format!("{}: no timestamps", ticker)))?;

    // Timestamps are market open in UTC; shift to the exchange's calendar day
    let offset = result
        .pointer("/meta/gmtoffset")
        .and_then(Value::as_i64)
        .unwrap_or(0);

    let closes = result
        .pointer("/indicators/adjclose/0/adjclose")
        .and_then(Value::as_array)
        .or_else(|| {
            result
                .pointer("/indicators/quote/0/close")
                .and_then(Value::as_array)
        })
        .ok_or_else(|| MarketDataError::InvalidFormat(format!("{}: no close prices", ticker)))?;

    if closes.len() != timestamps.len() {
        return Err(MarketDataError::InvalidFormat(format!(
            "{}: {} timestamps but {} prices",
            ticker,
            timestamps.len(),
            closes.len()
        )));
    }

    let mut prices = PriceSeries::new(ticker);
    for (ts, close) in timestamps.iter().zip(closes) {
        let ts = ts
            .as_i64()
            .ok_or_else(|| MarketDataError::Parse(format!("Invalid timestamp {}", ts)))?;
        let Some(close) = close.as_f64() else {
            continue;
        };
        let date = DateTime::from_timestamp(ts + offset, 0)
            .ok_or_else(|| MarketDataError::Parse(format!("Timestamp out of range: {}", ts)))?
            .date_naive();
        prices.add_point(date, close);
    }

    prices.normalize();
    Ok(prices)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_prefers_adjusted_close() {
        // 2024-01-02 and 2024-01-03, 14:30 UTC
        let body = br#"{
            "chart": {
                "result": [{
                    "meta": {"symbol": "AAPL", "gmtoffset": -18000},
                    "timestamp": [1704205800, 1704292200, 1704378600],
                    "indicators": {
                        "quote": [{"close": [185.64, 184.25, null]}],
                        "adjclose": [{"adjclose": [184.9, 183.5, null]}]
                    }
                }],
                "error": null
            }
        }"#;

        let prices = parse_chart_response("AAPL", body).unwrap();
        assert_eq!(prices.ticker, "AAPL");
        assert_eq!(prices.close_prices(), vec![184.9, 183.5]);
        assert_eq!(prices.dates(), vec![date(2024, 1, 2), date(2024, 1, 3)]);
    }

    #[test]
    fn test_parse_falls_back_to_close() {
        let body = br#"{"chart": {"result": [{
            "timestamp": [1704205800],
            "indicators": {"quote": [{"close": [185.64]}]}
        }], "error": null}}"#;

        let prices = parse_chart_response("MSFT", body).unwrap();
        assert_eq!(prices.close_prices(), vec![185.64]);
    }

    #[test]
    fn test_parse_api_error() {
        let body = br#"{"chart": {"result": null, "error": {
            "code": "Not Found",
            "description": "No data found, symbol may be delisted"
        }}}"#;

        match parse_chart_response("XXXX", body) {
            Err(MarketDataError::NoData(msg)) => assert!(msg.contains("delisted")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_chart_response("AAPL", b"<html>"),
            Err(MarketDataError::InvalidFormat(_))
        ));
    }

    #[tokio::test]
    async fn test_chart_url() {
        let source = YahooPriceSource::new(Duration::from_secs(5)).with_base_url("http://localhost:8080/");
        let url = source.chart_url("NVDA", date(2016, 1, 1), date(2016, 1, 2));
        assert_eq!(
            url,
            "http://localhost:8080/v8/finance/chart/NVDA?period1=1451606400&period2=1451692800&interval=1d&events=history&includeAdjustedClose=true"
        );
    }

    #[test]
    fn test_symbols_are_percent_encoded() {
        assert_eq!(encode_symbol("BRK-B"), "BRK-B");
        assert_eq!(encode_symbol("^GSPC"), "%5EGSPC");
        assert_eq!(encode_symbol("BRK/B"), "BRK%2FB");
        assert_eq!(encode_symbol("A B"), "A%20B");
    }

    #[tokio::test]
    async fn test_index_symbol_url_is_a_valid_uri() {
        let source = YahooPriceSource::new(Duration::from_secs(5));
        let url = source.chart_url("^GSPC", date(2016, 1, 1), date(2016, 1, 2));
        assert!(url.contains("/v8/finance/chart/%5EGSPC?"));
        assert!(url.parse::<hyper::Uri>().is_ok());
    }
}
