// src/market_data/resample.rs
// Business-day regularization of raw price histories

use crate::domain::errors::{MarketDataError, MarketDataResult};
use crate::domain::models::{is_business_day, next_business_day, PriceSeries, Series};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Fill interior gaps by linear interpolation between the neighbouring known
/// values. Trailing gaps repeat the last known value; leading gaps stay `None`.
pub fn fill_linear(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut filled = values.to_vec();
    let mut last_known: Option<(usize, f64)> = None;

    for i in 0..values.len() {
        let Some(current) = values[i] else {
            continue;
        };
        if let Some((j, previous)) = last_known {
            let span = (i - j) as f64;
            for (step, slot) in filled.iter_mut().enumerate().take(i).skip(j + 1) {
                let weight = (step - j) as f64 / span;
                *slot = Some(previous + (current - previous) * weight);
            }
        }
        last_known = Some((i, current));
    }

    if let Some((j, last)) = last_known {
        for slot in filled.iter_mut().skip(j + 1) {
            *slot = Some(last);
        }
    }

    filled
}

/// Business days from `start` to `end` inclusive. A weekend `start` moves to
/// the following Monday.
pub fn business_days(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut current = if is_business_day(start) {
        start
    } else {
        next_business_day(start)
    };
    while current <= end {
        dates.push(current);
        current = next_business_day(current);
    }
    dates
}

/// Reindex `prices` to business-day frequency and interpolate the gaps.
///
/// Weekend observations are dropped. Business days before the first known
/// price are trimmed, since nothing can be interpolated there.
pub fn to_business_days(prices: &PriceSeries) -> MarketDataResult<Series> {
    let mut prices = prices.clone();
    prices.normalize();

    let (first, last) = match (prices.points.first(), prices.points.last()) {
        (Some(first), Some(last)) => (first.date, last.date),
        _ => return Err(MarketDataError::NoData(prices.ticker.clone())),
    };

    let known: HashMap<NaiveDate, f64> = prices
        .points
        .iter()
        .filter(|p| p.close.is_finite())
        .map(|p| (p.date, p.close))
        .collect();

    let index = business_days(first, last);
    let raw: Vec<Option<f64>> = index.iter().map(|d| known.get(d).copied()).collect();
    let filled = fill_linear(&raw);

    let leading = filled.iter().take_while(|v| v.is_none()).count();
    if leading == filled.len() {
        return Err(MarketDataError::NoData(format!(
            "{}: no business-day prices",
            prices.ticker
        )));
    }

    let gaps = raw.iter().filter(|v| v.is_none()).count();
    log::debug!(
        "{}: {} business days, {} interpolated, {} leading days trimmed",
        prices.ticker,
        index.len(),
        gaps.saturating_sub(leading),
        leading
    );

    let dates = index[leading..].to_vec();
    let values = filled[leading..].iter().flatten().copied().collect();

    Ok(Series::from_dates(&prices.ticker, dates, values))
}
