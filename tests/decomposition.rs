// tests/decomposition.rs
// End-to-end checks of the public decomposition API

use chrono::NaiveDate;
use std::f64::consts::PI;
use stock_decompose::analysis::{decompose_series, decompose_tagged, seasonal_decompose};
use stock_decompose::domain::models::{next_business_day, DecompositionModel, PriceSeries, Series};
use stock_decompose::domain::DecompositionError;
use stock_decompose::market_data::to_business_days;

/// Two trading years of a yearly cycle over a rising line.
fn trading_years(model: DecompositionModel) -> Vec<f64> {
    (0..504)
        .map(|i| {
            let trend = 100.0 + 100.0 * i as f64 / 503.0;
            let cycle = (2.0 * PI * i as f64 / 252.0).sin();
            match model {
                DecompositionModel::Additive => trend + 10.0 * cycle,
                DecompositionModel::Multiplicative => trend * (1.0 + 0.05 * cycle),
            }
        })
        .collect()
}

#[test]
fn additive_trading_year() {
    let values = trading_years(DecompositionModel::Additive);
    let result = seasonal_decompose(&values, 252, DecompositionModel::Additive).unwrap();

    assert_eq!(result.len(), 504);
    assert_eq!(result.defined_trend(), 504 - 252);
    assert!(result.trend[125].is_none());
    assert!(result.trend[126].is_some());
    assert!(result.trend[377].is_some());
    assert!(result.trend[378].is_none());

    for (i, rebuilt) in result.reconstruct().iter().enumerate() {
        if let Some(r) = rebuilt {
            assert!((r - values[i]).abs() <= 1e-9 * values[i].abs());
        }
    }
}

#[test]
fn multiplicative_trading_year() {
    let values = trading_years(DecompositionModel::Multiplicative);
    let result = seasonal_decompose(&values, 252, DecompositionModel::Multiplicative).unwrap();

    let mean = result.seasonal_figures().iter().sum::<f64>() / 252.0;
    assert!((mean - 1.0).abs() < 1e-9);
    for i in 0..(504 - 252) {
        assert_eq!(result.seasonal[i], result.seasonal[i + 252]);
    }
    for (i, rebuilt) in result.reconstruct().iter().enumerate() {
        if let Some(r) = rebuilt {
            assert!((r - values[i]).abs() <= 1e-9 * values[i].abs());
        }
    }
}

#[test]
fn rejects_invalid_inputs() {
    let values = trading_years(DecompositionModel::Additive);

    assert_eq!(
        seasonal_decompose(&values[..503], 252, DecompositionModel::Additive),
        Err(DecompositionError::InsufficientLength {
            length: 503,
            required: 504
        })
    );
    assert!(matches!(
        decompose_tagged(&values, 252, "stl"),
        Err(DecompositionError::InvalidModel { .. })
    ));

    let mut negative = values.clone();
    negative[300] = -1.0;
    assert!(matches!(
        seasonal_decompose(&negative, 252, DecompositionModel::Multiplicative),
        Err(DecompositionError::NonPositiveValue { index: 300, .. })
    ));
}

#[test]
fn regularized_prices_decompose() {
    let mut prices = PriceSeries::new("NVDA");
    let mut date = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    for i in 0..60 {
        // Skip a holiday now and then
        if i % 13 != 6 {
            prices.add_point(date, 50.0 + i as f64 + if i % 2 == 0 { 1.0 } else { -1.0 });
        }
        date = next_business_day(date);
    }

    let series = to_business_days(&prices).unwrap();
    assert!(series.regular);
    assert_eq!(series.len(), 60);

    let result = decompose_series(&series, 2, DecompositionModel::Additive).unwrap();
    assert_eq!(result.len(), 60);

    // The same values without a regular index are refused
    let dates = vec![
        NaiveDate::from_ymd_opt(2023, 1, 2).unwrap(),
        NaiveDate::from_ymd_opt(2023, 1, 4).unwrap(),
        NaiveDate::from_ymd_opt(2023, 1, 5).unwrap(),
        NaiveDate::from_ymd_opt(2023, 1, 6).unwrap(),
    ];
    let gappy = Series::from_dates("NVDA", dates, vec![1.0, 2.0, 3.0, 4.0]);
    assert!(matches!(
        decompose_series(&gappy, 2, DecompositionModel::Additive),
        Err(DecompositionError::IrregularIndex { .. })
    ));
}
