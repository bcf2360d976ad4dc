// src/analysis/moving_average.rs
use crate::domain::errors::{DecompositionError, EngineResult};

/// Simple Moving Average (SMA). `result[k]` is the mean of
/// `values[k..k + window]`.
pub fn calculate_sma(values: &[f64], window: usize) -> EngineResult<Vec<f64>> {
    if window == 0 {
        return Err(DecompositionError::InvalidPeriod { period: window });
    }
    if values.len() < window {
        return Err(DecompositionError::InsufficientLength {
            length: values.len(),
            required: window,
        });
    }

    let mut result = Vec::with_capacity(values.len() - window + 1);
    let mut sum = values.iter().take(window).sum::<f64>();

    // First SMA value
    result.push(sum / window as f64);

    // Calculate remaining values with sliding window
    for i in window..values.len() {
        sum = sum - values[i - window] + values[i];
        result.push(sum / window as f64);
    }

    Ok(result)
}

/// Number of undefined trend positions at each end of the series.
pub fn edge_width(period: usize) -> usize {
    // (P - 1) / 2 for odd P and P / 2 for even P
    period / 2
}

/// Centered moving average over a window of `period` samples.
///
/// For an even period this is the 2xP average: an SMA of width P followed by
/// a 2-point average of consecutive SMA values, which gives the two outer
/// samples half weight. For an odd period a plain SMA is already centered.
/// Positions whose window would cross either end of the series are `None`.
pub fn centered_moving_average(values: &[f64], period: usize) -> EngineResult<Vec<Option<f64>>> {
    let sma = calculate_sma(values, period)?;
    let half = edge_width(period);
    let mut trend = vec![None; values.len()];

    if period % 2 == 0 {
        for (k, pair) in sma.windows(2).enumerate() {
            trend[k + half] = Some((pair[0] + pair[1]) / 2.0);
        }
    } else {
        for (k, avg) in sma.iter().enumerate() {
            trend[k + half] = Some(*avg);
        }
    }

    Ok(trend)
}
