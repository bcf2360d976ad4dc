// src/analysis/seasonal.rs
use crate::domain::errors::{DecompositionError, EngineResult};
use crate::domain::models::DecompositionModel;

/// Remove the trend from the observations. Undefined where the trend is.
pub fn detrend(
    observed: &[f64],
    trend: &[Option<f64>],
    model: DecompositionModel,
) -> Vec<Option<f64>> {
    observed
        .iter()
        .zip(trend)
        .map(|(value, t)| t.map(|t| model.remove(*value, t)))
        .collect()
}

/// Average the detrended values of each phase `i mod period`, skipping
/// undefined entries.
pub fn phase_averages(detrended: &[Option<f64>], period: usize) -> EngineResult<Vec<f64>> {
    let mut sums = vec![0.0; period];
    let mut counts = vec![0usize; period];

    for (i, value) in detrended.iter().enumerate() {
        if let Some(v) = value {
            sums[i % period] += v;
            counts[i % period] += 1;
        }
    }

    sums.iter()
        .zip(&counts)
        .enumerate()
        .map(|(phase, (sum, count))| {
            if *count == 0 {
                Err(DecompositionError::InsufficientData { phase })
            } else {
                Ok(sum / *count as f64)
            }
        })
        .collect()
}

/// Center the seasonal figures: zero sum for additive, unit mean for
/// multiplicative.
pub fn normalize(figures: &mut [f64], model: DecompositionModel) {
    if figures.is_empty() {
        return;
    }
    let mean = figures.iter().sum::<f64>() / figures.len() as f64;
    for f in figures.iter_mut() {
        *f = model.remove(*f, mean);
    }
}

/// Repeat the per-phase figures over `len` positions.
pub fn tile(figures: &[f64], len: usize) -> Vec<f64> {
    figures.iter().copied().cycle().take(len).collect()
}

/// Seasonal component: detrend, average per phase, normalize and tile.
pub fn seasonal_component(
    observed: &[f64],
    trend: &[Option<f64>],
    period: usize,
    model: DecompositionModel,
) -> EngineResult<Vec<f64>> {
    let detrended = detrend(observed, trend, model);
    let mut figures = phase_averages(&detrended, period)?;
    normalize(&mut figures, model);
    Ok(tile(&figures, observed.len()))
}
