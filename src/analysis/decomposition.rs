// src/analysis/decomposition.rs
//! Classical seasonal decomposition by moving averages.
//!
//! centered moving average -> detrend -> phase averages -> normalize ->
//! residual. Trend and residual are undefined at both ends of the series
//! where the averaging window does not fit; nothing is extrapolated.

use crate::analysis::moving_average::centered_moving_average;
use crate::analysis::seasonal::seasonal_component;
use crate::domain::errors::{DecompositionError, EngineResult};
use crate::domain::models::{DecompositionModel, DecompositionResult, Series};
use crate::domain::service::DecompositionService;

/// Check the period and the series length against it.
pub fn validate_shape(length: usize, period: usize) -> EngineResult<()> {
    if period < 2 {
        return Err(DecompositionError::InvalidPeriod { period });
    }
    let required = period * 2;
    if length < required {
        return Err(DecompositionError::InsufficientLength { length, required });
    }
    Ok(())
}

/// Check that every value is usable under `model`.
pub fn validate_values(values: &[f64], model: DecompositionModel) -> EngineResult<()> {
    if let Some(index) = values.iter().position(|v| !v.is_finite()) {
        return Err(DecompositionError::MissingValue { index });
    }
    if model == DecompositionModel::Multiplicative {
        if let Some((index, value)) = values.iter().enumerate().find(|(_, v)| **v <= 0.0) {
            return Err(DecompositionError::NonPositiveValue {
                index,
                value: *value,
            });
        }
    }
    Ok(())
}

/// Residual where the trend is defined, `None` elsewhere.
pub fn residual_component(
    observed: &[f64],
    trend: &[Option<f64>],
    seasonal: &[f64],
    model: DecompositionModel,
) -> Vec<Option<f64>> {
    observed
        .iter()
        .zip(trend)
        .zip(seasonal)
        .map(|((value, t), s)| t.map(|t| model.remove(*value, model.combine(t, *s))))
        .collect()
}

/// Decompose equally spaced `values` with seasonal `period` under `model`.
pub fn seasonal_decompose(
    values: &[f64],
    period: usize,
    model: DecompositionModel,
) -> EngineResult<DecompositionResult> {
    validate_shape(values.len(), period)?;
    validate_values(values, model)?;
    decompose_checked(values, period, model)
}

/// Core of the decomposition. Callers have already validated the input.
fn decompose_checked(
    values: &[f64],
    period: usize,
    model: DecompositionModel,
) -> EngineResult<DecompositionResult> {
    log::debug!(
        "Decomposing {} observations, period {}, {} model",
        values.len(),
        period,
        model
    );

    let trend = centered_moving_average(values, period)?;
    let seasonal = seasonal_component(values, &trend, period, model)?;
    let residual = residual_component(values, &trend, &seasonal, model);

    Ok(DecompositionResult {
        model,
        period,
        observed: values.to_vec(),
        trend,
        seasonal,
        residual,
    })
}

/// Same as [`seasonal_decompose`] with the model given as a tag such as
/// `"additive"` or `"multiplicative"`.
pub fn decompose_tagged(
    values: &[f64],
    period: usize,
    model: &str,
) -> EngineResult<DecompositionResult> {
    validate_shape(values.len(), period)?;
    let model = model.parse::<DecompositionModel>()?;
    seasonal_decompose(values, period, model)
}

/// Decompose a [`Series`], rejecting it if its index is not regular.
pub fn decompose_series(
    series: &Series,
    period: usize,
    model: DecompositionModel,
) -> EngineResult<DecompositionResult> {
    validate_shape(series.len(), period)?;
    validate_values(&series.values, model)?;
    if let Some(reason) = series.irregularity() {
        return Err(DecompositionError::IrregularIndex { reason });
    }
    decompose_checked(&series.values, period, model)
}

/// Moving-average decomposer behind the [`DecompositionService`] seam.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassicalDecomposer;

impl ClassicalDecomposer {
    pub fn new() -> Self {
        Self
    }
}

impl DecompositionService for ClassicalDecomposer {
    fn decompose(
        &self,
        series: &Series,
        period: usize,
        model: DecompositionModel,
    ) -> EngineResult<DecompositionResult> {
        decompose_series(series, period, model)
    }
}
