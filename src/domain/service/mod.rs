// src/domain/service/mod.rs
// Domain service interfaces

use crate::domain::errors::EngineResult;
use crate::domain::models::{DecompositionModel, DecompositionResult, Series};

/// Splits a series into trend, seasonal and residual components.
pub trait DecompositionService: Send + Sync {
    fn decompose(
        &self,
        series: &Series,
        period: usize,
        model: DecompositionModel,
    ) -> EngineResult<DecompositionResult>;
}
