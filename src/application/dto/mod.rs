// src/application/dto/mod.rs
// Data transfer objects between the use cases and the adapters

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::Config;
use crate::domain::models::{DecompositionModel, DecompositionResult, Series};

/// Parameters shared by every ticker in a run.
#[derive(Debug, Clone)]
pub struct DecompositionRequest {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub period: usize,
    pub model: DecompositionModel,
    pub timeout: Duration,
}

impl From<&Config> for DecompositionRequest {
    fn from(config: &Config) -> Self {
        Self {
            start: config.data.start_date,
            end: config.data.end_date,
            period: config.decomposition.period,
            model: config.decomposition.model,
            timeout: Duration::from_secs(config.decomposition.timeout_secs),
        }
    }
}

/// A regularized price series together with its decomposition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerDecomposition {
    pub ticker: String,
    pub series: Series,
    pub result: DecompositionResult,
}

impl TickerDecomposition {
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.series.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.series.dates.last().copied()
    }
}
