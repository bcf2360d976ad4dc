// src/domain/models.rs
use crate::domain::errors::DecompositionError;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the components of a series combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DecompositionModel {
    /// observed = trend + seasonal + residual
    #[default]
    Additive,
    /// observed = trend * seasonal * residual
    Multiplicative,
}

impl DecompositionModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecompositionModel::Additive => "additive",
            DecompositionModel::Multiplicative => "multiplicative",
        }
    }

    /// Remove `base` from `value` the way this model composes components.
    pub(crate) fn remove(&self, value: f64, base: f64) -> f64 {
        match self {
            DecompositionModel::Additive => value - base,
            DecompositionModel::Multiplicative => value / base,
        }
    }

    pub(crate) fn combine(&self, a: f64, b: f64) -> f64 {
        match self {
            DecompositionModel::Additive => a + b,
            DecompositionModel::Multiplicative => a * b,
        }
    }
}

impl fmt::Display for DecompositionModel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DecompositionModel {
    type Err = DecompositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "additive" | "add" => Ok(DecompositionModel::Additive),
            "multiplicative" | "mul" => Ok(DecompositionModel::Multiplicative),
            _ => Err(DecompositionError::InvalidModel { tag: s.to_string() }),
        }
    }
}

/// Equally spaced samples handed to the decomposition engine.
///
/// The engine trusts the caller's regularization and only looks at the
/// `regular` flag. `dates` is kept for rendering and may be empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
    pub dates: Vec<NaiveDate>,
    pub regular: bool,
}

impl Series {
    /// A series the caller vouches is regularly spaced.
    pub fn regular(name: &str, values: Vec<f64>) -> Self {
        Self {
            name: name.to_string(),
            values,
            dates: Vec::new(),
            regular: true,
        }
    }

    /// Build a series from business-day dates. The series is flagged regular
    /// only when every date is the business day after its predecessor.
    pub fn from_dates(name: &str, dates: Vec<NaiveDate>, values: Vec<f64>) -> Self {
        let regular = dates.len() == values.len()
            && dates.iter().all(|d| is_business_day(*d))
            && dates.windows(2).all(|w| next_business_day(w[0]) == w[1]);

        Self {
            name: name.to_string(),
            values,
            dates,
            regular,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Describe why the index is not regular, if it isn't.
    pub fn irregularity(&self) -> Option<String> {
        if self.regular {
            return None;
        }
        if !self.dates.is_empty() && self.dates.len() != self.values.len() {
            return Some(format!(
                "{} dates for {} values",
                self.dates.len(),
                self.values.len()
            ));
        }
        if let Some(d) = self.dates.iter().find(|d| !is_business_day(**d)) {
            return Some(format!("{} is not a business day", d));
        }
        if let Some(w) = self
            .dates
            .windows(2)
            .find(|w| next_business_day(w[0]) != w[1])
        {
            return Some(format!("gap between {} and {}", w[0], w[1]));
        }
        Some(format!("series '{}' is flagged irregular", self.name))
    }
}

/// Output of one decomposition run. `None` marks positions the centered
/// moving average cannot reach.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecompositionResult {
    pub model: DecompositionModel,
    pub period: usize,
    pub observed: Vec<f64>,
    pub trend: Vec<Option<f64>>,
    pub seasonal: Vec<f64>,
    pub residual: Vec<Option<f64>>,
}

impl DecompositionResult {
    pub fn len(&self) -> usize {
        self.observed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }

    /// The P distinct seasonal figures, one per phase.
    pub fn seasonal_figures(&self) -> &[f64] {
        &self.seasonal[..self.period.min(self.seasonal.len())]
    }

    /// Number of positions with a defined trend.
    pub fn defined_trend(&self) -> usize {
        self.trend.iter().filter(|t| t.is_some()).count()
    }

    /// Recombine the components; `None` wherever the trend is undefined.
    pub fn reconstruct(&self) -> Vec<Option<f64>> {
        self.trend
            .iter()
            .zip(&self.seasonal)
            .zip(&self.residual)
            .map(|((t, s), r)| match (t, r) {
                (Some(t), Some(r)) => {
                    Some(self.model.combine(self.model.combine(*t, *s), *r))
                }
                _ => None,
            })
            .collect()
    }
}

/// A dated close price as delivered by a price source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Raw price history for one ticker, ordered by date, possibly with gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub ticker: String,
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(ticker: &str) -> Self {
        Self {
            ticker: ticker.to_string(),
            points: Vec::new(),
        }
    }

    pub fn add_point(&mut self, date: NaiveDate, close: f64) {
        self.points.push(PricePoint { date, close });
    }

    /// Sort by date and keep the last price seen for a duplicated date.
    pub fn normalize(&mut self) {
        self.points.sort_by_key(|p| p.date);
        let mut deduped: Vec<PricePoint> = Vec::with_capacity(self.points.len());
        for point in self.points.drain(..) {
            match deduped.last_mut() {
                Some(last) if last.date == point.date => *last = point,
                _ => deduped.push(point),
            }
        }
        self.points = deduped;
    }

    pub fn close_prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }
}

/// Cache key for fetched price histories.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl CacheKey {
    pub fn new(ticker: &str, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            ticker: ticker.to_uppercase(),
            start,
            end,
        }
    }
}

pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn next_business_day(date: NaiveDate) -> NaiveDate {
    let mut next = date + Duration::days(1);
    while !is_business_day(next) {
        next += Duration::days(1);
    }
    next
}
