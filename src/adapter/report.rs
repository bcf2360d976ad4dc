// src/adapter/report.rs
// Rendering of decomposition results

use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};
use std::str::FromStr;

use crate::application::dto::TickerDecomposition;
use crate::domain::errors::{AppError, AppResult};

/// Rows shown by the text report.
const TEXT_ROWS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Csv,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Text => "txt",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(AppError::Config(format!("Unsupported output format: {}", other))),
        }
    }
}

pub fn render(outcome: &TickerDecomposition, format: OutputFormat) -> AppResult<String> {
    match format {
        OutputFormat::Text => render_text(outcome),
        OutputFormat::Csv => render_csv(outcome),
        OutputFormat::Json => render_json(outcome),
    }
}

fn row_label(outcome: &TickerDecomposition, i: usize) -> String {
    outcome
        .series
        .dates
        .get(i)
        .map(|d| d.to_string())
        .unwrap_or_else(|| i.to_string())
}

fn fmt_value(value: Option<f64>, blank: &str) -> String {
    value.map(|v| format!("{:.4}", v)).unwrap_or_else(|| blank.to_string())
}

/// Mean and population standard deviation of the defined values.
fn mean_std(values: &[Option<f64>]) -> Option<(f64, f64)> {
    let defined: Vec<f64> = values.iter().flatten().copied().collect();
    if defined.is_empty() {
        return None;
    }
    let n = defined.len() as f64;
    let mean = defined.iter().sum::<f64>() / n;
    let variance = defined.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some((mean, variance.sqrt()))
}

/// Human readable summary followed by an evenly sampled table. Undefined
/// trend and residual entries are shown as `-`.
pub fn render_text(outcome: &TickerDecomposition) -> AppResult<String> {
    let mut out = String::new();
    write_text(&mut out, outcome).map_err(|e| AppError::Unknown(e.to_string()))?;
    Ok(out)
}

fn write_text(out: &mut String, outcome: &TickerDecomposition) -> fmt::Result {
    let result = &outcome.result;

    writeln!(
        out,
        "{}  {} model, period {}",
        outcome.ticker, result.model, result.period
    )?;
    if let (Some(first), Some(last)) = (outcome.first_date(), outcome.last_date()) {
        write!(out, "{} .. {}, ", first, last)?;
    }
    writeln!(
        out,
        "{} observations, trend defined on {}",
        result.len(),
        result.defined_trend()
    )?;

    let figures = result.seasonal_figures();
    if !figures.is_empty() {
        let min = figures.iter().copied().fold(f64::INFINITY, f64::min);
        let max = figures.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        writeln!(
            out,
            "seasonal range {:.4} (min {:.4}, max {:.4})",
            max - min,
            min,
            max
        )?;
    }
    if let Some((mean, std)) = mean_std(&result.residual) {
        writeln!(out, "residual mean {:.4}, std {:.4}", mean, std)?;
    }

    writeln!(
        out,
        "\n{:<12} {:>12} {:>12} {:>12} {:>12}",
        "date", "observed", "trend", "seasonal", "residual"
    )?;

    let n = result.len();
    let step = (n / TEXT_ROWS).max(1);
    let mut rows: Vec<usize> = (0..n).step_by(step).collect();
    if n > 0 && rows.last() != Some(&(n - 1)) {
        rows.push(n - 1);
    }
    for i in rows {
        writeln!(
            out,
            "{:<12} {:>12.4} {:>12} {:>12.4} {:>12}",
            row_label(outcome, i),
            result.observed[i],
            fmt_value(result.trend[i], "-"),
            result.seasonal[i],
            fmt_value(result.residual[i], "-"),
        )?;
    }

    Ok(())
}

/// One row per observation. Undefined entries are empty cells.
pub fn render_csv(outcome: &TickerDecomposition) -> AppResult<String> {
    let result = &outcome.result;
    let mut writer = csv::Writer::from_writer(Vec::new());

    let io = |e: csv::Error| AppError::Io(e.into());
    writer
        .write_record(["date", "observed", "trend", "seasonal", "residual"])
        .map_err(io)?;

    for i in 0..result.len() {
        writer
            .write_record([
                row_label(outcome, i),
                result.observed[i].to_string(),
                result.trend[i].map(|v| v.to_string()).unwrap_or_default(),
                result.seasonal[i].to_string(),
                result.residual[i].map(|v| v.to_string()).unwrap_or_default(),
            ])
            .map_err(io)?;
    }

    let bytes = writer.into_inner().map_err(|e| AppError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| AppError::Unknown(e.to_string()))
}

/// Full result as JSON; undefined entries become `null`.
pub fn render_json(outcome: &TickerDecomposition) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(outcome)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{DecompositionModel, DecompositionResult, Series};
    use chrono::NaiveDate;

    fn sample() -> TickerDecomposition {
        let dates: Vec<NaiveDate> = [2u32, 3, 4, 5]
            .iter()
            .map(|d| NaiveDate::from_ymd_opt(2024, 1, *d).unwrap())
            .collect();
        TickerDecomposition {
            ticker: "AAPL".to_string(),
            series: Series::from_dates("AAPL", dates, vec![1.0, 3.0, 1.0, 3.0]),
            result: DecompositionResult {
                model: DecompositionModel::Additive,
                period: 2,
                observed: vec![1.0, 3.0, 1.0, 3.0],
                trend: vec![None, Some(2.0), Some(2.0), None],
                seasonal: vec![-1.0, 1.0, -1.0, 1.0],
                residual: vec![None, Some(0.0), Some(0.0), None],
            },
        }
    }

    #[test]
    fn test_csv_leaves_gaps_empty() {
        let csv = render_csv(&sample()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "date,observed,trend,seasonal,residual");
        assert_eq!(lines[1], "2024-01-02,1,,-1,");
        assert_eq!(lines[2], "2024-01-03,3,2,1,0");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_json_uses_null() {
        let json = render_json(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["result"]["trend"][0].is_null());
        assert_eq!(value["result"]["trend"][1], 2.0);
        assert_eq!(value["result"]["model"], "additive");
    }

    #[test]
    fn test_text_summary() {
        let text = render_text(&sample()).unwrap();
        assert!(text.starts_with("AAPL  additive model, period 2"));
        assert!(text.contains("2024-01-02 .. 2024-01-05, 4 observations, trend defined on 2"));
        assert!(text.contains("seasonal range 2.0000"));
        // every row of a short series is shown, gaps as '-'
        let rows = text
            .lines()
            .filter(|l| l.starts_with("2024-01-") && !l.contains(".."))
            .count();
        assert_eq!(rows, 4);
        assert!(text.lines().any(|l| l.starts_with("2024-01-02") && l.ends_with('-')));
    }

    #[test]
    fn test_text_samples_long_series() {
        let values: Vec<f64> = (0..100).map(|i| 10.0 + (i % 4) as f64).collect();
        let result =
            crate::analysis::seasonal_decompose(&values, 4, DecompositionModel::Additive).unwrap();
        let outcome = TickerDecomposition {
            ticker: "TSLA".to_string(),
            series: Series::regular("TSLA", values),
            result,
        };

        let text = render(&outcome, OutputFormat::Text).unwrap();
        let rows: Vec<&str> = text
            .lines()
            .skip_while(|l| !l.starts_with("date"))
            .skip(1)
            .collect();
        // every fifth row, plus the last one
        assert_eq!(rows.len(), 21);
        assert!(rows[0].starts_with("0 "));
        assert!(rows[20].starts_with("99 "));
        assert!(rows[20].ends_with('-'));
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!(matches!(
            "xml".parse::<OutputFormat>(),
            Err(AppError::Config(_))
        ));
    }
}
