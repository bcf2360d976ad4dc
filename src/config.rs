// src/config.rs
use crate::adapter::report::OutputFormat;
use crate::domain::errors::{AppError, AppResult};
use crate::domain::models::DecompositionModel;
use chrono::{Local, NaiveDate};
use dotenv::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// Tickers offered by default.
pub const SUPPORTED_TICKERS: [&str; 7] = ["AAPL", "MSFT", "NVDA", "GOOGL", "AMZN", "META", "TSLA"];

/// One trading year of business days.
pub const DEFAULT_PERIOD: usize = 252;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Price data source
    pub data: DataConfig,

    /// Decomposition parameters
    pub decomposition: DecompositionConfig,

    /// Report output
    pub output: OutputConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Price data configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Source name ("yahoo" or "csv")
    pub source: String,

    /// Tickers to decompose (e.g., ["AAPL", "MSFT"])
    pub tickers: Vec<String>,

    /// First date requested (inclusive)
    pub start_date: NaiveDate,

    /// Last date requested (exclusive)
    pub end_date: NaiveDate,

    /// Directory holding `{TICKER}.csv` files for the csv source
    pub csv_dir: Option<String>,

    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,
}

/// Decomposition configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecompositionConfig {
    pub model: DecompositionModel,

    /// Observations per seasonal cycle
    pub period: usize,

    /// Upper bound on a single decomposition, in seconds
    pub timeout_secs: u64,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,

    /// Write one file per ticker here instead of printing to stdout
    pub directory: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (e.g., "info", "debug", "warn", "error")
    pub level: String,

    /// Log to file
    pub to_file: bool,

    /// Log file path
    pub file_path: Option<String>,
}

fn parse_date(var: &str, value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| AppError::Config(format!("Invalid {} '{}': {}", var, value, e)))
}

fn parse_number<T>(var: &str, value: &str) -> AppResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid {} '{}': {}", var, value, e)))
}

/// Numeric setting from the environment. Unset means `default`; a value
/// that does not parse is an error.
fn env_number<T>(var: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env::var(var) {
        Ok(value) => parse_number(var, &value),
        Err(_) => Ok(default),
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let defaults = Config::default();

        let tickers = env::var("TICKERS")
            .unwrap_or_else(|_| defaults.data.tickers.join(","))
            .split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();

        let start_date = match env::var("START_DATE") {
            Ok(value) => parse_date("START_DATE", &value)?,
            Err(_) => defaults.data.start_date,
        };
        let end_date = match env::var("END_DATE") {
            Ok(value) => parse_date("END_DATE", &value)?,
            Err(_) => defaults.data.end_date,
        };

        let data_config = DataConfig {
            source: env::var("DATA_SOURCE").unwrap_or_else(|_| "yahoo".to_string()),
            tickers,
            start_date,
            end_date,
            csv_dir: env::var("CSV_DIR").ok(),
            request_timeout_secs: env_number("REQUEST_TIMEOUT_SECS", 30)?,
        };

        let decomposition_config = DecompositionConfig {
            model: env::var("DECOMPOSITION_MODEL")
                .unwrap_or_else(|_| "additive".to_string())
                .parse()?,
            period: env_number("DECOMPOSITION_PERIOD", DEFAULT_PERIOD)?,
            timeout_secs: env_number("DECOMPOSITION_TIMEOUT_SECS", 30)?,
        };

        let output_config = OutputConfig {
            format: env::var("OUTPUT_FORMAT")
                .unwrap_or_else(|_| "text".to_string())
                .parse()?,
            directory: env::var("OUTPUT_DIR").ok(),
        };

        let logging_config = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            to_file: env::var("LOG_TO_FILE")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
            file_path: env::var("LOG_FILE_PATH").ok(),
        };

        Ok(Config {
            data: data_config,
            decomposition: decomposition_config,
            output: output_config,
            logging: logging_config,
        })
    }

    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let mut file = File::open(path).map_err(|e| {
            AppError::Config(format!("Failed to open config file: {}", e))
        })?;

        let mut contents = String::new();
        file.read_to_string(&mut contents).map_err(|e| {
            AppError::Config(format!("Failed to read config file: {}", e))
        })?;

        let config: Config = serde_json::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file: {}", e))
        })?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> AppResult<()> {
        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            AppError::Config(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(path, contents).map_err(|e| {
            AppError::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Reject settings that cannot produce a run. Unknown tickers only warn.
    pub fn validate(&self) -> AppResult<()> {
        if self.data.tickers.is_empty() {
            return Err(AppError::Config("No tickers configured".to_string()));
        }
        if self.data.start_date >= self.data.end_date {
            return Err(AppError::Config(format!(
                "Start date {} must be before end date {}",
                self.data.start_date, self.data.end_date
            )));
        }
        match self.data.source.to_lowercase().as_str() {
            "yahoo" => {}
            "csv" if self.data.csv_dir.is_some() => {}
            "csv" => {
                return Err(AppError::Config(
                    "CSV_DIR is required for the csv data source".to_string(),
                ))
            }
            other => {
                return Err(AppError::Config(format!("Unsupported data source: {}", other)))
            }
        }
        if self.decomposition.timeout_secs == 0 {
            return Err(AppError::Config(
                "Decomposition timeout must be at least 1 second".to_string(),
            ));
        }
        if self.decomposition.period < 2 {
            return Err(AppError::Config(format!(
                "Decomposition period must be at least 2, got {}",
                self.decomposition.period
            )));
        }

        for ticker in &self.data.tickers {
            if !SUPPORTED_TICKERS.contains(&ticker.as_str()) {
                log::warn!("{} is not one of the default tickers {:?}", ticker, SUPPORTED_TICKERS);
            }
        }

        Ok(())
    }

    /// Initialize logging based on configuration
    pub fn init_logging(&self) -> AppResult<()> {
        let mut builder = env_logger::Builder::new();

        // Set log level
        let log_level = match self.logging.level.to_lowercase().as_str() {
            "trace" => log::LevelFilter::Trace,
            "debug" => log::LevelFilter::Debug,
            "info" => log::LevelFilter::Info,
            "warn" => log::LevelFilter::Warn,
            "error" => log::LevelFilter::Error,
            _ => log::LevelFilter::Info,
        };

        builder.filter_level(log_level);

        // Configure output
        if self.logging.to_file {
            if let Some(file_path) = &self.logging.file_path {
                let file = File::create(file_path).map_err(|e| {
                    AppError::Config(format!("Failed to create log file: {}", e))
                })?;

                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
        }

        builder.try_init().map_err(|e| {
            AppError::Config(format!("Failed to initialize logger: {}", e))
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig {
                source: "yahoo".to_string(),
                tickers: vec![SUPPORTED_TICKERS[0].to_string()],
                start_date: NaiveDate::from_ymd_opt(2016, 1, 1).unwrap_or(NaiveDate::MIN),
                end_date: Local::now().date_naive(),
                csv_dir: None,
                request_timeout_secs: 30,
            },
            decomposition: DecompositionConfig {
                model: DecompositionModel::Additive,
                period: DEFAULT_PERIOD,
                timeout_secs: 30,
            },
            output: OutputConfig {
                format: OutputFormat::Text,
                directory: None,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                to_file: false,
                file_path: None,
            },
        }
    }
}
