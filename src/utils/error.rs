use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid range: date_begin {begin} is after date_end {end}")]
    InvalidRange { begin: NaiveDate, end: NaiveDate },

    #[error("Invalid date format at index {index}: '{value}' (expected YYYY-MM-DD)")]
    InvalidDateFormat { index: usize, value: String },

    #[error("Dates are not consecutive at index {index}: {previous} -> {current}")]
    NonConsecutiveDates {
        index: usize,
        previous: NaiveDate,
        current: NaiveDate,
    },

    #[error("Observed values length must be {expected}, got {actual}")]
    WindowLengthMismatch { expected: usize, actual: usize },

    #[error("Dates length must be {expected}, got {actual}")]
    DateCountMismatch { expected: usize, actual: usize },

    #[error("Dataset '{dataset}' is malformed: {message}")]
    DatasetError { dataset: String, message: String },

    #[error("Unknown dataset: {name}")]
    UnknownDataset { name: String },

    #[error("Unknown model: {name}")]
    UnknownModel { name: String },

    #[error("Requested {requested} days exceeds model horizon ({horizon} days)")]
    HorizonExceeded { requested: usize, horizon: usize },

    #[error("Model output has {actual} values, need at least {expected}")]
    PredictionTooShort { expected: usize, actual: usize },

    #[error("No scaler configured for feature '{feature}'")]
    MissingScaler { feature: String },

    #[error("Inference failed: {message}")]
    InferenceError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Configuration,
    Data,
    Inference,
}

impl ForecastError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ForecastError::InvalidRange { .. }
            | ForecastError::InvalidDateFormat { .. }
            | ForecastError::NonConsecutiveDates { .. }
            | ForecastError::WindowLengthMismatch { .. }
            | ForecastError::DateCountMismatch { .. }
            | ForecastError::UnknownDataset { .. }
            | ForecastError::UnknownModel { .. }
            | ForecastError::HorizonExceeded { .. } => ErrorCategory::Validation,
            ForecastError::ConfigError { .. }
            | ForecastError::InvalidConfigValueError { .. }
            | ForecastError::MissingScaler { .. } => ErrorCategory::Configuration,
            ForecastError::IoError(_)
            | ForecastError::CsvError(_)
            | ForecastError::SerializationError(_)
            | ForecastError::DatasetError { .. } => ErrorCategory::Data,
            ForecastError::PredictionTooShort { .. } | ForecastError::InferenceError { .. } => {
                ErrorCategory::Inference
            }
        }
    }

    /// Index of the offending entry for date validation failures.
    pub fn offending_index(&self) -> Option<usize> {
        match self {
            ForecastError::InvalidDateFormat { index, .. }
            | ForecastError::NonConsecutiveDates { index, .. } => Some(*index),
            _ => None,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Validation => format!("Request rejected: {}", self),
            ErrorCategory::Configuration => format!("Service is misconfigured: {}", self),
            ErrorCategory::Data => format!("Could not read or write data: {}", self),
            ErrorCategory::Inference => format!("Model inference failed: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ForecastError>;
