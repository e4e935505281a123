use crate::utils::error::{ForecastError, Result};
use crate::utils::validation::{validate_positive_number, validate_unique};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Calendar date format used by every request and dataset.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    #[serde(with = "date_format")]
    pub date: NaiveDate,
    pub value: f64,
}

impl TimeSeriesPoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// The closed set of per-date features a model can consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    InfectedDaily,
    DayOfWeek,
    Month,
    Quarter,
    IsWeekend,
    Season,
    DayOfYear,
}

impl Feature {
    pub const ALL: [Feature; 7] = [
        Feature::InfectedDaily,
        Feature::DayOfWeek,
        Feature::Month,
        Feature::Quarter,
        Feature::IsWeekend,
        Feature::Season,
        Feature::DayOfYear,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::InfectedDaily => "infected_daily",
            Feature::DayOfWeek => "day_of_week",
            Feature::Month => "month",
            Feature::Quarter => "quarter",
            Feature::IsWeekend => "is_weekend",
            Feature::Season => "season",
            Feature::DayOfYear => "day_of_year",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feature {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        Feature::ALL
            .iter()
            .copied()
            .find(|feature| feature.as_str() == s)
            .ok_or_else(|| ForecastError::InvalidConfigValueError {
                field: "cols".to_string(),
                value: s.to_string(),
                reason: "Unknown feature name".to_string(),
            })
    }
}

/// Shape of one trained model: input window, output horizon and column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    window: usize,
    horizon: usize,
    cols: Vec<Feature>,
}

impl ModelConfig {
    pub fn new(window: usize, horizon: usize, cols: Vec<Feature>) -> Result<Self> {
        validate_positive_number("window", window, 1)?;
        validate_positive_number("horizon", horizon, 1)?;
        validate_positive_number("cols", cols.len(), 1)?;
        validate_unique("cols", &cols)?;

        Ok(Self {
            window,
            horizon,
            cols,
        })
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    pub fn cols(&self) -> &[Feature] {
        &self.cols
    }
}

/// `rows` x `cols` matrix stored row-major, one row per input date.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl FeatureMatrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] = value;
    }

    pub fn column(&self, col: usize) -> Vec<f64> {
        (0..self.rows).map(|row| self.get(row, col)).collect()
    }

    pub fn set_column(&mut self, col: usize, values: &[f64]) {
        for (row, value) in values.iter().enumerate().take(self.rows) {
            self.set(row, col, *value);
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Flattened date-major row vector, ready for inference.
    pub fn into_flat(self) -> Vec<f64> {
        self.data
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub model: String,
    pub date_begin: String,
    pub date_end: String,
    /// The last `window` observed daily values, oldest first.
    #[serde(alias = "X")]
    pub observed: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastResult {
    #[serde(rename = "forecast")]
    pub values: Vec<u64>,
}

impl ForecastResult {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

mod date_format {
    use super::DATE_FORMAT;
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&raw, DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_names_round_trip() {
        for feature in Feature::ALL {
            assert_eq!(feature.as_str().parse::<Feature>().unwrap(), feature);
        }
        assert!("temperature".parse::<Feature>().is_err());
    }

    #[test]
    fn test_model_config_rejects_bad_shapes() {
        assert!(ModelConfig::new(0, 14, vec![Feature::Month]).is_err());
        assert!(ModelConfig::new(7, 0, vec![Feature::Month]).is_err());
        assert!(ModelConfig::new(7, 14, vec![]).is_err());
        assert!(ModelConfig::new(7, 14, vec![Feature::Month, Feature::Month]).is_err());

        let config = ModelConfig::new(7, 14, vec![Feature::InfectedDaily, Feature::Month]).unwrap();
        assert_eq!(config.window(), 7);
        assert_eq!(config.horizon(), 14);
        assert_eq!(config.cols(), &[Feature::InfectedDaily, Feature::Month]);
    }

    #[test]
    fn test_time_series_point_json_shape() {
        let point = TimeSeriesPoint::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), 12.0);
        let json = serde_json::to_value(point).unwrap();
        assert_eq!(json, serde_json::json!({"date": "2024-03-01", "value": 12.0}));
    }

    #[test]
    fn test_forecast_result_json_shape() {
        let result = ForecastResult {
            values: vec![3, 0, 7],
        };
        assert_eq!(
            serde_json::to_string(&result).unwrap(),
            r#"{"forecast":[3,0,7]}"#
        );
    }

    #[test]
    fn test_forecast_request_accepts_x_body() {
        let body = r#"{
            "model": "covid19_model",
            "date_begin": "2024-03-01",
            "date_end": "2024-03-05",
            "X": [1.0, 2.5, 0.0]
        }"#;
        let request: ForecastRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.model, "covid19_model");
        assert_eq!(request.observed, vec![1.0, 2.5, 0.0]);

        let named: ForecastRequest = serde_json::from_value(serde_json::json!({
            "model": "m",
            "date_begin": "2024-03-01",
            "date_end": "2024-03-01",
            "observed": [4.0]
        }))
        .unwrap();
        assert_eq!(named.observed, vec![4.0]);

        let missing = serde_json::from_str::<ForecastRequest>(r#"{"model": "m"}"#);
        assert!(missing.is_err());
    }

    #[test]
    fn test_matrix_columns() {
        let mut matrix = FeatureMatrix::zeros(2, 3);
        matrix.set(1, 2, 5.0);
        matrix.set_column(0, &[1.0, 2.0]);
        assert_eq!(matrix.column(0), vec![1.0, 2.0]);
        assert_eq!(matrix.as_slice(), &[1.0, 0.0, 0.0, 2.0, 0.0, 5.0]);
    }
}
