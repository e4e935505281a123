use crate::domain::ports::Scaler;
use crate::utils::error::{ForecastError, Result};
use crate::utils::validation::validate_finite_range;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Min-max scaling onto `feature_range` from fitted `data_min`/`data_max`.
#[derive(Debug, Clone, PartialEq)]
pub struct MinMaxScaler {
    data_min: f64,
    data_range: f64,
    low: f64,
    span: f64,
}

impl MinMaxScaler {
    pub fn new(data_min: f64, data_max: f64) -> Self {
        Self::with_range(data_min, data_max, (0.0, 1.0))
    }

    pub fn with_range(data_min: f64, data_max: f64, feature_range: (f64, f64)) -> Self {
        let (low, high) = feature_range;
        let data_range = data_max - data_min;
        // 常數特徵：避免除以零
        let data_range = if data_range == 0.0 { 1.0 } else { data_range };

        Self {
            data_min,
            data_range,
            low,
            span: high - low,
        }
    }
}

impl Scaler for MinMaxScaler {
    fn transform(&self, values: &[f64]) -> Vec<f64> {
        values
            .iter()
            .map(|v| (v - self.data_min) / self.data_range * self.span + self.low)
            .collect()
    }

    fn inverse_transform(&self, values: &[f64]) -> Vec<f64> {
        values
            .iter()
            .map(|v| (v - self.low) / self.span * self.data_range + self.data_min)
            .collect()
    }
}

/// Zero-mean, unit-variance scaling from fitted `mean`/`std`.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    mean: f64,
    std: f64,
}

impl StandardScaler {
    pub fn new(mean: f64, std: f64) -> Self {
        let std = if std == 0.0 { 1.0 } else { std };
        Self { mean, std }
    }
}

impl Scaler for StandardScaler {
    fn transform(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|v| (v - self.mean) / self.std).collect()
    }

    fn inverse_transform(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|v| v * self.std + self.mean).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityScaler;

impl Scaler for IdentityScaler {
    fn transform(&self, values: &[f64]) -> Vec<f64> {
        values.to_vec()
    }

    fn inverse_transform(&self, values: &[f64]) -> Vec<f64> {
        values.to_vec()
    }
}

/// Fitted scaler parameters as written in the service config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalerSpec {
    MinMax {
        data_min: f64,
        data_max: f64,
        feature_range: Option<(f64, f64)>,
    },
    Standard {
        mean: f64,
        std: f64,
    },
    Identity,
}

impl ScalerSpec {
    pub fn build(&self, field_name: &str) -> Result<Arc<dyn Scaler>> {
        let scaler: Arc<dyn Scaler> = match self {
            ScalerSpec::MinMax {
                data_min,
                data_max,
                feature_range,
            } => {
                validate_finite_range(&format!("{}.data", field_name), *data_min, *data_max)?;
                let range = feature_range.unwrap_or((0.0, 1.0));
                validate_finite_range(&format!("{}.feature_range", field_name), range.0, range.1)?;
                if range.0 == range.1 {
                    return Err(ForecastError::InvalidConfigValueError {
                        field: format!("{}.feature_range", field_name),
                        value: format!("[{}, {}]", range.0, range.1),
                        reason: "Feature range must not be empty".to_string(),
                    });
                }
                Arc::new(MinMaxScaler::with_range(*data_min, *data_max, range))
            }
            ScalerSpec::Standard { mean, std } => {
                validate_finite_range(&format!("{}.std", field_name), 0.0, *std)?;
                Arc::new(StandardScaler::new(*mean, *std))
            }
            ScalerSpec::Identity => Arc::new(IdentityScaler),
        };
        Ok(scaler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn assert_round_trip(scaler: &dyn Scaler, values: &[f64]) {
        let restored = scaler.inverse_transform(&scaler.transform(values));
        for (original, back) in values.iter().zip(&restored) {
            assert_abs_diff_eq!(original, back, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_min_max_matches_fitted_range() {
        let scaler = MinMaxScaler::new(1.0, 12.0);
        assert_eq!(scaler.transform(&[1.0, 12.0]), vec![0.0, 1.0]);
        assert_round_trip(&scaler, &[1.0, 3.5, 12.0, 20.0]);
    }

    #[test]
    fn test_min_max_custom_feature_range() {
        let scaler = MinMaxScaler::with_range(0.0, 10.0, (-1.0, 1.0));
        assert_eq!(scaler.transform(&[0.0, 5.0, 10.0]), vec![-1.0, 0.0, 1.0]);
        assert_round_trip(&scaler, &[0.0, 2.5, 7.0]);
    }

    #[test]
    fn test_min_max_constant_feature() {
        let scaler = MinMaxScaler::new(3.0, 3.0);
        assert_eq!(scaler.transform(&[3.0]), vec![0.0]);
        assert_round_trip(&scaler, &[3.0, 4.0]);
    }

    #[test]
    fn test_standard_scaler() {
        let scaler = StandardScaler::new(10.0, 2.0);
        assert_eq!(scaler.transform(&[10.0, 14.0]), vec![0.0, 2.0]);
        assert_round_trip(&scaler, &[0.0, 10.0, 123.4]);
        assert_round_trip(&StandardScaler::new(5.0, 0.0), &[5.0, 6.0]);
    }

    #[test]
    fn test_spec_from_toml() {
        let spec: ScalerSpec = toml::from_str(
            r#"
kind = "min_max"
data_min = 0.0
data_max = 200.0
feature_range = [0.0, 2.0]
"#,
        )
        .unwrap();
        let scaler = spec.build("scalers.infected_daily").unwrap();
        assert_eq!(scaler.transform(&[100.0]), vec![1.0]);

        let spec: ScalerSpec = toml::from_str(r#"kind = "identity""#).unwrap();
        assert_eq!(spec, ScalerSpec::Identity);
    }

    #[test]
    fn test_spec_rejects_inverted_range() {
        let spec = ScalerSpec::MinMax {
            data_min: 10.0,
            data_max: 0.0,
            feature_range: None,
        };
        assert!(spec.build("scalers.month").is_err());

        let spec = ScalerSpec::Standard {
            mean: 0.0,
            std: -1.0,
        };
        assert!(spec.build("scalers.month").is_err());
    }
}
