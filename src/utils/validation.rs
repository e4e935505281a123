use crate::utils::error::{ForecastError, Result};
use std::collections::HashSet;
use std::hash::Hash;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ForecastError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ForecastError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(ForecastError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ForecastError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_unique<T>(field_name: &str, values: &[T]) -> Result<()>
where
    T: Eq + Hash + std::fmt::Display,
{
    let mut seen = HashSet::with_capacity(values.len());
    for value in values {
        if !seen.insert(value) {
            return Err(ForecastError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: value.to_string(),
                reason: "Duplicate entry".to_string(),
            });
        }
    }
    Ok(())
}

pub fn validate_finite_range(field_name: &str, low: f64, high: f64) -> Result<()> {
    if !low.is_finite() || !high.is_finite() || low > high {
        return Err(ForecastError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: format!("[{}, {}]", low, high),
            reason: "Range bounds must be finite with low <= high".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("datasets.covid19.path", "data/covid.csv").is_ok());
        assert!(validate_path("datasets.covid19.path", "").is_err());
        assert!(validate_path("datasets.covid19.path", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("models.m.window", 7, 1).is_ok());
        assert!(validate_positive_number("models.m.window", 0, 1).is_err());
    }

    #[test]
    fn test_validate_unique() {
        assert!(validate_unique("cols", &["a", "b", "c"]).is_ok());

        match validate_unique("cols", &["a", "b", "a"]) {
            Err(ForecastError::InvalidConfigValueError { value, .. }) => assert_eq!(value, "a"),
            other => panic!("Expected duplicate error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_finite_range() {
        assert!(validate_finite_range("feature_range", 0.0, 1.0).is_ok());
        assert!(validate_finite_range("feature_range", 1.0, 0.0).is_err());
        assert!(validate_finite_range("feature_range", f64::NAN, 1.0).is_err());
    }
}
