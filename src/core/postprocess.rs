use crate::domain::model::ForecastResult;
use crate::domain::ports::Scaler;
use crate::utils::error::{ForecastError, Result};

/// Turn raw (normalized) model output into a forecast of `days_requested`
/// non-negative whole counts: trim, unscale, clamp at zero, truncate.
/// Values too large for a `u64` count (including `+inf`) fail with `InferenceError`.
pub fn process(
    raw_prediction: &[f64],
    days_requested: usize,
    horizon: usize,
    target_scaler: &dyn Scaler,
) -> Result<ForecastResult> {
    if days_requested > horizon {
        return Err(ForecastError::HorizonExceeded {
            requested: days_requested,
            horizon,
        });
    }

    if raw_prediction.len() < days_requested {
        return Err(ForecastError::PredictionTooShort {
            expected: days_requested,
            actual: raw_prediction.len(),
        });
    }

    let restored = target_scaler.inverse_transform(&raw_prediction[..days_requested]);

    // f64::max 會忽略 NaN，因此 NaN 也得到 0
    let values = restored
        .into_iter()
        .enumerate()
        .map(|(index, value)| to_count(index, value))
        .collect::<Result<Vec<u64>>>()?;

    Ok(ForecastResult { values })
}

fn to_count(index: usize, value: f64) -> Result<u64> {
    let clamped = value.max(0.0).trunc();
    if clamped >= u64::MAX as f64 {
        return Err(ForecastError::InferenceError {
            message: format!("Prediction at index {} is out of range: {}", index, value),
        });
    }
    Ok(clamped as u64)
}
