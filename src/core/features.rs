use crate::core::contiguity;
use crate::core::scaling::FeatureScalers;
use crate::domain::model::{Feature, FeatureMatrix, ModelConfig};
use crate::utils::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDate};

/// Value of `feature` for one row. Only `InfectedDaily` reads `observed`.
pub fn derive(feature: Feature, date: NaiveDate, observed: f64) -> f64 {
    let weekday = date.weekday().num_days_from_monday();
    let month = date.month();

    match feature {
        Feature::InfectedDaily => observed,
        Feature::DayOfWeek => weekday as f64,
        Feature::Month => month as f64,
        Feature::Quarter => ((month - 1) / 3 + 1) as f64,
        Feature::IsWeekend => {
            if weekday >= 5 {
                1.0
            } else {
                0.0
            }
        }
        Feature::Season => ((month % 12) / 3 + 1) as f64,
        Feature::DayOfYear => date.ordinal() as f64,
    }
}

/// Assemble the normalized `window x cols` feature matrix.
///
/// Row `i` pairs `observed[i]` with `future_dates[i]` for
/// `i < min(window, horizon)`. When the horizon is shorter than the window
/// the remaining rows hold raw zeros before normalization; when it is
/// longer, dates past the window are not represented.
pub fn build<S: AsRef<str>>(
    config: &ModelConfig,
    scalers: &FeatureScalers,
    observed: &[f64],
    future_dates: &[S],
) -> Result<FeatureMatrix> {
    if observed.len() != config.window() {
        return Err(ForecastError::WindowLengthMismatch {
            expected: config.window(),
            actual: observed.len(),
        });
    }

    let dates = contiguity::validate(future_dates)?;

    if dates.len() != config.horizon() {
        return Err(ForecastError::DateCountMismatch {
            expected: config.horizon(),
            actual: dates.len(),
        });
    }

    if scalers.len() != config.cols().len() {
        return Err(ForecastError::ConfigError {
            message: format!(
                "{} scalers resolved for {} feature columns",
                scalers.len(),
                config.cols().len()
            ),
        });
    }

    let filled_rows = config.window().min(config.horizon());
    let mut matrix = FeatureMatrix::zeros(config.window(), config.cols().len());

    for (row, (date, value)) in dates.iter().zip(observed).take(filled_rows).enumerate() {
        for (col, feature) in config.cols().iter().enumerate() {
            matrix.set(row, col, derive(*feature, *date, *value));
        }
    }

    tracing::debug!(
        "Filled {} of {} feature rows over {} columns",
        filled_rows,
        matrix.rows(),
        matrix.cols()
    );

    for col in 0..matrix.cols() {
        let scaled = scalers.column(col).transform(&matrix.column(col));
        matrix.set_column(col, &scaled);
    }

    Ok(matrix)
}
