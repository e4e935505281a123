use crate::domain::model::TimeSeriesPoint;
use crate::utils::error::{ForecastError, Result};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Reindex a sparse daily series onto `date_begin..=date_end`, filling
/// missing days with `0`. Duplicate input dates resolve to the last one seen.
pub fn align(
    points: &[TimeSeriesPoint],
    date_begin: NaiveDate,
    date_end: NaiveDate,
) -> Result<Vec<TimeSeriesPoint>> {
    if date_begin > date_end {
        return Err(ForecastError::InvalidRange {
            begin: date_begin,
            end: date_end,
        });
    }

    let lookup: HashMap<NaiveDate, f64> = points
        .iter()
        .filter(|point| point.date >= date_begin && point.date <= date_end)
        .map(|point| (point.date, point.value))
        .collect();

    let aligned: Vec<TimeSeriesPoint> = date_begin
        .iter_days()
        .take_while(|date| *date <= date_end)
        .map(|date| TimeSeriesPoint::new(date, lookup.get(&date).copied().unwrap_or(0.0)))
        .collect();

    tracing::debug!(
        "Aligned {} raw points onto {} days ({} filled)",
        points.len(),
        aligned.len(),
        aligned.len() - lookup.len()
    );

    Ok(aligned)
}
