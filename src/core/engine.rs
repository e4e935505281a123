use crate::core::contiguity::parse_date;
use crate::core::registry::ModelRegistry;
use crate::core::{calendar, features, postprocess};
use crate::domain::model::{ForecastRequest, ForecastResult, TimeSeriesPoint, DATE_FORMAT};
use crate::domain::ports::SeriesProvider;
use crate::utils::error::{ForecastError, Result};
use chrono::NaiveDate;

pub struct ForecastEngine<'a, P: SeriesProvider> {
    registry: &'a ModelRegistry,
    series: &'a P,
}

impl<'a, P: SeriesProvider> ForecastEngine<'a, P> {
    pub fn new(registry: &'a ModelRegistry, series: &'a P) -> Self {
        Self { registry, series }
    }

    /// Daily values of `dataset` over `date_begin..=date_end`, zero-filled.
    pub fn series(
        &self,
        dataset: &str,
        date_begin: &str,
        date_end: &str,
    ) -> Result<Vec<TimeSeriesPoint>> {
        let (begin, end) = parse_range(date_begin, date_end)?;
        let raw = self.series.read_series(dataset)?;

        tracing::debug!(
            "Reading dataset '{}' from {} to {} ({} raw points)",
            dataset,
            begin,
            end,
            raw.len()
        );

        calendar::align(&raw, begin, end)
    }

    /// Forecast `request.date_begin..=request.date_end` from the last
    /// `window` observed values. The model always sees a full-horizon date
    /// run; the result is trimmed to the requested days.
    pub fn forecast(&self, request: &ForecastRequest) -> Result<ForecastResult> {
        let entry = self.registry.get(&request.model)?;
        let config = entry.config();

        let (begin, end) = parse_range(&request.date_begin, &request.date_end)?;
        let days_requested = (end - begin).num_days() as usize + 1;

        // 在推論前先檢查預測範圍
        if days_requested > config.horizon() {
            return Err(ForecastError::HorizonExceeded {
                requested: days_requested,
                horizon: config.horizon(),
            });
        }

        let dates: Vec<String> = begin
            .iter_days()
            .take(config.horizon())
            .map(|date| date.format(DATE_FORMAT).to_string())
            .collect();

        tracing::debug!(
            "Forecasting {} day(s) with '{}' (window {}, horizon {})",
            days_requested,
            request.model,
            config.window(),
            config.horizon()
        );

        let matrix = features::build(config, entry.scalers(), &request.observed, &dates)?;
        let raw_prediction = entry.infer(&matrix.into_flat())?;

        let result = postprocess::process(
            &raw_prediction,
            days_requested,
            config.horizon(),
            entry.scalers().target(),
        )?;

        tracing::debug!("Forecast for '{}': {:?}", request.model, result.values);
        Ok(result)
    }
}

/// Parse a begin/end pair (indices 0 and 1) and require `begin <= end`.
fn parse_range(date_begin: &str, date_end: &str) -> Result<(NaiveDate, NaiveDate)> {
    let begin = parse_date(0, date_begin)?;
    let end = parse_date(1, date_end)?;

    if begin > end {
        return Err(ForecastError::InvalidRange { begin, end });
    }

    Ok((begin, end))
}
