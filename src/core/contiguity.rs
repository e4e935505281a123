use crate::domain::model::DATE_FORMAT;
use crate::utils::error::{ForecastError, Result};
use chrono::NaiveDate;

/// Parse one date, reporting `index` on failure.
pub fn parse_date(index: usize, raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| ForecastError::InvalidDateFormat {
        index,
        value: raw.to_string(),
    })
}

/// Parse every entry and require each to be exactly one day after the previous.
pub fn validate<S: AsRef<str>>(dates: &[S]) -> Result<Vec<NaiveDate>> {
    let parsed = dates
        .iter()
        .enumerate()
        .map(|(index, raw)| parse_date(index, raw.as_ref()))
        .collect::<Result<Vec<_>>>()?;

    for (offset, pair) in parsed.windows(2).enumerate() {
        let (previous, current) = (pair[0], pair[1]);
        if previous.succ_opt() != Some(current) {
            return Err(ForecastError::NonConsecutiveDates {
                index: offset + 1,
                previous,
                current,
            });
        }
    }

    Ok(parsed)
}
