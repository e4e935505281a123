use crate::config::toml_config::DatasetSource;
use crate::domain::model::{TimeSeriesPoint, DATE_FORMAT};
use crate::domain::ports::{SeriesProvider, Storage};
use crate::utils::error::{ForecastError, Result};
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use std::io::Read;

/// Named daily series parsed from delimited text files, held in memory.
#[derive(Debug, Clone, Default)]
pub struct CsvDatasets {
    series: HashMap<String, Vec<TimeSeriesPoint>>,
}

impl CsvDatasets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every configured dataset through `storage`.
    pub async fn load<S: Storage>(
        sources: &HashMap<String, DatasetSource>,
        storage: &S,
    ) -> Result<Self> {
        let mut datasets = Self::new();
        for (name, source) in sources {
            tracing::debug!("Loading dataset '{}' from {}", name, source.path);
            let data = storage.read_file(&source.path).await?;
            datasets.insert_from_reader(name, source, data.as_slice())?;
        }
        tracing::info!("Loaded {} dataset(s)", datasets.series.len());
        Ok(datasets)
    }

    pub fn insert_from_reader<R: Read>(
        &mut self,
        name: &str,
        source: &DatasetSource,
        reader: R,
    ) -> Result<()> {
        let points = parse_series(name, source, reader)?;
        tracing::debug!("Dataset '{}' has {} points", name, points.len());
        self.series.insert(name.to_string(), points);
        Ok(())
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.series.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl SeriesProvider for CsvDatasets {
    fn read_series(&self, dataset: &str) -> Result<Vec<TimeSeriesPoint>> {
        self.series
            .get(dataset)
            .cloned()
            .ok_or_else(|| ForecastError::UnknownDataset {
                name: dataset.to_string(),
            })
    }
}

fn column_index(name: &str, headers: &csv::StringRecord, column: &str) -> Result<usize> {
    headers
        .iter()
        .position(|header| header.trim() == column)
        .ok_or_else(|| ForecastError::DatasetError {
            dataset: name.to_string(),
            message: format!("Missing column '{}'", column),
        })
}

fn parse_series<R: Read>(
    name: &str,
    source: &DatasetSource,
    reader: R,
) -> Result<Vec<TimeSeriesPoint>> {
    let delimiter = u8::try_from(source.delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| ForecastError::DatasetError {
            dataset: name.to_string(),
            message: format!("Delimiter '{}' is not a single ASCII character", source.delimiter),
        })?;

    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let date_idx = column_index(name, &headers, &source.date_column)?;
    let value_idx = column_index(name, &headers, &source.value_column)?;

    let mut points = Vec::new();
    let mut seen = HashSet::new();

    for (row, record) in csv_reader.records().enumerate() {
        let record = record?;
        let raw_date = record.get(date_idx).unwrap_or_default();
        let raw_value = record.get(value_idx).unwrap_or_default();

        // 日期可能帶有時間部分 (例如 "2020-03-01 00:00:00")
        let date_part = raw_date.split_whitespace().next().unwrap_or_default();
        let date = NaiveDate::parse_from_str(date_part, DATE_FORMAT).map_err(|_| {
            ForecastError::DatasetError {
                dataset: name.to_string(),
                message: format!("Row {}: invalid date '{}'", row + 1, raw_date),
            }
        })?;

        let value = if raw_value.is_empty() {
            0.0
        } else {
            raw_value
                .parse::<f64>()
                .map_err(|_| ForecastError::DatasetError {
                    dataset: name.to_string(),
                    message: format!("Row {}: invalid value '{}'", row + 1, raw_value),
                })?
        };

        if !value.is_finite() || value < 0.0 {
            return Err(ForecastError::DatasetError {
                dataset: name.to_string(),
                message: format!("Row {}: value must be a non-negative number", row + 1),
            });
        }

        if !seen.insert(date) {
            tracing::warn!("Dataset '{}' repeats date {}", name, date);
            return Err(ForecastError::DatasetError {
                dataset: name.to_string(),
                message: format!("Row {}: duplicate date {}", row + 1, date),
            });
        }

        points.push(TimeSeriesPoint::new(date, value));
    }

    Ok(points)
}
