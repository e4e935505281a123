use anyhow::Result;
use chrono::NaiveDate;
use epi_forecast::utils::validation::Validate;
use epi_forecast::{CsvDatasets, ForecastEngine, ForecastError, LocalStorage, ModelRegistry, ServiceConfig};
use tempfile::TempDir;

async fn load(dir: &TempDir) -> Result<(ModelRegistry, CsvDatasets)> {
    let root = dir.path();
    std::fs::create_dir_all(root.join("datasets"))?;
    std::fs::write(
        root.join("datasets/covid19_enriched.csv"),
        "date;infected_daily;recovered\n\
         2020-03-05;7;0\n\
         2020-03-01;1;0\n\
         2020-03-02;2;0\n\
         2020-03-09;9;1\n",
    )?;
    std::fs::write(
        root.join("datasets/pneumania_enriched.csv"),
        "day,cases\n2021-01-01,3\n2021-01-02,4\n",
    )?;

    let config = ServiceConfig::from_toml_str(&format!(
        r#"
[service]
name = "series-test"
data_dir = "{}"

[datasets.covid19]
path = "datasets/covid19_enriched.csv"

[datasets.pneumania]
path = "datasets/pneumania_enriched.csv"
delimiter = ","
date_column = "day"
value_column = "cases"
"#,
        root.to_str().unwrap().replace('\\', "/")
    ))?;
    config.validate()?;

    let storage = LocalStorage::new(config.data_dir().to_string());
    let registry = ModelRegistry::load(&config, &storage).await?;
    let datasets = CsvDatasets::load(&config.datasets, &storage).await?;
    Ok((registry, datasets))
}

#[tokio::test]
async fn test_series_is_contiguous_and_zero_filled() -> Result<()> {
    let dir = TempDir::new()?;
    let (registry, datasets) = load(&dir).await?;
    let engine = ForecastEngine::new(&registry, &datasets);

    let series = engine.series("covid19", "2020-02-28", "2020-03-10")?;

    let begin = NaiveDate::from_ymd_opt(2020, 2, 28).unwrap();
    let end = NaiveDate::from_ymd_opt(2020, 3, 10).unwrap();
    assert_eq!(series.len() as i64, (end - begin).num_days() + 1);
    assert_eq!(series.first().unwrap().date, begin);
    assert_eq!(series.last().unwrap().date, end);
    assert!(series
        .windows(2)
        .all(|pair| pair[0].date.succ_opt() == Some(pair[1].date)));

    let values: Vec<f64> = series.iter().map(|p| p.value).collect();
    assert_eq!(
        values,
        vec![0.0, 0.0, 1.0, 2.0, 0.0, 0.0, 7.0, 0.0, 0.0, 0.0, 9.0, 0.0]
    );

    let json = serde_json::to_value(&series[2])?;
    assert_eq!(json, serde_json::json!({"date": "2020-03-01", "value": 1.0}));
    Ok(())
}

#[tokio::test]
async fn test_series_with_custom_columns() -> Result<()> {
    let dir = TempDir::new()?;
    let (registry, datasets) = load(&dir).await?;
    let engine = ForecastEngine::new(&registry, &datasets);

    let series = engine.series("pneumania", "2021-01-01", "2021-01-03")?;

    let values: Vec<f64> = series.iter().map(|p| p.value).collect();
    assert_eq!(values, vec![3.0, 4.0, 0.0]);
    Ok(())
}

#[tokio::test]
async fn test_series_request_errors() -> Result<()> {
    let dir = TempDir::new()?;
    let (registry, datasets) = load(&dir).await?;
    let engine = ForecastEngine::new(&registry, &datasets);

    let err = engine.series("measles", "2020-03-01", "2020-03-02").unwrap_err();
    assert!(matches!(err, ForecastError::UnknownDataset { .. }));

    let err = engine.series("covid19", "2020-03-02", "2020-03-01").unwrap_err();
    assert!(matches!(err, ForecastError::InvalidRange { .. }));

    let err = engine.series("covid19", "2020-03-01", "March 2").unwrap_err();
    assert!(matches!(err, ForecastError::InvalidDateFormat { index: 1, .. }));
    Ok(())
}

#[tokio::test]
async fn test_missing_dataset_file_fails_at_startup() -> Result<()> {
    let dir = TempDir::new()?;
    let config = ServiceConfig::from_toml_str(&format!(
        r#"
[service]
name = "series-test"
data_dir = "{}"

[datasets.covid19]
path = "datasets/absent.csv"
"#,
        dir.path().to_str().unwrap().replace('\\', "/")
    ))?;

    let storage = LocalStorage::new(config.data_dir().to_string());
    let err = CsvDatasets::load(&config.datasets, &storage).await.unwrap_err();
    assert!(matches!(err, ForecastError::IoError(_)));
    Ok(())
}
