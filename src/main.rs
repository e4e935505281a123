use clap::Parser;
use epi_forecast::config::{Command, LogFormat};
use epi_forecast::domain::ports::Storage;
use epi_forecast::utils::error::ErrorCategory;
use epi_forecast::utils::{logger, validation::Validate};
use epi_forecast::{
    CliConfig, CsvDatasets, ForecastEngine, ForecastError, ForecastRequest, LocalStorage,
    ModelRegistry, ServiceConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    match cli.log_format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }

    tracing::info!("🚀 Starting epi-forecast");
    tracing::debug!("CLI config: {:?}", cli);

    match run(&cli).await {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            tracing::error!("❌ Request failed: {} (Category: {:?})", e, e.category());
            if let Some(index) = e.offending_index() {
                tracing::error!("Offending index: {}", index);
            }
            eprintln!("❌ {}", e.user_friendly_message());

            // 根據錯誤類別決定退出碼
            let exit_code = match e.category() {
                ErrorCategory::Configuration => 1,
                ErrorCategory::Validation => 2,
                ErrorCategory::Data => 3,
                ErrorCategory::Inference => 4,
            };
            std::process::exit(exit_code);
        }
    }
}

async fn run(cli: &CliConfig) -> Result<String, ForecastError> {
    tracing::info!("📁 Loading configuration from: {}", cli.config);
    let config = ServiceConfig::from_file(&cli.config)?;
    config.validate()?;
    tracing::info!("✅ Configuration loaded and validated successfully");

    // 模型與資料集只在啟動時載入一次
    let storage = LocalStorage::new(config.data_dir().to_string());
    let registry = ModelRegistry::load(&config, &storage).await?;
    let datasets = CsvDatasets::load(&config.datasets, &storage).await?;
    let engine = ForecastEngine::new(&registry, &datasets);

    match &cli.command {
        Command::Data {
            dataset,
            begin,
            end,
        } => {
            let points = engine.series(dataset, begin, end)?;
            tracing::info!("📊 {} day(s) from '{}'", points.len(), dataset);
            Ok(serde_json::to_string(&points)?)
        }
        Command::Predict {
            model,
            begin,
            end,
            observed,
            output,
        } => {
            let request = ForecastRequest {
                model: model.clone(),
                date_begin: begin.clone(),
                date_end: end.clone(),
                observed: observed.clone(),
            };
            let forecast = engine.forecast(&request)?;
            let json = serde_json::to_string(&forecast)?;

            if let Some(path) = output {
                LocalStorage::new(".".to_string())
                    .write_file(path, json.as_bytes())
                    .await?;
                tracing::info!("📁 Forecast saved to: {}", path);
            }

            Ok(json)
        }
        Command::List => Ok(serde_json::to_string(&serde_json::json!({
            "models": registry.names(),
            "datasets": datasets.names(),
        }))?),
    }
}
