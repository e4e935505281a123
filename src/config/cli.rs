use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Clone, Parser)]
#[command(name = "epi-forecast")]
#[command(about = "Daily infection series and short-horizon forecasts")]
pub struct CliConfig {
    /// Path to TOML service configuration
    #[arg(short, long, default_value = "forecast.toml")]
    pub config: String,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print a dataset's daily values over a date range
    Data {
        #[arg(long)]
        dataset: String,
        #[arg(long)]
        begin: String,
        #[arg(long)]
        end: String,
    },
    /// Forecast a date range from the most recent observed values
    Predict {
        #[arg(long)]
        model: String,
        #[arg(long)]
        begin: String,
        #[arg(long)]
        end: String,
        /// Comma-separated observed values, oldest first
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        observed: Vec<f64>,
        /// Also write the forecast JSON to this file
        #[arg(long)]
        output: Option<String>,
    },
    /// List configured models and datasets
    List,
}
