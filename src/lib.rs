pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::ServiceConfig;

pub use crate::adapters::{dataset::CsvDatasets, linear::LinearModel, storage::LocalStorage};
pub use crate::core::{engine::ForecastEngine, registry::ModelRegistry};
pub use crate::domain::model::{Feature, ForecastRequest, ForecastResult, ModelConfig, TimeSeriesPoint};
pub use crate::utils::error::{ForecastError, Result};
