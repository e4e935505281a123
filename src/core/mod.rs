pub mod calendar;
pub mod contiguity;
pub mod engine;
pub mod features;
pub mod postprocess;
pub mod registry;
pub mod scaling;

pub use crate::domain::model::{FeatureMatrix, ForecastResult, ModelConfig, TimeSeriesPoint};
pub use crate::domain::ports::{ForecastModel, Scaler, SeriesProvider, Storage};
pub use crate::utils::error::Result;
