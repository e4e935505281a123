use crate::domain::model::TimeSeriesPoint;
use crate::utils::error::Result;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// A fitted, reversible per-feature transform. Fit parameters are fixed.
pub trait Scaler: Send + Sync + std::fmt::Debug {
    fn transform(&self, values: &[f64]) -> Vec<f64>;
    fn inverse_transform(&self, values: &[f64]) -> Vec<f64>;
}

/// A trained model mapping a flattened feature vector to `horizon` outputs.
pub trait ForecastModel: Send {
    fn predict(&self, input: &[f64]) -> Result<Vec<f64>>;
}

pub trait SeriesProvider: Send + Sync {
    fn read_series(&self, dataset: &str) -> Result<Vec<TimeSeriesPoint>>;
}
