use crate::domain::ports::ForecastModel;
use crate::utils::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};

/// Dense linear head: `output[h] = bias[h] + weights[h] · input`.
///
/// Serves as the bundled reference network; anything implementing
/// [`ForecastModel`] can be registered in its place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    weights: Vec<Vec<f64>>,
    bias: Vec<f64>,
}

impl LinearModel {
    pub fn new(weights: Vec<Vec<f64>>, bias: Vec<f64>) -> Result<Self> {
        let model = Self { weights, bias };
        model.check_shape()?;
        Ok(model)
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let model: LinearModel = serde_json::from_slice(bytes)?;
        model.check_shape()?;
        Ok(model)
    }

    pub fn input_len(&self) -> usize {
        self.weights.first().map(Vec::len).unwrap_or(0)
    }

    pub fn output_len(&self) -> usize {
        self.bias.len()
    }

    fn check_shape(&self) -> Result<()> {
        if self.weights.is_empty() || self.weights.len() != self.bias.len() {
            return Err(ForecastError::InferenceError {
                message: format!(
                    "Linear model has {} weight rows and {} biases",
                    self.weights.len(),
                    self.bias.len()
                ),
            });
        }

        let width = self.input_len();
        if width == 0 || self.weights.iter().any(|row| row.len() != width) {
            return Err(ForecastError::InferenceError {
                message: "Linear model weight rows must share a non-zero width".to_string(),
            });
        }

        Ok(())
    }
}

impl ForecastModel for LinearModel {
    fn predict(&self, input: &[f64]) -> Result<Vec<f64>> {
        if input.len() != self.input_len() {
            return Err(ForecastError::InferenceError {
                message: format!(
                    "Expected input of length {}, got {}",
                    self.input_len(),
                    input.len()
                ),
            });
        }

        Ok(self
            .weights
            .iter()
            .zip(&self.bias)
            .map(|(row, bias)| bias + row.iter().zip(input).map(|(w, x)| w * x).sum::<f64>())
            .collect())
    }
}
