use crate::domain::model::{Feature, ModelConfig};
use crate::domain::ports::Scaler;
use crate::utils::error::{ForecastError, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Fitted scalers keyed by feature.
#[derive(Debug, Clone, Default)]
pub struct ScalerSet {
    scalers: HashMap<Feature, Arc<dyn Scaler>>,
}

impl ScalerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, feature: Feature, scaler: Arc<dyn Scaler>) {
        self.scalers.insert(feature, scaler);
    }

    pub fn with(mut self, feature: Feature, scaler: Arc<dyn Scaler>) -> Self {
        self.insert(feature, scaler);
        self
    }

    pub fn get(&self, feature: Feature) -> Option<&Arc<dyn Scaler>> {
        self.scalers.get(&feature)
    }

    /// Layer `overrides` on top of `self`.
    pub fn merged(&self, overrides: &ScalerSet) -> ScalerSet {
        let mut scalers = self.scalers.clone();
        scalers.extend(
            overrides
                .scalers
                .iter()
                .map(|(feature, scaler)| (*feature, Arc::clone(scaler))),
        );
        ScalerSet { scalers }
    }

    fn require(&self, feature: Feature) -> Result<Arc<dyn Scaler>> {
        self.get(feature)
            .cloned()
            .ok_or_else(|| ForecastError::MissingScaler {
                feature: feature.to_string(),
            })
    }
}

/// Scalers resolved into model column order, plus the target scaler used
/// when denormalizing predictions.
#[derive(Debug, Clone)]
pub struct FeatureScalers {
    columns: Vec<Arc<dyn Scaler>>,
    target: Arc<dyn Scaler>,
}

impl FeatureScalers {
    pub fn resolve(config: &ModelConfig, set: &ScalerSet, target: Feature) -> Result<Self> {
        let columns = config
            .cols()
            .iter()
            .map(|feature| set.require(*feature))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            columns,
            target: set.require(target)?,
        })
    }

    pub fn column(&self, index: usize) -> &dyn Scaler {
        self.columns[index].as_ref()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn target(&self) -> &dyn Scaler {
        self.target.as_ref()
    }
}
