use crate::adapters::linear::LinearModel;
use crate::config::toml_config::ServiceConfig;
use crate::core::scaling::{FeatureScalers, ScalerSet};
use crate::domain::model::{Feature, ModelConfig};
use crate::domain::ports::{ForecastModel, Storage};
use crate::utils::error::{ForecastError, Result};
use std::collections::HashMap;
use std::sync::Mutex;

/// One loaded model with its resolved scalers. Inference is serialized
/// through the entry's mutex.
pub struct ModelEntry {
    config: ModelConfig,
    scalers: FeatureScalers,
    model: Mutex<Box<dyn ForecastModel>>,
}

impl ModelEntry {
    pub fn new(
        config: ModelConfig,
        scalers: &ScalerSet,
        target: Feature,
        model: Box<dyn ForecastModel>,
    ) -> Result<Self> {
        let scalers = FeatureScalers::resolve(&config, scalers, target)?;
        Ok(Self {
            config,
            scalers,
            model: Mutex::new(model),
        })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn scalers(&self) -> &FeatureScalers {
        &self.scalers
    }

    /// Run the model on a flattened feature vector; output must be `horizon` long.
    pub fn infer(&self, input: &[f64]) -> Result<Vec<f64>> {
        let model = self.model.lock().map_err(|_| ForecastError::InferenceError {
            message: "Model lock poisoned by an earlier failure".to_string(),
        })?;
        let output = model.predict(input)?;

        if output.len() != self.config.horizon() {
            return Err(ForecastError::InferenceError {
                message: format!(
                    "Model returned {} values for horizon {}",
                    output.len(),
                    self.config.horizon()
                ),
            });
        }

        Ok(output)
    }
}

impl std::fmt::Debug for ModelEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelEntry")
            .field("config", &self.config)
            .field("scalers", &self.scalers)
            .finish_non_exhaustive()
    }
}

/// Immutable name -> model map, built once at startup.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: HashMap<String, ModelEntry>,
}

#[derive(Debug, Default)]
pub struct ModelRegistryBuilder {
    models: HashMap<String, ModelEntry>,
}

impl ModelRegistryBuilder {
    pub fn register(mut self, name: &str, entry: ModelEntry) -> Result<Self> {
        if self.models.contains_key(name) {
            return Err(ForecastError::InvalidConfigValueError {
                field: "models".to_string(),
                value: name.to_string(),
                reason: "Model registered twice".to_string(),
            });
        }
        self.models.insert(name.to_string(), entry);
        Ok(self)
    }

    pub fn build(self) -> ModelRegistry {
        ModelRegistry {
            models: self.models,
        }
    }
}

impl ModelRegistry {
    pub fn builder() -> ModelRegistryBuilder {
        ModelRegistryBuilder::default()
    }

    /// Build every configured model, reading artifacts through `storage`.
    pub async fn load<S: Storage>(config: &ServiceConfig, storage: &S) -> Result<Self> {
        let shared = config.shared_scalers()?;
        let mut builder = Self::builder();

        for (name, definition) in &config.models {
            let model_config = definition.model_config()?;
            let scalers = shared.merged(&definition.scaler_overrides(name)?);

            tracing::debug!("Loading model '{}' from {}", name, definition.artifact);
            let bytes = storage.read_file(&definition.artifact).await?;
            let model = LinearModel::from_json(&bytes)?;

            let expected_input = model_config.window() * model_config.cols().len();
            if model.input_len() != expected_input || model.output_len() != model_config.horizon() {
                return Err(ForecastError::InvalidConfigValueError {
                    field: format!("models.{}.artifact", name),
                    value: definition.artifact.clone(),
                    reason: format!(
                        "Artifact maps {} inputs to {} outputs, config needs {} to {}",
                        model.input_len(),
                        model.output_len(),
                        expected_input,
                        model_config.horizon()
                    ),
                });
            }

            let entry = ModelEntry::new(
                model_config,
                &scalers,
                definition.target_feature()?,
                Box::new(model),
            )?;
            builder = builder.register(name, entry)?;
        }

        let registry = builder.build();
        tracing::info!("Loaded {} model(s)", registry.len());
        Ok(registry)
    }

    pub fn get(&self, name: &str) -> Result<&ModelEntry> {
        self.models
            .get(name)
            .ok_or_else(|| ForecastError::UnknownModel {
                name: name.to_string(),
            })
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.models.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::scalers::IdentityScaler;
    use std::sync::Arc;

    struct FixedModel(Vec<f64>);

    impl ForecastModel for FixedModel {
        fn predict(&self, _input: &[f64]) -> Result<Vec<f64>> {
            Ok(self.0.clone())
        }
    }

    fn identity_set() -> ScalerSet {
        ScalerSet::new().with(Feature::InfectedDaily, Arc::new(IdentityScaler))
    }

    #[test]
    fn test_get_unknown_model() {
        let registry = ModelRegistry::builder().build();
        assert!(registry.is_empty());
        match registry.get("covid19_model") {
            Err(ForecastError::UnknownModel { name }) => assert_eq!(name, "covid19_model"),
            other => panic!("Expected UnknownModel, got {:?}", other),
        }
    }

    #[test]
    fn test_register_and_infer() {
        let config = ModelConfig::new(2, 3, vec![Feature::InfectedDaily]).unwrap();
        let entry = ModelEntry::new(
            config,
            &identity_set(),
            Feature::InfectedDaily,
            Box::new(FixedModel(vec![1.0, 2.0, 3.0])),
        )
        .unwrap();

        let registry = ModelRegistry::builder()
            .register("m", entry)
            .unwrap()
            .build();

        assert_eq!(registry.names(), vec!["m"]);
        assert_eq!(registry.get("m").unwrap().infer(&[0.0, 0.0]).unwrap(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_infer_rejects_wrong_output_length() {
        let config = ModelConfig::new(2, 3, vec![Feature::InfectedDaily]).unwrap();
        let entry = ModelEntry::new(
            config,
            &identity_set(),
            Feature::InfectedDaily,
            Box::new(FixedModel(vec![1.0])),
        )
        .unwrap();

        assert!(matches!(
            entry.infer(&[0.0, 0.0]),
            Err(ForecastError::InferenceError { .. })
        ));
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let make = || {
            ModelEntry::new(
                ModelConfig::new(1, 1, vec![Feature::InfectedDaily]).unwrap(),
                &identity_set(),
                Feature::InfectedDaily,
                Box::new(FixedModel(vec![0.0])),
            )
            .unwrap()
        };

        let result = ModelRegistry::builder()
            .register("m", make())
            .unwrap()
            .register("m", make());
        assert!(result.is_err());
    }

    #[test]
    fn test_entry_requires_scalers_for_every_column() {
        let config = ModelConfig::new(1, 1, vec![Feature::InfectedDaily, Feature::Month]).unwrap();
        let result = ModelEntry::new(
            config,
            &identity_set(),
            Feature::InfectedDaily,
            Box::new(FixedModel(vec![0.0])),
        );
        assert!(matches!(result, Err(ForecastError::MissingScaler { .. })));
    }
}
