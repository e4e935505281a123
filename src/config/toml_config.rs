use crate::adapters::scalers::ScalerSpec;
use crate::core::scaling::ScalerSet;
use crate::domain::model::{Feature, ModelConfig};
use crate::utils::error::{ForecastError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, Validate,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub service: ServiceInfo,
    #[serde(default)]
    pub datasets: HashMap<String, DatasetSource>,
    #[serde(default)]
    pub scalers: HashMap<String, ScalerSpec>,
    #[serde(default)]
    pub models: HashMap<String, ModelDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub data_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSource {
    pub path: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    #[serde(default = "default_date_column")]
    pub date_column: String,
    #[serde(default = "default_value_column")]
    pub value_column: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDefinition {
    pub window: usize,
    pub horizon: usize,
    pub cols: Vec<String>,
    pub target: Option<String>,
    pub artifact: String,
    #[serde(default)]
    pub scalers: HashMap<String, ScalerSpec>,
}

fn default_delimiter() -> char {
    ';'
}

fn default_date_column() -> String {
    "date".to_string()
}

fn default_value_column() -> String {
    "infected_daily".to_string()
}

fn parse_feature(field_name: &str, name: &str) -> Result<Feature> {
    name.parse::<Feature>()
        .map_err(|_| ForecastError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: name.to_string(),
            reason: format!(
                "Unknown feature. Valid features: {}",
                Feature::ALL.map(|f| f.as_str()).join(", ")
            ),
        })
}

fn build_scaler_set(prefix: &str, specs: &HashMap<String, ScalerSpec>) -> Result<ScalerSet> {
    let mut set = ScalerSet::new();
    for (name, spec) in specs {
        let field = format!("{}.{}", prefix, name);
        let feature = parse_feature(&field, name)?;
        set.insert(feature, spec.build(&field)?);
    }
    Ok(set)
}

impl ModelDefinition {
    /// 將欄位名稱解析為固定順序的特徵列表
    pub fn model_config(&self) -> Result<ModelConfig> {
        let cols = self
            .cols
            .iter()
            .map(|name| parse_feature("cols", name))
            .collect::<Result<Vec<_>>>()?;
        ModelConfig::new(self.window, self.horizon, cols)
    }

    pub fn target_feature(&self) -> Result<Feature> {
        match &self.target {
            Some(name) => parse_feature("target", name),
            None => Ok(Feature::InfectedDaily),
        }
    }

    pub fn scaler_overrides(&self, model_name: &str) -> Result<ScalerSet> {
        build_scaler_set(&format!("models.{}.scalers", model_name), &self.scalers)
    }
}

impl ServiceConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ForecastError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ForecastError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATA_DIR})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ForecastError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("service.name", &self.service.name)?;
        if let Some(data_dir) = &self.service.data_dir {
            validate_path("service.data_dir", data_dir)?;
        }

        for (name, source) in &self.datasets {
            validate_path(&format!("datasets.{}.path", name), &source.path)?;
            validate_non_empty_string(&format!("datasets.{}.date_column", name), &source.date_column)?;
            validate_non_empty_string(
                &format!("datasets.{}.value_column", name),
                &source.value_column,
            )?;
            if !source.delimiter.is_ascii() {
                return Err(ForecastError::InvalidConfigValueError {
                    field: format!("datasets.{}.delimiter", name),
                    value: source.delimiter.to_string(),
                    reason: "Delimiter must be a single ASCII character".to_string(),
                });
            }
        }

        self.shared_scalers()?;

        for (name, model) in &self.models {
            validate_positive_number(&format!("models.{}.window", name), model.window, 1)?;
            validate_positive_number(&format!("models.{}.horizon", name), model.horizon, 1)?;
            validate_path(&format!("models.{}.artifact", name), &model.artifact)?;
            model.model_config()?;
            model.target_feature()?;
            model.scaler_overrides(name)?;
        }

        Ok(())
    }

    /// 取得資料根目錄
    pub fn data_dir(&self) -> &str {
        self.service.data_dir.as_deref().unwrap_or(".")
    }

    /// 所有模型共用的 scaler
    pub fn shared_scalers(&self) -> Result<ScalerSet> {
        build_scaler_set("scalers", &self.scalers)
    }
}

impl Validate for ServiceConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
