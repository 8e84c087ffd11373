// In: src/config.rs

//! The single source of truth for all dfbridge configuration.
//!
//! `BridgeConfig` is created once at the application boundary (from JSON, a
//! Python dictionary, or `Default`) and used to populate the `EngineRegistry`.
//! Nothing in the core reads configuration ad hoc: translators receive their
//! settings from the registry that built them.

use arrow_schema::{DataType, TimeUnit};
use serde::{Deserialize, Serialize};

use crate::engine::Implementation;
use crate::error::{BridgeError, Result};
use crate::utils::parse_version;

/// The Arrow version assumed when a config does not state one.
pub const DEFAULT_ARROW_VERSION: &str = "52.0.0";

//==================================================================================
// I. Engine & Translation Settings
//==================================================================================

/// One engine made available to the bridge at startup.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct EngineConfig {
    pub implementation: Implementation,

    /// Dotted version string of the engine, e.g. `"52.2.0"` or `"15.0.0.dev3"`.
    /// When absent the Arrow engine assumes `DEFAULT_ARROW_VERSION`; other engines
    /// are registered without a version.
    #[serde(default)]
    pub version: Option<String>,
}

/// Native parameters used when a universal dtype is under-specified relative
/// to the native type system.
///
/// The defaults match the lazy reference engine, so data round-tripped through
/// different engines ends up with the same physical layout.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct TranslationDefaults {
    /// Unit of the native timestamp produced for `DType::Datetime`.
    #[serde(default = "default_time_unit")]
    pub datetime_unit: TimeUnit,

    /// Unit of the native duration produced for `DType::Duration`.
    #[serde(default = "default_time_unit")]
    pub duration_unit: TimeUnit,

    /// Key type of the dictionary produced for `DType::Categorical`.
    #[serde(default = "default_categorical_index_type")]
    pub categorical_index_type: DataType,

    /// Value type of the dictionary produced for `DType::Categorical`.
    #[serde(default = "default_categorical_value_type")]
    pub categorical_value_type: DataType,
}

impl Default for TranslationDefaults {
    fn default() -> Self {
        Self {
            datetime_unit: default_time_unit(),
            duration_unit: default_time_unit(),
            categorical_index_type: default_categorical_index_type(),
            categorical_value_type: default_categorical_value_type(),
        }
    }
}

impl TranslationDefaults {
    pub fn validate(&self) -> Result<()> {
        if !self.categorical_index_type.is_dictionary_key_type() {
            return Err(BridgeError::configuration(
                "categorical_index_type",
                format!(
                    "{} cannot be used as a dictionary key",
                    self.categorical_index_type
                ),
            ));
        }
        if !matches!(
            self.categorical_value_type,
            DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View
        ) {
            return Err(BridgeError::configuration(
                "categorical_value_type",
                format!(
                    "categories must be strings, got {}",
                    self.categorical_value_type
                ),
            ));
        }
        Ok(())
    }
}

//==================================================================================
// II. The Unified BridgeConfig
//==================================================================================

/// The single, unified configuration for the bridge.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct BridgeConfig {
    /// Engines to register. Order is irrelevant; duplicates are rejected.
    #[serde(default = "default_engines")]
    pub engines: Vec<EngineConfig>,

    #[serde(default)]
    pub translation: TranslationDefaults,

    /// If true, `observability::init_from_config` installs the verbose logger.
    #[serde(default)]
    pub verbose_logging: bool,

    /// Append log output to this file instead of stderr.
    #[serde(default)]
    pub log_file: Option<String>,
}

// Default implementation to make constructing the config easier.
impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            engines: default_engines(),
            translation: TranslationDefaults::default(),
            verbose_logging: false,
            log_file: None,
        }
    }
}

impl BridgeConfig {
    /// Parses and validates a config from its JSON form.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: BridgeConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (idx, engine) in self.engines.iter().enumerate() {
            if let Some(version) = &engine.version {
                parse_version(version)?;
            }
            if self.engines[..idx]
                .iter()
                .any(|seen| seen.implementation == engine.implementation)
            {
                return Err(BridgeError::configuration(
                    "engines",
                    format!("engine '{}' is listed twice", engine.implementation),
                ));
            }
        }
        self.translation.validate()
    }
}

/// Helper for `serde` to provide the default engine list.
fn default_engines() -> Vec<EngineConfig> {
    vec![EngineConfig {
        implementation: Implementation::Arrow,
        version: Some(DEFAULT_ARROW_VERSION.to_string()),
    }]
}

fn default_time_unit() -> TimeUnit {
    TimeUnit::Microsecond
}

fn default_categorical_index_type() -> DataType {
    DataType::UInt32
}

fn default_categorical_value_type() -> DataType {
    DataType::Utf8
}
