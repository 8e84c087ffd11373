// In: src/engine.rs

//! The engine capability registry.
//!
//! Which engines exist, and at which versions, is decided once at startup from
//! a `BridgeConfig`. Translators and wrappers receive an `Arc` handle to the
//! capabilities they were built for and never probe the environment themselves.
//! Concurrent readers only need the underlying engine's type APIs to be safe for
//! shared read access; the registry itself is immutable after construction.

use std::fmt;
use std::sync::Arc;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::bridge::ArrowTranslator;
use crate::config::{BridgeConfig, TranslationDefaults, DEFAULT_ARROW_VERSION};
use crate::error::{BridgeError, Result};
use crate::utils::parse_version;

/// Tag identifying which dataframe engine owns a native object.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Implementation {
    Arrow,
    Polars,
    Pandas,
    Modin,
    Cudf,
}

impl fmt::Display for Implementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Implementation::Arrow => "arrow",
            Implementation::Polars => "polars",
            Implementation::Pandas => "pandas",
            Implementation::Modin => "modin",
            Implementation::Cudf => "cudf",
        };
        f.write_str(name)
    }
}

/// What the bridge knows about one registered engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineCapabilities {
    pub implementation: Implementation,
    /// Parsed version components; empty when the engine was registered without one.
    pub version: Vec<u64>,
}

impl EngineCapabilities {
    pub fn new(implementation: Implementation, version: &str) -> Result<Self> {
        Ok(Self {
            implementation,
            version: parse_version(version)?,
        })
    }

    /// Returns `true` if the engine version is at least `minimum`, comparing
    /// component-wise like tuples (so `[52]` satisfies `[50, 1]`).
    pub fn at_least(&self, minimum: &[u64]) -> bool {
        self.version.as_slice() >= minimum
    }
}

/// All engines available to this process, keyed by implementation.
#[derive(Debug, Clone)]
pub struct EngineRegistry {
    engines: HashMap<Implementation, Arc<EngineCapabilities>>,
    translation: TranslationDefaults,
}

impl Default for EngineRegistry {
    fn default() -> Self {
        let mut engines = HashMap::new();
        engines.insert(
            Implementation::Arrow,
            Arc::new(EngineCapabilities {
                implementation: Implementation::Arrow,
                version: vec![52, 0, 0],
            }),
        );
        Self {
            engines,
            translation: TranslationDefaults::default(),
        }
    }
}

impl EngineRegistry {
    /// Builds the registry from a validated config.
    pub fn from_config(config: &BridgeConfig) -> Result<Self> {
        config.validate()?;

        let mut engines = HashMap::with_capacity(config.engines.len());
        for engine in &config.engines {
            let version = match (&engine.version, engine.implementation) {
                (Some(version), _) => parse_version(version)?,
                (None, Implementation::Arrow) => parse_version(DEFAULT_ARROW_VERSION)?,
                (None, _) => Vec::new(),
            };
            log::debug!(
                "registering engine '{}' at version {:?}",
                engine.implementation,
                version
            );
            engines.insert(
                engine.implementation,
                Arc::new(EngineCapabilities {
                    implementation: engine.implementation,
                    version,
                }),
            );
        }

        Ok(Self {
            engines,
            translation: config.translation.clone(),
        })
    }

    pub fn get(&self, implementation: Implementation) -> Option<Arc<EngineCapabilities>> {
        self.engines.get(&implementation).cloned()
    }

    /// Like `get`, but a missing engine is an error.
    pub fn require(&self, implementation: Implementation) -> Result<Arc<EngineCapabilities>> {
        self.get(implementation)
            .ok_or_else(|| BridgeError::EngineUnavailable(implementation.to_string()))
    }

    pub fn is_registered(&self, implementation: Implementation) -> bool {
        self.engines.contains_key(&implementation)
    }

    /// Builds the translator for the Arrow engine, injecting its capabilities and
    /// the configured translation defaults.
    pub fn arrow_translator(&self) -> Result<Arc<ArrowTranslator>> {
        let capabilities = self.require(Implementation::Arrow)?;
        Ok(Arc::new(ArrowTranslator::new(
            capabilities,
            self.translation.clone(),
        )))
    }
}
