// In: src/bridge/arrow_impl.rs

//! Dtype translation for the Arrow engine.
//!
//! Forward translation only ever sees types Arrow itself produced, so a type it
//! cannot place is a logic error (`InternalError`). Reverse translation sees
//! caller-supplied dtypes, so a dtype without a native mapping is a reported
//! `UnknownDtype`.

use std::sync::Arc;

use arrow_schema::DataType;

use super::DtypeTranslator;
use crate::config::TranslationDefaults;
use crate::engine::{EngineCapabilities, Implementation};
use crate::error::{BridgeError, Result};
use crate::types::{DType, IntoDType};

/// First Arrow release whose type system has string views.
const STRING_VIEW_MIN_VERSION: &[u64] = &[50];

/// Translates between `arrow_schema::DataType` and the universal `DType`.
#[derive(Debug, Clone)]
pub struct ArrowTranslator {
    capabilities: Arc<EngineCapabilities>,
    defaults: TranslationDefaults,
    string_view: bool,
}

impl Default for ArrowTranslator {
    fn default() -> Self {
        let capabilities = Arc::new(EngineCapabilities {
            implementation: Implementation::Arrow,
            version: vec![52, 0, 0],
        });
        Self::new(capabilities, TranslationDefaults::default())
    }
}

impl ArrowTranslator {
    pub fn new(capabilities: Arc<EngineCapabilities>, defaults: TranslationDefaults) -> Self {
        let string_view = capabilities.at_least(STRING_VIEW_MIN_VERSION);
        Self {
            capabilities,
            defaults,
            string_view,
        }
    }

    pub fn capabilities(&self) -> &Arc<EngineCapabilities> {
        &self.capabilities
    }

    pub fn defaults(&self) -> &TranslationDefaults {
        &self.defaults
    }

    pub fn implementation(&self) -> Implementation {
        self.capabilities.implementation
    }
}

impl DtypeTranslator for ArrowTranslator {
    type Native = DataType;

    fn translate_dtype(&self, native: &DataType) -> Result<DType> {
        let dtype = match native {
            DataType::Int64 => DType::Int64,
            DataType::Int32 => DType::Int32,
            DataType::Int16 => DType::Int16,
            DataType::Int8 => DType::Int8,
            DataType::UInt64 => DType::UInt64,
            DataType::UInt32 => DType::UInt32,
            DataType::UInt16 => DType::UInt16,
            DataType::UInt8 => DType::UInt8,
            DataType::Boolean => DType::Boolean,
            DataType::Float64 => DType::Float64,
            DataType::Float32 => DType::Float32,
            DataType::Utf8 | DataType::LargeUtf8 => DType::String,
            DataType::Utf8View if self.string_view => DType::String,
            DataType::Date32 => DType::Date,
            DataType::Timestamp(_, _) => DType::Datetime,
            DataType::Duration(_) => DType::Duration,
            DataType::Dictionary(_, _) => DType::Categorical,
            other => {
                log::error!(
                    "arrow type {:?} reached the translator (engine version {:?})",
                    other,
                    self.capabilities.version
                );
                return Err(BridgeError::InternalError(format!(
                    "no universal dtype for Arrow type {other:?}"
                )));
            }
        };
        Ok(dtype)
    }

    fn reverse_translate_dtype(&self, dtype: impl IntoDType) -> Result<DataType> {
        let dtype = dtype.into_dtype()?;
        let native = match dtype.kind() {
            DType::Float64 => DataType::Float64,
            DType::Float32 => DataType::Float32,
            DType::Int64 => DataType::Int64,
            DType::Int32 => DataType::Int32,
            DType::Int16 => DataType::Int16,
            DType::Int8 => DataType::Int8,
            DType::UInt64 => DataType::UInt64,
            DType::UInt32 => DataType::UInt32,
            DType::UInt16 => DataType::UInt16,
            DType::UInt8 => DataType::UInt8,
            DType::String => DataType::Utf8,
            DType::Boolean => DataType::Boolean,
            // Keyed like the lazy reference engine's categoricals.
            DType::Categorical => DataType::Dictionary(
                Box::new(self.defaults.categorical_index_type.clone()),
                Box::new(self.defaults.categorical_value_type.clone()),
            ),
            DType::Datetime => DataType::Timestamp(self.defaults.datetime_unit, None),
            DType::Duration => DataType::Duration(self.defaults.duration_unit),
            DType::Date => DataType::Date32,
            DType::Enum => return Err(BridgeError::UnknownDtype(dtype.to_string())),
        };
        log::debug!("reverse-translated {} to {:?}", dtype, native);
        Ok(native)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow_schema::TimeUnit;

    fn translator_at(version: &str) -> ArrowTranslator {
        let caps = EngineCapabilities::new(Implementation::Arrow, version).unwrap();
        ArrowTranslator::new(Arc::new(caps), TranslationDefaults::default())
    }

    #[test]
    fn test_string_family_collapses_to_string() {
        let translator = ArrowTranslator::default();
        for native in [DataType::Utf8, DataType::LargeUtf8, DataType::Utf8View] {
            assert_eq!(translator.translate_dtype(&native).unwrap(), DType::String);
        }
    }

    #[test]
    fn test_string_view_requires_engine_support() {
        let old = translator_at("49.0.0");
        let err = old.translate_dtype(&DataType::Utf8View).unwrap_err();
        assert!(err.is_internal());
        assert_eq!(old.translate_dtype(&DataType::LargeUtf8).unwrap(), DType::String);
    }

    #[test]
    fn test_temporal_units_are_ignored_forward() {
        let translator = ArrowTranslator::default();
        for unit in [
            TimeUnit::Second,
            TimeUnit::Millisecond,
            TimeUnit::Microsecond,
            TimeUnit::Nanosecond,
        ] {
            let ts = DataType::Timestamp(unit, Some("UTC".into()));
            assert_eq!(translator.translate_dtype(&ts).unwrap(), DType::Datetime);
            assert_eq!(
                translator.translate_dtype(&DataType::Duration(unit)).unwrap(),
                DType::Duration
            );
        }
    }

    #[test]
    fn test_any_dictionary_is_categorical() {
        let translator = ArrowTranslator::default();
        let dict = DataType::Dictionary(Box::new(DataType::Int8), Box::new(DataType::LargeUtf8));
        assert_eq!(translator.translate_dtype(&dict).unwrap(), DType::Categorical);
    }

    #[test]
    fn test_unsupported_native_type_is_internal() {
        let translator = ArrowTranslator::default();
        for native in [DataType::Null, DataType::Binary, DataType::Date64, DataType::Float16] {
            let err = translator.translate_dtype(&native).unwrap_err();
            assert!(err.is_internal(), "{native:?} gave {err:?}");
        }
    }

    #[test]
    fn test_enum_has_no_native_mapping() {
        let translator = ArrowTranslator::default();
        let err = translator.reverse_translate_dtype(DType::Enum).unwrap_err();
        assert!(matches!(err, BridgeError::UnknownDtype(ref name) if name == "Enum"));
        assert!(err.is_user_error());
    }

    #[test]
    fn test_configured_defaults_are_used() {
        let defaults = TranslationDefaults {
            datetime_unit: TimeUnit::Nanosecond,
            categorical_index_type: DataType::Int32,
            ..Default::default()
        };
        let caps = EngineCapabilities::new(Implementation::Arrow, "52.0.0").unwrap();
        let translator = ArrowTranslator::new(Arc::new(caps), defaults);

        assert_eq!(
            translator.reverse_translate_dtype(DType::Datetime).unwrap(),
            DataType::Timestamp(TimeUnit::Nanosecond, None)
        );
        assert_eq!(
            translator.reverse_translate_dtype(DType::Duration).unwrap(),
            DataType::Duration(TimeUnit::Microsecond)
        );
        assert_eq!(
            translator.reverse_translate_dtype(DType::Categorical).unwrap(),
            DataType::Dictionary(Box::new(DataType::Int32), Box::new(DataType::Utf8))
        );
    }
}
