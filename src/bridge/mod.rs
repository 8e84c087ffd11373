// In: src/bridge/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Bridge Layer
// ====================================================================================
//
// The `bridge` is the seam between engine-agnostic calling code and one engine's
// native objects. It has two halves:
//
//   1. [Dtype Translator (arrow_impl)]
//         native `DataType` --translate_dtype-->         universal `DType`
//         universal `DType` --reverse_translate_dtype--> native `DataType`
//
//   2. [Comparand Validator (comparand)]
//         `Comparand` --validate_*_comparand--> `ValidatedComparand`
//             |- Native(Scalar)  -> kernel broadcasts it
//             |- Native(Array)   -> kernel aligns element-wise
//             `- Reflect         -> caller retries the reflected operation
//
// Data Flow (one binary operation):
//
//   [Wrapper (frame::ArrowSeries)] -> validate_column_comparand(other)
//         |
//         `-> Arrow compute kernel on the native operands
//         |
//         `-> schema requested? -> translate_dtype on the result's DataType
//
// Everything here is synchronous and pure. Translators are built by the
// `EngineRegistry` and injected into wrappers; nothing in this module probes
// which engines are installed.
// ====================================================================================
pub mod arrow_impl;
pub mod comparand;


use std::sync::OnceLock;

use arrow_schema::DataType;

use crate::error::Result;
use crate::types::{DType, IntoDType};

pub use arrow_impl::ArrowTranslator;
pub use comparand::{
    validate_column_comparand, validate_dataframe_comparand, Comparand, NativeOperand,
    ValidatedComparand,
};

/// **CONTRACT:** The per-engine dtype translation seam.
///
/// `translate_dtype` receives only types the engine itself produced, so a miss
/// is reported as `BridgeError::InternalError`. `reverse_translate_dtype`
/// receives caller input, so a miss is `BridgeError::UnknownDtype`.
pub trait DtypeTranslator {
    type Native;

    fn translate_dtype(&self, native: &Self::Native) -> Result<DType>;

    fn reverse_translate_dtype(&self, dtype: impl IntoDType) -> Result<Self::Native>;
}

fn default_translator() -> &'static ArrowTranslator {
    static DEFAULT: OnceLock<ArrowTranslator> = OnceLock::new();
    DEFAULT.get_or_init(ArrowTranslator::default)
}

/// Translates an Arrow type with the default Arrow translator.
pub fn translate_dtype(native: &DataType) -> Result<DType> {
    default_translator().translate_dtype(native)
}

/// Reverse-translates a dtype with the default Arrow translator.
pub fn reverse_translate_dtype(dtype: impl IntoDType) -> Result<DataType> {
    default_translator().reverse_translate_dtype(dtype)
}
