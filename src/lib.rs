//! This file is the root of the `dfbridge` Rust crate.
//!
//! Its responsibilities are strictly limited to:
//! 1.  Declaring all the top-level modules of our library (`bridge`, `frame`, etc.)
//!     so the Rust compiler knows they exist.
//! 2.  Re-exporting the public surface that wrapper code programs against.
//! 3.  Defining the `#[pymodule]` which acts as the main entry point when the
//!     compiled library is imported into Python (behind the `python` feature).

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
//==================================================================================
// 1. Module Declarations
//==================================================================================
pub mod bridge;
pub mod config;
pub mod engine;
pub mod error;
pub mod frame;
pub mod observability;
pub mod types;
pub mod utils;

#[cfg(feature = "python")]
mod ffi;

pub use bridge::{
    reverse_translate_dtype, translate_dtype, validate_column_comparand,
    validate_dataframe_comparand, ArrowTranslator, Comparand, DtypeTranslator, NativeOperand,
    ValidatedComparand,
};
pub use config::BridgeConfig;
pub use engine::{EngineRegistry, Implementation};
pub use error::{BridgeError, Result};
pub use frame::{ArrowDataFrame, ArrowSeries};
pub use types::{DType, IntoDType};

//==================================================================================
// 2. Python Module Definition
//==================================================================================
#[cfg(feature = "python")]
use pyo3::prelude::*;

/// The `dfbridge` Python module, containing all exposed Rust functions.
///
/// Errors surface as builtin exceptions: `ValueError` for bad input,
/// `NotImplementedError` for unsupported operations and `AssertionError` for
/// internal bugs.
#[cfg(feature = "python")]
#[pymodule]
fn dfbridge(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // --- Dtype translation ---
    m.add_function(wrap_pyfunction!(ffi::python::translate_dtype_py, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::python::reverse_translate_dtype_py, m)?)?;

    // --- Expose version string as a module attribute ---
    m.add("__version__", VERSION)?;

    // --- Logging ---
    m.add_function(wrap_pyfunction!(ffi::python::enable_verbose_logging_py, m)?)?;

    Ok(())
}
