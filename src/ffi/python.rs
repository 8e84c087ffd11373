//! This module contains all Python-facing functions for the dfbridge library.
//! It is the sole interface between the Python world and the Rust core.
//!
//! Arrow types cross the boundary as `pyarrow.DataType` objects through
//! `PyArrowType`; universal dtypes cross as their names.

use arrow::pyarrow::PyArrowType;
use arrow_schema::DataType;
use pyo3::prelude::*;

use crate::bridge;
use crate::observability;

//==================================================================================
// I. Dtype Translation
//==================================================================================

/// Translates a `pyarrow.DataType` into the name of its universal dtype.
#[pyfunction]
#[pyo3(name = "translate_dtype")]
pub fn translate_dtype_py(dtype: PyArrowType<DataType>) -> PyResult<String> {
    let dtype = bridge::translate_dtype(&dtype.0)?;
    Ok(dtype.to_string())
}

/// Builds the `pyarrow.DataType` for a universal dtype name.
#[pyfunction]
#[pyo3(name = "reverse_translate_dtype")]
pub fn reverse_translate_dtype_py(dtype: &str) -> PyResult<PyArrowType<DataType>> {
    Ok(PyArrowType(bridge::reverse_translate_dtype(dtype)?))
}

//==================================================================================
// II. Diagnostics
//==================================================================================

#[pyfunction]
#[pyo3(name = "enable_verbose_logging", signature = (log_file=None))]
pub fn enable_verbose_logging_py(log_file: Option<String>) -> PyResult<()> {
    observability::enable_verbose_logging(log_file.as_deref())?;
    Ok(())
}
