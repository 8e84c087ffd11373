// In: src/bridge/comparand.rs

//! Normalisation of the right-hand operand of binary, elementwise and
//! frame-level operations.
//!
//! Every operand is classified at call time into one of a handful of shapes
//! (`Comparand`) and either rejected or turned into something an Arrow kernel
//! accepts directly (`NativeOperand`). A dataframe operand is never an error
//! here: it yields `ValidatedComparand::Reflect` so the caller's operator
//! dispatch can retry with the operands swapped.

use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, BooleanArray, Datum, Float64Array, Int32Array, Int64Array, Scalar,
    StringArray,
};
use arrow::compute::{cast_with_options, CastOptions};
use arrow_schema::DataType;

use crate::error::{BridgeError, Result};
use crate::frame::{ArrowDataFrame, ArrowSeries};

//==================================================================================
// 1. Operand Shapes
//==================================================================================

/// The "other" argument of an operation, before normalisation.
#[derive(Debug, Clone)]
pub enum Comparand {
    /// A native Arrow scalar (a length-1 array flagged for broadcasting).
    Scalar(Scalar<ArrayRef>),
    /// A plain sequence, as produced by multi-output expressions.
    List(Vec<Comparand>),
    Series(ArrowSeries),
    DataFrame(ArrowDataFrame),
}

/// A right-hand side that an Arrow kernel can consume as-is.
#[derive(Debug, Clone)]
pub enum NativeOperand {
    Scalar(Scalar<ArrayRef>),
    Array(ArrayRef),
}

/// The outcome of comparand validation.
#[derive(Debug, Clone)]
pub enum ValidatedComparand {
    Native(NativeOperand),
    /// The operation is not supported in this order; retry it reflected.
    Reflect,
}

impl NativeOperand {
    pub fn as_datum(&self) -> &dyn Datum {
        match self {
            NativeOperand::Scalar(scalar) => scalar as &dyn Datum,
            NativeOperand::Array(array) => array as &dyn Datum,
        }
    }

    pub fn data_type(&self) -> &DataType {
        match self {
            NativeOperand::Scalar(scalar) => scalar.get().0.data_type(),
            NativeOperand::Array(array) => array.data_type(),
        }
    }

    /// Casts the operand, keeping its shape. A value that does not fit `to` is
    /// an error, never a null.
    pub fn cast(&self, to: &DataType) -> Result<NativeOperand> {
        let options = strict_cast_options();
        let casted = match self {
            NativeOperand::Scalar(scalar) => NativeOperand::Scalar(Scalar::new(
                cast_with_options(scalar.get().0, to, &options)?,
            )),
            NativeOperand::Array(array) => {
                NativeOperand::Array(cast_with_options(array, to, &options)?)
            }
        };
        Ok(casted)
    }
}

/// Cast options that fail on overflow instead of writing nulls.
pub(crate) fn strict_cast_options() -> CastOptions<'static> {
    CastOptions {
        safe: false,
        ..Default::default()
    }
}

impl ValidatedComparand {
    pub fn is_reflect(&self) -> bool {
        matches!(self, ValidatedComparand::Reflect)
    }
}

//==================================================================================
// 2. Validation Entry Points
//==================================================================================

/// Validates the right-hand side of a series-level binary operation.
///
/// A length-1 series is returned as its scalar so the kernel broadcasts it; it is
/// never aligned element-wise against a longer series.
pub fn validate_column_comparand(other: Comparand) -> Result<ValidatedComparand> {
    let validated = match other {
        // e.g. `all() + all()`
        Comparand::List(items) => return validate_column_comparand(unwrap_single(items)?),
        Comparand::DataFrame(_) => ValidatedComparand::Reflect,
        Comparand::Series(series) if series.len() == 1 => {
            log::debug!("broadcasting length-1 series '{}'", series.name());
            ValidatedComparand::Native(NativeOperand::Scalar(series.get(0)?))
        }
        Comparand::Series(series) => ValidatedComparand::Native(NativeOperand::Array(
            series.into_native(),
        )),
        Comparand::Scalar(scalar) => ValidatedComparand::Native(NativeOperand::Scalar(scalar)),
    };
    Ok(validated)
}

/// Validates the "other" operand of a frame-level operation.
///
/// Only frames and series reach this call site. Broadcasting a length-1 series
/// against a frame has no defined semantics yet and is reported as
/// `NotImplemented`.
pub fn validate_dataframe_comparand(other: Comparand) -> Result<ValidatedComparand> {
    match other {
        Comparand::DataFrame(_) => Ok(ValidatedComparand::Reflect),
        Comparand::Series(series) if series.len() == 1 => Err(BridgeError::NotImplemented(
            "broadcasting a length-1 series against a dataframe".to_string(),
        )),
        Comparand::Series(series) => Ok(ValidatedComparand::Native(NativeOperand::Array(
            series.into_native(),
        ))),
        other => Err(BridgeError::InternalError(format!(
            "unexpected dataframe comparand {}. Please report a bug",
            shape_name(&other)
        ))),
    }
}

fn unwrap_single(mut items: Vec<Comparand>) -> Result<Comparand> {
    match items.len() {
        0 => Err(BridgeError::InvalidOperation(
            "empty list used as a comparand".to_string(),
        )),
        1 => Ok(items.remove(0)),
        n => Err(BridgeError::MultiOutput(n)),
    }
}

fn shape_name(comparand: &Comparand) -> &'static str {
    match comparand {
        Comparand::Scalar(_) => "scalar",
        Comparand::List(_) => "list",
        Comparand::Series(_) => "series",
        Comparand::DataFrame(_) => "dataframe",
    }
}

//==================================================================================
// 3. Conversions
//==================================================================================

fn scalar_of<A: Array + 'static>(array: A) -> Comparand {
    Comparand::Scalar(Scalar::new(Arc::new(array) as ArrayRef))
}

impl From<i64> for Comparand {
    fn from(value: i64) -> Self {
        scalar_of(Int64Array::from(vec![value]))
    }
}

impl From<i32> for Comparand {
    fn from(value: i32) -> Self {
        scalar_of(Int32Array::from(vec![value]))
    }
}

impl From<f64> for Comparand {
    fn from(value: f64) -> Self {
        scalar_of(Float64Array::from(vec![value]))
    }
}

impl From<bool> for Comparand {
    fn from(value: bool) -> Self {
        scalar_of(BooleanArray::from(vec![value]))
    }
}

impl From<&str> for Comparand {
    fn from(value: &str) -> Self {
        scalar_of(StringArray::from(vec![value]))
    }
}

impl From<String> for Comparand {
    fn from(value: String) -> Self {
        Comparand::from(value.as_str())
    }
}

impl From<Scalar<ArrayRef>> for Comparand {
    fn from(value: Scalar<ArrayRef>) -> Self {
        Comparand::Scalar(value)
    }
}

impl From<ArrowSeries> for Comparand {
    fn from(value: ArrowSeries) -> Self {
        Comparand::Series(value)
    }
}

impl From<&ArrowSeries> for Comparand {
    fn from(value: &ArrowSeries) -> Self {
        Comparand::Series(value.clone())
    }
}

impl From<ArrowDataFrame> for Comparand {
    fn from(value: ArrowDataFrame) -> Self {
        Comparand::DataFrame(value)
    }
}

impl From<&ArrowDataFrame> for Comparand {
    fn from(value: &ArrowDataFrame) -> Self {
        Comparand::DataFrame(value.clone())
    }
}

impl<T: Into<Comparand>> From<Vec<T>> for Comparand {
    fn from(values: Vec<T>) -> Self {
        Comparand::List(values.into_iter().map(Into::into).collect())
    }
}
