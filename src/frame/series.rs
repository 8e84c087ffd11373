// In: src/frame/series.rs

use std::str::FromStr;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray, Datum, Scalar};
use arrow::compute::kernels::{cmp, numeric};
use arrow::compute::{and, cast, cast_with_options};
use arrow::error::ArrowError;
use arrow_schema::{DataType, Field, FieldRef};

use super::NativeHandle;
use crate::bridge::comparand::strict_cast_options;
use crate::bridge::{
    validate_column_comparand, ArrowTranslator, Comparand, DtypeTranslator, NativeOperand,
    ValidatedComparand,
};
use crate::engine::Implementation;
use crate::error::{BridgeError, Result};
use crate::types::{DType, IntoDType};

/// Element-wise operators a series can apply against a comparand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl BinaryOp {
    fn apply(self, lhs: &dyn Datum, rhs: &dyn Datum) -> std::result::Result<ArrayRef, ArrowError> {
        let boolean = |mask: std::result::Result<_, ArrowError>| {
            mask.map(|mask| Arc::new(mask) as ArrayRef)
        };
        match self {
            BinaryOp::Add => numeric::add(lhs, rhs),
            BinaryOp::Sub => numeric::sub(lhs, rhs),
            BinaryOp::Mul => numeric::mul(lhs, rhs),
            BinaryOp::Div => numeric::div(lhs, rhs),
            BinaryOp::Eq => boolean(cmp::eq(lhs, rhs)),
            BinaryOp::NotEq => boolean(cmp::neq(lhs, rhs)),
            BinaryOp::Lt => boolean(cmp::lt(lhs, rhs)),
            BinaryOp::LtEq => boolean(cmp::lt_eq(lhs, rhs)),
            BinaryOp::Gt => boolean(cmp::gt(lhs, rhs)),
            BinaryOp::GtEq => boolean(cmp::gt_eq(lhs, rhs)),
        }
    }
}

/// Which ends of an `is_between` range are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClosedInterval {
    Left,
    Right,
    #[default]
    Both,
    None,
}

impl FromStr for ClosedInterval {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "left" => Ok(ClosedInterval::Left),
            "right" => Ok(ClosedInterval::Right),
            "both" => Ok(ClosedInterval::Both),
            "none" => Ok(ClosedInterval::None),
            other => Err(BridgeError::InvalidOperation(format!(
                "closed must be one of 'left', 'right', 'both' or 'none', got '{other}'"
            ))),
        }
    }
}

/// A named Arrow column owned by the bridge.
///
/// Holds exactly one native array plus the translator of the engine it came
/// from. Cloning is cheap: both are reference-counted.
#[derive(Debug, Clone)]
pub struct ArrowSeries {
    field: FieldRef,
    array: ArrayRef,
    translator: Arc<ArrowTranslator>,
}

impl ArrowSeries {
    pub fn new(name: &str, array: ArrayRef, translator: Arc<ArrowTranslator>) -> Self {
        let field = Arc::new(Field::new(name, array.data_type().clone(), true));
        Self {
            field,
            array,
            translator,
        }
    }

    /// Builds a series from an explicit field, e.g. to keep dictionary ordering.
    pub fn from_field(
        field: FieldRef,
        array: ArrayRef,
        translator: Arc<ArrowTranslator>,
    ) -> Result<Self> {
        if field.data_type() != array.data_type() {
            return Err(BridgeError::InvalidOperation(format!(
                "field '{}' is declared as {} but its array holds {}",
                field.name(),
                field.data_type(),
                array.data_type()
            )));
        }
        Ok(Self {
            field,
            array,
            translator,
        })
    }

    pub fn name(&self) -> &str {
        self.field.name()
    }

    pub fn field(&self) -> &FieldRef {
        &self.field
    }

    pub fn len(&self) -> usize {
        self.array.len()
    }

    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }

    /// The universal dtype of this series.
    pub fn dtype(&self) -> Result<DType> {
        self.translator.translate_dtype(self.array.data_type())
    }

    /// The underlying native array.
    pub fn native(&self) -> &ArrayRef {
        &self.array
    }

    pub fn into_native(self) -> ArrayRef {
        self.array
    }

    pub fn translator(&self) -> &Arc<ArrowTranslator> {
        &self.translator
    }

    /// Returns the value at `index` as a native scalar.
    pub fn get(&self, index: usize) -> Result<Scalar<ArrayRef>> {
        if index >= self.len() {
            return Err(BridgeError::InvalidOperation(format!(
                "index {} is out of bounds for series of length {}",
                index,
                self.len()
            )));
        }
        Ok(Scalar::new(self.array.slice(index, 1)))
    }

    pub fn rename(&self, name: &str) -> Self {
        Self {
            field: Arc::new(self.field.as_ref().clone().with_name(name)),
            array: Arc::clone(&self.array),
            translator: Arc::clone(&self.translator),
        }
    }

    /// Casts to the native type the translator picks for `dtype`.
    pub fn cast(&self, dtype: impl IntoDType) -> Result<Self> {
        let target = self.translator.reverse_translate_dtype(dtype)?;
        Ok(self.with_array(cast(&self.array, &target)?))
    }

    fn with_array(&self, array: ArrayRef) -> Self {
        Self::new(self.name(), array, Arc::clone(&self.translator))
    }

    //==============================================================================
    // Binary Operations
    //==============================================================================

    /// Applies `op` against `other`.
    ///
    /// Returns `Ok(None)` when `other` asks for the reflected operation (it is a
    /// dataframe), mirroring the reflected-operator protocol of the wrapper layer.
    pub fn binary(&self, other: impl Into<Comparand>, op: BinaryOp) -> Result<Option<Self>> {
        let rhs = match validate_column_comparand(other.into())? {
            ValidatedComparand::Native(rhs) => rhs,
            ValidatedComparand::Reflect => {
                log::debug!("{:?} on series '{}' deferred to reflected operation", op, self.name());
                return Ok(None);
            }
        };
        let (lhs, rhs) = promote_operands(&self.array, rhs)?;
        let result = op.apply(&lhs, rhs.as_datum())?;
        Ok(Some(self.with_array(result)))
    }

    pub fn add(&self, other: impl Into<Comparand>) -> Result<Option<Self>> {
        self.binary(other, BinaryOp::Add)
    }

    pub fn sub(&self, other: impl Into<Comparand>) -> Result<Option<Self>> {
        self.binary(other, BinaryOp::Sub)
    }

    pub fn mul(&self, other: impl Into<Comparand>) -> Result<Option<Self>> {
        self.binary(other, BinaryOp::Mul)
    }

    pub fn div(&self, other: impl Into<Comparand>) -> Result<Option<Self>> {
        self.binary(other, BinaryOp::Div)
    }

    pub fn eq(&self, other: impl Into<Comparand>) -> Result<Option<Self>> {
        self.binary(other, BinaryOp::Eq)
    }

    pub fn neq(&self, other: impl Into<Comparand>) -> Result<Option<Self>> {
        self.binary(other, BinaryOp::NotEq)
    }

    pub fn lt(&self, other: impl Into<Comparand>) -> Result<Option<Self>> {
        self.binary(other, BinaryOp::Lt)
    }

    pub fn lt_eq(&self, other: impl Into<Comparand>) -> Result<Option<Self>> {
        self.binary(other, BinaryOp::LtEq)
    }

    pub fn gt(&self, other: impl Into<Comparand>) -> Result<Option<Self>> {
        self.binary(other, BinaryOp::Gt)
    }

    pub fn gt_eq(&self, other: impl Into<Comparand>) -> Result<Option<Self>> {
        self.binary(other, BinaryOp::GtEq)
    }

    /// Boolean mask of values inside `[lower, upper]`, with the ends included as
    /// `closed` says.
    pub fn is_between(
        &self,
        lower: impl Into<Comparand>,
        upper: impl Into<Comparand>,
        closed: ClosedInterval,
    ) -> Result<Self> {
        let (lower_op, upper_op) = match closed {
            ClosedInterval::Left => (BinaryOp::GtEq, BinaryOp::Lt),
            ClosedInterval::Right => (BinaryOp::Gt, BinaryOp::LtEq),
            ClosedInterval::Both => (BinaryOp::GtEq, BinaryOp::LtEq),
            ClosedInterval::None => (BinaryOp::Gt, BinaryOp::Lt),
        };
        let above = self.bound_mask(lower.into(), lower_op)?;
        let below = self.bound_mask(upper.into(), upper_op)?;
        let mask = and(above.native().as_boolean(), below.native().as_boolean())?;
        Ok(self.with_array(Arc::new(mask)))
    }

    fn bound_mask(&self, bound: Comparand, op: BinaryOp) -> Result<Self> {
        self.binary(bound, op)?.ok_or_else(|| {
            BridgeError::InvalidOperation("is_between bounds cannot be dataframes".to_string())
        })
    }
}

impl NativeHandle for ArrowSeries {
    fn implementation(&self) -> Implementation {
        self.translator.implementation()
    }

    fn len(&self) -> usize {
        self.array.len()
    }
}

/// Brings numeric operands of different widths to a common type.
///
/// Arrow kernels require both sides to share a type. Any float widens both sides
/// to Float64; integers widen to Int64, or UInt64 when both are unsigned.
/// Non-numeric mismatches are left for the kernel to reject. A value that does
/// not fit the common type fails the operation.
fn promote_operands(lhs: &ArrayRef, rhs: NativeOperand) -> Result<(ArrayRef, NativeOperand)> {
    let target = match numeric_supertype(lhs.data_type(), rhs.data_type()) {
        Some(target) => target,
        None => return Ok((Arc::clone(lhs), rhs)),
    };
    let lhs = if lhs.data_type() == &target {
        Arc::clone(lhs)
    } else {
        cast_with_options(lhs, &target, &strict_cast_options())?
    };
    let rhs = if rhs.data_type() == &target {
        rhs
    } else {
        rhs.cast(&target)?
    };
    Ok((lhs, rhs))
}

fn numeric_supertype(lhs: &DataType, rhs: &DataType) -> Option<DataType> {
    if lhs == rhs || !lhs.is_numeric() || !rhs.is_numeric() {
        return None;
    }
    if lhs.is_floating() || rhs.is_floating() {
        Some(DataType::Float64)
    } else if lhs.is_unsigned_integer() && rhs.is_unsigned_integer() {
        Some(DataType::UInt64)
    } else {
        Some(DataType::Int64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{
        BooleanArray, Float64Array, Int32Array, Int64Array, StringArray, UInt64Array,
    };
    use arrow::datatypes::{Float64Type, Int64Type};

    fn series(name: &str, array: ArrayRef) -> ArrowSeries {
        ArrowSeries::new(name, array, Arc::new(ArrowTranslator::default()))
    }

    fn ints(values: Vec<i64>) -> ArrowSeries {
        series("a", Arc::new(Int64Array::from(values)))
    }

    fn as_i64(series: &ArrowSeries) -> Vec<i64> {
        series.native().as_primitive::<Int64Type>().values().to_vec()
    }

    fn as_bools(series: &ArrowSeries) -> Vec<bool> {
        series.native().as_boolean().iter().map(|v| v.unwrap()).collect()
    }

    #[test]
    fn test_add_two_series() {
        let a = ints(vec![1, 3, 2]);
        let b = series("b", Arc::new(Int64Array::from(vec![4, 4, 6])));
        let c = a.add(&b).unwrap().unwrap();
        assert_eq!(as_i64(&c), vec![5, 7, 8]);
        assert_eq!(c.name(), "a");
    }

    #[test]
    fn test_mul_by_scalar() {
        let doubled = ints(vec![1, 3, 2]).mul(2i64).unwrap().unwrap();
        assert_eq!(as_i64(&doubled), vec![2, 6, 4]);
    }

    #[test]
    fn test_length_one_series_broadcasts() {
        let a = ints(vec![1, 3, 2]);
        let ten = series("ten", Arc::new(Int64Array::from(vec![10])));
        let result = a.add(&ten).unwrap().unwrap();
        assert_eq!(as_i64(&result), vec![11, 13, 12]);
    }

    #[test]
    fn test_int_and_float_promote_to_float64() {
        let z = series("z", Arc::new(Float64Array::from(vec![7.0, 8.0, 9.0])));
        let result = z.sub(2i64).unwrap().unwrap();
        assert_eq!(result.dtype().unwrap(), DType::Float64);
        assert_eq!(
            result.native().as_primitive::<Float64Type>().values().to_vec(),
            vec![5.0, 6.0, 7.0]
        );

        let narrow = series("n", Arc::new(Int32Array::from(vec![1, 2])));
        let halves = narrow.div(0.5).unwrap().unwrap();
        assert_eq!(halves.dtype().unwrap(), DType::Float64);
    }

    #[test]
    fn test_promotion_overflow_is_an_error() {
        let big = series("u", Arc::new(UInt64Array::from(vec![u64::MAX])));
        assert!(matches!(big.add(1i64), Err(BridgeError::Arrow(_))));

        let small = series("u", Arc::new(UInt64Array::from(vec![7])));
        let sum = small.add(1i64).unwrap().unwrap();
        assert_eq!(sum.dtype().unwrap(), DType::Int64);
        assert_eq!(as_i64(&sum), vec![8]);
    }

    #[test]
    fn test_comparisons_yield_boolean_series() {
        let a = ints(vec![1, 4, 2, 5]);
        let mask = a.gt(2i64).unwrap().unwrap();
        assert_eq!(mask.dtype().unwrap(), DType::Boolean);
        assert_eq!(as_bools(&mask), vec![false, true, false, true]);

        let names = series("s", Arc::new(StringArray::from(vec!["x", "y"])));
        let mask = names.eq("y").unwrap().unwrap();
        assert_eq!(as_bools(&mask), vec![false, true]);
    }

    #[test]
    fn test_series_vs_sorted_self() {
        let s = ints(vec![1, 3, 2]);
        let sorted = ints(vec![1, 2, 3]);
        let mask = s.gt(&sorted).unwrap().unwrap();
        assert_eq!(as_bools(&mask), vec![false, true, false]);
    }

    #[test]
    fn test_is_between_closed_variants() {
        let a = ints(vec![1, 4, 2, 5]);
        let cases = [
            ("left", vec![true, true, true, false]),
            ("right", vec![false, true, true, true]),
            ("both", vec![true, true, true, true]),
            ("none", vec![false, true, true, false]),
        ];
        for (closed, expected) in cases {
            let closed: ClosedInterval = closed.parse().unwrap();
            let mask = a.is_between(1i64, 5i64, closed).unwrap();
            assert_eq!(as_bools(&mask), expected, "closed={closed:?}");
        }
    }

    #[test]
    fn test_invalid_closed_is_rejected() {
        assert!("middle".parse::<ClosedInterval>().is_err());
    }

    #[test]
    fn test_multi_output_rhs_is_rejected() {
        let a = ints(vec![1, 2]);
        let err = a
            .add(vec![ints(vec![1, 2]), ints(vec![3, 4])])
            .unwrap_err();
        assert!(err.to_string().contains("Multi-output expressions"));
    }

    #[test]
    fn test_mismatched_lengths_surface_arrow_error() {
        let a = ints(vec![1, 2, 3]);
        let b = ints(vec![1, 2]);
        assert!(matches!(a.add(&b), Err(BridgeError::Arrow(_))));
    }

    #[test]
    fn test_get_and_bounds() {
        let a = ints(vec![7, 8]);
        let scalar = a.get(1).unwrap();
        let (value, is_scalar) = scalar.get();
        assert!(is_scalar);
        assert_eq!(value.as_primitive::<Int64Type>().value(0), 8);
        assert!(matches!(a.get(2), Err(BridgeError::InvalidOperation(_))));
    }

    #[test]
    fn test_cast_uses_reverse_translation() {
        let a = ints(vec![1, 2]);
        let as_float = a.cast(DType::Float32).unwrap();
        assert_eq!(as_float.native().data_type(), &DataType::Float32);

        let as_cat = series("c", Arc::new(StringArray::from(vec!["x", "y", "x"])))
            .cast("categorical")
            .unwrap();
        assert_eq!(as_cat.dtype().unwrap(), DType::Categorical);

        assert!(matches!(a.cast(DType::Enum), Err(BridgeError::UnknownDtype(_))));
    }

    #[test]
    fn test_from_field_rejects_mismatched_type() {
        let field = Arc::new(Field::new("b", DataType::Boolean, true));
        let array: ArrayRef = Arc::new(BooleanArray::from(vec![true]));
        assert!(ArrowSeries::from_field(field, array, Arc::new(ArrowTranslator::default())).is_ok());

        let field = Arc::new(Field::new("b", DataType::Int8, true));
        let array: ArrayRef = Arc::new(BooleanArray::from(vec![true]));
        let result = ArrowSeries::from_field(field, array, Arc::new(ArrowTranslator::default()));
        assert!(matches!(result, Err(BridgeError::InvalidOperation(_))));
    }

    #[test]
    fn test_rename_keeps_data() {
        let a = ints(vec![1]);
        let o = a.rename("o");
        assert_eq!(o.name(), "o");
        assert!(Arc::ptr_eq(o.native(), a.native()));
    }
}
