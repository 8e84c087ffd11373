// In: src/frame/dataframe.rs

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::{concat_batches, filter_record_batch};
use arrow::record_batch::RecordBatch;
use arrow_schema::{FieldRef, Schema};

use super::{ArrowSeries, FrameHandle, NativeHandle};
use crate::bridge::{
    validate_dataframe_comparand, ArrowTranslator, Comparand, DtypeTranslator, NativeOperand,
    ValidatedComparand,
};
use crate::engine::Implementation;
use crate::error::{BridgeError, Result};
use crate::types::DType;
use crate::utils::{maybe_align_index, validate_laziness, validate_same_library};

/// How `ArrowDataFrame::concat` stacks its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConcatMethod {
    /// Append rows; all schemas must match.
    Vertical,
    /// Append columns; all heights must match.
    Horizontal,
}

/// An eager Arrow table owned by the bridge.
#[derive(Debug, Clone)]
pub struct ArrowDataFrame {
    batch: RecordBatch,
    translator: Arc<ArrowTranslator>,
}

impl ArrowDataFrame {
    pub fn new(batch: RecordBatch, translator: Arc<ArrowTranslator>) -> Self {
        Self { batch, translator }
    }

    /// Assembles a frame from series, which must all have the same length.
    pub fn from_columns(columns: Vec<ArrowSeries>, translator: Arc<ArrowTranslator>) -> Result<Self> {
        if columns.is_empty() {
            return Ok(Self::new(
                RecordBatch::new_empty(Arc::new(Schema::empty())),
                translator,
            ));
        }
        let fields: Vec<FieldRef> = columns.iter().map(|c| Arc::clone(c.field())).collect();
        let arrays: Vec<ArrayRef> = columns.into_iter().map(ArrowSeries::into_native).collect();
        let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?;
        Ok(Self::new(batch, translator))
    }

    /// The underlying native record batch.
    pub fn native(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn translator(&self) -> &Arc<ArrowTranslator> {
        &self.translator
    }

    pub fn columns(&self) -> Vec<String> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    pub fn height(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn width(&self) -> usize {
        self.batch.num_columns()
    }

    /// Column names with their universal dtypes, in column order.
    pub fn schema(&self) -> Result<Vec<(String, DType)>> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|field| {
                let dtype = self.translator.translate_dtype(field.data_type())?;
                Ok((field.name().clone(), dtype))
            })
            .collect()
    }

    pub fn column(&self, name: &str) -> Result<ArrowSeries> {
        let schema = self.batch.schema();
        let idx = schema
            .index_of(name)
            .map_err(|_| BridgeError::InvalidOperation(format!("column not found: {name}")))?;
        ArrowSeries::from_field(
            Arc::clone(&schema.fields()[idx]),
            Arc::clone(self.batch.column(idx)),
            Arc::clone(&self.translator),
        )
    }

    /// Keeps the rows where `predicate` is true.
    pub fn filter(&self, predicate: &ArrowSeries) -> Result<Self> {
        let mask = self.series_operand(predicate)?;
        let mask = mask.as_boolean_opt().ok_or_else(|| {
            BridgeError::InvalidOperation(format!(
                "filter predicate must be Boolean, got {}",
                mask.data_type()
            ))
        })?;
        Ok(self.with_batch(filter_record_batch(&self.batch, mask)?))
    }

    /// Adds `value` as a column, replacing any column with the same name.
    pub fn with_column(&self, value: &ArrowSeries) -> Result<Self> {
        let array = self.series_operand(value)?;
        let schema = self.batch.schema();
        let mut fields: Vec<FieldRef> = schema.fields().iter().cloned().collect();
        let mut arrays: Vec<ArrayRef> = self.batch.columns().to_vec();
        match schema.index_of(value.name()) {
            Ok(idx) => {
                fields[idx] = Arc::clone(value.field());
                arrays[idx] = array;
            }
            Err(_) => {
                fields.push(Arc::clone(value.field()));
                arrays.push(array);
            }
        }
        let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?;
        Ok(self.with_batch(batch))
    }

    /// Normalises a series operand through the frame-level validator, then checks
    /// that it lines up with this frame's rows.
    fn series_operand(&self, series: &ArrowSeries) -> Result<ArrayRef> {
        let array = match validate_dataframe_comparand(Comparand::Series(series.clone()))? {
            ValidatedComparand::Native(NativeOperand::Array(array)) => array,
            other => {
                return Err(BridgeError::InternalError(format!(
                    "series operand '{}' normalised to {:?}",
                    series.name(),
                    other
                )))
            }
        };
        maybe_align_index(self, series)?;
        Ok(array)
    }

    fn with_batch(&self, batch: RecordBatch) -> Self {
        Self::new(batch, Arc::clone(&self.translator))
    }

    /// Concatenates frames from the same engine.
    pub fn concat(frames: &[ArrowDataFrame], how: ConcatMethod) -> Result<Self> {
        let first = frames.first().ok_or_else(|| {
            BridgeError::InvalidOperation("cannot concatenate an empty list of frames".to_string())
        })?;
        validate_same_library(frames.iter())?;
        validate_laziness(frames.iter())?;

        let batch = match how {
            ConcatMethod::Vertical => {
                let schema = first.batch.schema();
                if let Some(other) = frames.iter().find(|f| f.batch.schema() != schema) {
                    return Err(BridgeError::InvalidOperation(format!(
                        "unable to vstack, schemas differ: {:?} vs {:?}",
                        first.columns(),
                        other.columns()
                    )));
                }
                concat_batches(&schema, frames.iter().map(|f| &f.batch))?
            }
            ConcatMethod::Horizontal => {
                let mut fields: Vec<FieldRef> = Vec::new();
                let mut arrays: Vec<ArrayRef> = Vec::new();
                for frame in frames {
                    maybe_align_index(first, frame)?;
                    for (field, array) in frame.batch.schema().fields().iter().zip(frame.batch.columns()) {
                        if fields.iter().any(|seen| seen.name() == field.name()) {
                            return Err(BridgeError::InvalidOperation(format!(
                                "duplicate column name '{}' in horizontal concat",
                                field.name()
                            )));
                        }
                        fields.push(Arc::clone(field));
                        arrays.push(Arc::clone(array));
                    }
                }
                RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?
            }
        };
        Ok(first.with_batch(batch))
    }
}

impl NativeHandle for ArrowDataFrame {
    fn implementation(&self) -> Implementation {
        self.translator.implementation()
    }

    fn len(&self) -> usize {
        self.batch.num_rows()
    }
}

impl FrameHandle for ArrowDataFrame {
    fn is_lazy(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{BooleanArray, Float64Array, Int64Array, StringArray};
    use arrow::datatypes::Int64Type;

    fn translator() -> Arc<ArrowTranslator> {
        Arc::new(ArrowTranslator::default())
    }

    fn sample() -> ArrowDataFrame {
        let t = translator();
        ArrowDataFrame::from_columns(
            vec![
                ArrowSeries::new("a", Arc::new(Int64Array::from(vec![1, 3, 2])), t.clone()),
                ArrowSeries::new("b", Arc::new(Int64Array::from(vec![4, 4, 6])), t.clone()),
                ArrowSeries::new("z", Arc::new(Float64Array::from(vec![7.0, 8.0, 9.0])), t.clone()),
            ],
            t,
        )
        .unwrap()
    }

    fn column_i64(df: &ArrowDataFrame, name: &str) -> Vec<i64> {
        df.column(name)
            .unwrap()
            .native()
            .as_primitive::<Int64Type>()
            .values()
            .to_vec()
    }

    #[test]
    fn test_schema_translates_every_column() {
        let df = sample();
        let schema = df.schema().unwrap();
        assert_eq!(
            schema,
            vec![
                ("a".to_string(), DType::Int64),
                ("b".to_string(), DType::Int64),
                ("z".to_string(), DType::Float64),
            ]
        );
        assert_eq!(df.columns(), vec!["a", "b", "z"]);
        assert_eq!((df.height(), df.width()), (3, 3));
    }

    #[test]
    fn test_empty_frame() {
        let df = ArrowDataFrame::from_columns(vec![], translator()).unwrap();
        assert_eq!((df.height(), df.width()), (0, 0));
        assert!(df.schema().unwrap().is_empty());
    }

    #[test]
    fn test_with_column_from_series_arithmetic() {
        let df = sample();
        let c = df
            .column("a")
            .unwrap()
            .add(&df.column("b").unwrap())
            .unwrap()
            .unwrap()
            .rename("c");
        let df = df.with_column(&c).unwrap();
        assert_eq!(df.columns(), vec!["a", "b", "z", "c"]);
        assert_eq!(column_i64(&df, "c"), vec![5, 7, 8]);
    }

    #[test]
    fn test_with_column_replaces_existing() {
        let df = sample();
        let doubled = df.column("a").unwrap().mul(2i64).unwrap().unwrap();
        let df = df.with_column(&doubled).unwrap();
        assert_eq!(df.columns(), vec!["a", "b", "z"]);
        assert_eq!(column_i64(&df, "a"), vec![2, 6, 4]);
    }

    #[test]
    fn test_filter_by_mask() {
        let df = sample();
        let mask = df.column("a").unwrap().gt(1i64).unwrap().unwrap();
        let filtered = df.filter(&mask).unwrap();
        assert_eq!(column_i64(&filtered, "a"), vec![3, 2]);
        assert_eq!(column_i64(&filtered, "b"), vec![4, 6]);
    }

    #[test]
    fn test_filter_with_length_one_mask_is_not_implemented() {
        let df = ArrowDataFrame::from_columns(
            vec![ArrowSeries::new("a", Arc::new(Int64Array::from(vec![1])), translator())],
            translator(),
        )
        .unwrap();
        let mask = ArrowSeries::new("m", Arc::new(BooleanArray::from(vec![true])), translator());
        let err = df.filter(&mask).unwrap_err();
        assert!(err.is_not_implemented());
    }

    #[test]
    fn test_length_one_operand_against_taller_frame_is_not_implemented() {
        let df = sample();
        let mask = ArrowSeries::new("m", Arc::new(BooleanArray::from(vec![true])), translator());
        assert!(df.filter(&mask).unwrap_err().is_not_implemented());

        let one = ArrowSeries::new("c", Arc::new(Int64Array::from(vec![1])), translator());
        assert!(df.with_column(&one).unwrap_err().is_not_implemented());
    }

    #[test]
    fn test_filter_rejects_non_boolean_and_misaligned() {
        let df = sample();
        let strings = ArrowSeries::new(
            "s",
            Arc::new(StringArray::from(vec!["x", "y", "z"])),
            translator(),
        );
        assert!(matches!(df.filter(&strings), Err(BridgeError::InvalidOperation(_))));

        let short = ArrowSeries::new("m", Arc::new(BooleanArray::from(vec![true, false])), translator());
        assert!(matches!(
            df.filter(&short),
            Err(BridgeError::LengthMismatch { lhs: 3, rhs: 2 })
        ));
    }

    #[test]
    fn test_missing_column() {
        let err = sample().column("nope").unwrap_err();
        assert!(err.to_string().contains("column not found: nope"));
    }

    #[test]
    fn test_concat_vertical() {
        let df = sample();
        let stacked = ArrowDataFrame::concat(&[df.clone(), df], ConcatMethod::Vertical).unwrap();
        assert_eq!(stacked.height(), 6);
        assert_eq!(column_i64(&stacked, "a"), vec![1, 3, 2, 1, 3, 2]);
    }

    #[test]
    fn test_concat_vertical_requires_matching_schema() {
        let right = ArrowDataFrame::from_columns(
            vec![ArrowSeries::new("c", Arc::new(Int64Array::from(vec![6, 12, -1])), translator())],
            translator(),
        )
        .unwrap();
        let result = ArrowDataFrame::concat(&[sample(), right], ConcatMethod::Vertical);
        assert!(matches!(result, Err(BridgeError::InvalidOperation(_))));
    }

    #[test]
    fn test_concat_horizontal() {
        let t = translator();
        let right = ArrowDataFrame::from_columns(
            vec![
                ArrowSeries::new("c", Arc::new(Int64Array::from(vec![6, 12, -1])), t.clone()),
                ArrowSeries::new("d", Arc::new(Int64Array::from(vec![0, -4, 2])), t.clone()),
            ],
            t,
        )
        .unwrap();
        let wide = ArrowDataFrame::concat(&[sample(), right], ConcatMethod::Horizontal).unwrap();
        assert_eq!(wide.columns(), vec!["a", "b", "z", "c", "d"]);
        assert_eq!(column_i64(&wide, "d"), vec![0, -4, 2]);
    }

    #[test]
    fn test_concat_horizontal_checks_heights_and_names() {
        let short = ArrowDataFrame::from_columns(
            vec![ArrowSeries::new("c", Arc::new(Int64Array::from(vec![6])), translator())],
            translator(),
        )
        .unwrap();
        let result = ArrowDataFrame::concat(&[sample(), short], ConcatMethod::Horizontal);
        assert!(matches!(result, Err(BridgeError::LengthMismatch { .. })));

        let result = ArrowDataFrame::concat(&[sample(), sample()], ConcatMethod::Horizontal);
        assert!(matches!(result, Err(BridgeError::InvalidOperation(_))));
    }

    #[test]
    fn test_concat_nothing() {
        assert!(ArrowDataFrame::concat(&[], ConcatMethod::Vertical).is_err());
    }
}
