// src/table/arrow.rs

use anyhow::Result;
use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use serde_json::Value;
use std::sync::Arc;

use crate::error::RecordError;
use crate::record::PlayerRecord;

/// Pick an Arrow type for one column from the JSON values it holds.
///
/// - only booleans                → Boolean
/// - only integers                → Int64
/// - integers and floats          → Float64
/// - anything else (or all null)  → Utf8, non-strings JSON-encoded
///
/// Nulls never influence the choice.
pub fn infer_data_type<'a>(values: impl IntoIterator<Item = &'a Value>) -> DataType {
    let (mut bools, mut ints, mut floats, mut other) = (false, false, false, false);
    for v in values {
        match v {
            Value::Null => {}
            Value::Bool(_) => bools = true,
            Value::Number(n) if n.is_i64() => ints = true,
            Value::Number(_) => floats = true,
            _ => other = true,
        }
    }

    match (bools, ints, floats, other) {
        (_, _, _, true) => DataType::Utf8,
        (true, false, false, false) => DataType::Boolean,
        (false, true, false, false) => DataType::Int64,
        (false, _, true, false) => DataType::Float64,
        _ => DataType::Utf8,
    }
}

/// Columns are the first record's keys, in order. Every other record must
/// carry each of them; extra keys on later records are ignored.
pub fn build_schema(records: &[PlayerRecord]) -> Result<Arc<Schema>, RecordError> {
    let first = records.first().ok_or(RecordError::Empty)?;

    let mut fields = Vec::with_capacity(first.len());
    for key in first.keys() {
        let values = records
            .iter()
            .map(|r| r.get(key))
            .collect::<Result<Vec<_>, _>>()?;
        fields.push(Field::new(key, infer_data_type(values), true));
    }

    Ok(Arc::new(Schema::new(fields)))
}

static NULL: Value = Value::Null;

fn build_column(records: &[PlayerRecord], key: &str, ty: &DataType) -> ArrayRef {
    let values = records.iter().map(|r| r.get(key).unwrap_or(&NULL));
    match ty {
        DataType::Boolean => Arc::new(values.map(Value::as_bool).collect::<BooleanArray>()),
        DataType::Int64 => Arc::new(values.map(Value::as_i64).collect::<Int64Array>()),
        DataType::Float64 => Arc::new(values.map(Value::as_f64).collect::<Float64Array>()),
        _ => Arc::new(
            values
                .map(|v| match v {
                    Value::Null => None,
                    Value::String(s) => Some(s.clone()),
                    other => Some(other.to_string()),
                })
                .collect::<StringArray>(),
        ),
    }
}

/// One row per record.
pub fn records_to_batch(records: &[PlayerRecord]) -> Result<RecordBatch> {
    let schema = build_schema(records)?;
    let columns = schema
        .fields()
        .iter()
        .map(|f| build_column(records, f.name(), f.data_type()))
        .collect::<Vec<_>>();
    Ok(RecordBatch::try_new(schema, columns)?)
}
