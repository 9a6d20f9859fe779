// src/table/merge.rs

use anyhow::{bail, Context, Result};
use arrow::array::{Array, ArrayRef};
use arrow::compute::{cast, concat_batches};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::{
    cmp::Ordering,
    fs::{self, File},
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::{debug, info, instrument};

/// Rows shown by [`MergedTable::preview`] by default.
pub const PREVIEW_ROWS: usize = 5;

/// Every per-week table in a directory, stacked in file order.
#[derive(Debug, Clone)]
pub struct MergedTable {
    pub files: Vec<PathBuf>,
    pub batch: RecordBatch,
}

impl MergedTable {
    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    /// Pretty-printed first `rows` rows.
    pub fn preview(&self, rows: usize) -> Result<String> {
        let head = self.batch.slice(0, rows.min(self.batch.num_rows()));
        Ok(pretty_format_batches(&[head])?.to_string())
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Chunk<'a> {
    // (length, digits) with leading zeros stripped sorts numerically at any width
    Num(usize, &'a str),
    Text(&'a str),
}

fn natural_key(name: &str) -> Vec<Chunk<'_>> {
    let mut out = Vec::new();
    let mut rest = name;
    while let Some(c) = rest.chars().next() {
        let digit = c.is_ascii_digit();
        let end = rest
            .find(|ch: char| ch.is_ascii_digit() != digit)
            .unwrap_or(rest.len());
        let (run, tail) = rest.split_at(end);
        if digit {
            let trimmed = run.trim_start_matches('0');
            out.push(Chunk::Num(trimmed.len(), trimmed));
        } else {
            out.push(Chunk::Text(run));
        }
        rest = tail;
    }
    out
}

fn natural_cmp(a: &str, b: &str) -> Ordering {
    natural_key(a).cmp(&natural_key(b)).then_with(|| a.cmp(b))
}

/// Regular, non-hidden files directly under `dir`, in natural name order
/// (`week_2` before `week_10`). Hidden files cover in-progress writes.
pub fn list_table_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("reading directory {}", dir.display()))? {
        let entry = entry?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            debug!(file = %entry.path().display(), "skipping hidden file");
            continue;
        }
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort_by(|a, b| {
        let a = a.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        let b = b.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        natural_cmp(&a, &b)
    });
    Ok(files)
}

/// Read a whole Parquet file into a single batch.
pub fn read_parquet(path: impl AsRef<Path>) -> Result<RecordBatch> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .with_context(|| format!("{} is not a readable Parquet file", path.display()))?;
    let schema = builder.schema().clone();
    let batches = builder
        .build()?
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("reading batches from {}", path.display()))?;
    Ok(concat_batches(&schema, &batches)?)
}

/// Common type for one column seen as `a` in some files and `b` in others.
fn widen(a: &DataType, b: &DataType) -> DataType {
    match (a, b) {
        (a, b) if a == b => a.clone(),
        (DataType::Int64, DataType::Float64) | (DataType::Float64, DataType::Int64) => {
            DataType::Float64
        }
        _ => DataType::Utf8,
    }
}

/// One schema every batch can be cast to. Column names must match in order;
/// a column that is entirely null in a file does not vote on its type.
fn unify_schema(files: &[PathBuf], batches: &[RecordBatch]) -> Result<SchemaRef> {
    let first = batches[0].schema();
    for (path, batch) in files.iter().zip(batches) {
        let names = batch.schema().fields().iter().map(|f| f.name().clone()).collect::<Vec<_>>();
        let expected = first.fields().iter().map(|f| f.name().clone()).collect::<Vec<_>>();
        if names != expected {
            bail!(
                "columns of {} differ from {}",
                path.display(),
                files[0].display()
            );
        }
    }

    let fields = first
        .fields()
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let ty = batches
                .iter()
                .map(|b| b.column(i))
                .filter(|c| c.null_count() < c.len())
                .map(|c| c.data_type().clone())
                .reduce(|acc, t| widen(&acc, &t))
                .unwrap_or_else(|| field.data_type().clone());
            Field::new(field.name(), ty, true)
        })
        .collect::<Vec<_>>();
    Ok(Arc::new(Schema::new(fields)))
}

fn cast_to(batch: &RecordBatch, schema: &SchemaRef) -> Result<RecordBatch> {
    let columns = batch
        .columns()
        .iter()
        .zip(schema.fields())
        .map(|(col, field)| {
            if col.data_type() == field.data_type() {
                Ok(col.clone())
            } else {
                cast(col, field.data_type())
                    .with_context(|| format!("casting column {} to {}", field.name(), field.data_type()))
            }
        })
        .collect::<Result<Vec<ArrayRef>>>()?;
    Ok(RecordBatch::try_new(schema.clone(), columns)?)
}

/// Concatenate every file in `dir`. A missing directory, a file that is not
/// Parquet, or files with differing column names are errors. Columns whose
/// inferred type drifted between files are cast to a common type
/// (Int64 + Float64 → Float64, other mixes → Utf8).
#[instrument(level = "info", skip(dir), fields(directory = %dir.as_ref().display()))]
pub fn merge_dir(dir: impl AsRef<Path>) -> Result<MergedTable> {
    let files = list_table_files(dir.as_ref())?;

    let mut batches = Vec::with_capacity(files.len());
    for path in &files {
        let batch = read_parquet(path)?;
        debug!(file = %path.display(), rows = batch.num_rows(), "read table");
        batches.push(batch);
    }

    if batches.is_empty() {
        info!("no tables to merge");
        return Ok(MergedTable {
            files,
            batch: RecordBatch::new_empty(Arc::new(Schema::empty())),
        });
    }

    let schema = unify_schema(&files, &batches)?;
    let batches = batches
        .iter()
        .map(|b| cast_to(b, &schema))
        .collect::<Result<Vec<_>>>()?;

    let batch = concat_batches(&schema, &batches).context("concatenating tables")?;
    info!(files = files.len(), rows = batch.num_rows(), "merged tables");
    Ok(MergedTable { files, batch })
}
