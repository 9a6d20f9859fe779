// src/table/write.rs

use anyhow::{Context, Result};
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::{
    fs::{self, File},
    io::BufWriter,
    path::{Path, PathBuf},
};
use tracing::{debug, info, instrument};

use super::arrow::records_to_batch;
use crate::record::PlayerRecord;

fn tmp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "table.parquet".to_string());
    path.with_file_name(format!(".{}.tmp", name))
}

/// Write `records` as one Parquet file at `path`, replacing whatever is there.
///
/// The table is built fully before anything touches disk, so a record set that
/// does not fit the first record's columns leaves `path` untouched. Returns the
/// number of rows written.
#[instrument(level = "info", skip(records, path), fields(file = %path.as_ref().display(), records = records.len()))]
pub fn write_records<P: AsRef<Path>>(records: &[PlayerRecord], path: P) -> Result<usize> {
    let path = path.as_ref();
    let batch = records_to_batch(records)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }

    // write next to the target and rename over it
    let tmp = tmp_path_for(path);
    let written = (|| -> Result<()> {
        let file =
            File::create(&tmp).with_context(|| format!("creating {}", tmp.display()))?;
        let props = WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .build();
        let mut writer = ArrowWriter::try_new(BufWriter::new(file), batch.schema(), Some(props))
            .context("creating Parquet writer")?;
        writer.write(&batch).context("writing record batch")?;
        writer.close().context("closing Parquet writer")?;
        fs::rename(&tmp, path)
            .with_context(|| format!("renaming {} -> {}", tmp.display(), path.display()))?;
        Ok(())
    })();

    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }

    debug!(columns = batch.num_columns(), "schema inferred");
    info!(rows = batch.num_rows(), "wrote table");
    Ok(batch.num_rows())
}
