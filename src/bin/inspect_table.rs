use anyhow::{Context, Result};
use fplscraper::table::{merge::PREVIEW_ROWS, read_parquet};
use parquet::file::reader::{FileReader, SerializedFileReader};
use std::{env, fs::File, path::Path, process::exit};

fn main() {
    // Expect exactly one CLI argument: path to a Parquet file.
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <PARQUET_FILE>", args[0]);
        exit(1);
    }
    if let Err(e) = inspect(Path::new(&args[1])) {
        eprintln!("Error: {:#}", e);
        exit(1);
    }
}

/// Print file metadata, the Arrow columns and the first rows.
fn inspect(path: &Path) -> Result<()> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = SerializedFileReader::new(file)?;
    let meta = reader.metadata();
    let file_meta = meta.file_metadata();

    println!("=== {} ===", path.display());
    println!("Created by:     {}", file_meta.created_by().unwrap_or("<unknown>"));
    println!("Total rows:     {}", file_meta.num_rows());
    println!("Row groups:     {}", meta.num_row_groups());
    println!();

    let batch = read_parquet(path)?;
    println!("=== Columns ===");
    for field in batch.schema().fields() {
        println!("- {:<30} | {}", field.name(), field.data_type());
    }
    println!();

    let head = batch.slice(0, PREVIEW_ROWS.min(batch.num_rows()));
    println!("=== First rows ===");
    println!("{}", arrow::util::pretty::pretty_format_batches(&[head])?);
    Ok(())
}
