pub mod arrow;
pub mod merge;
pub mod write;

pub use arrow::{build_schema, infer_data_type, records_to_batch};
pub use merge::{list_table_files, merge_dir, read_parquet, MergedTable};
pub use write::write_records;
