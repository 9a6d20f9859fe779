// src/bin/merge_weeks.rs

use anyhow::Result;
use fplscraper::{
    config::Config,
    table::{merge::PREVIEW_ROWS, merge_dir},
};
use std::{env, path::PathBuf};
use tracing::info;

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    // usage: merge_weeks [WEEKS_DIR]
    let dir = match env::args().nth(1) {
        Some(d) => PathBuf::from(d),
        None => Config::load()?.output.weeks_dir,
    };
    info!(dir = %dir.display(), "merging");

    let merged = merge_dir(&dir)?;
    for f in &merged.files {
        info!(file = %f.display(), "included");
    }
    println!("▶ Merged table has {} rows", merged.num_rows());
    println!("{}", merged.preview(PREVIEW_ROWS)?);
    Ok(())
}
