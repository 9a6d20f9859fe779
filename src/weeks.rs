// src/weeks.rs

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::{fs, path::Path};
use tracing::{error, info, instrument, warn};

use crate::config::AggregationMode;
use crate::fetch::{fetch_week, JsonSource};
use crate::table::{merge::PREVIEW_ROWS, merge_dir, write_records, MergedTable};

/// What one pass over the gameweeks did.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub attempted: Vec<u32>,
    pub written: Vec<u32>,
    pub skipped: Vec<u32>,
    pub merges: usize,
    pub merged_rows: Option<usize>,
}

impl RunSummary {
    fn new() -> Self {
        Self {
            started_at: Utc::now(),
            attempted: Vec::new(),
            written: Vec::new(),
            skipped: Vec::new(),
            merges: 0,
            merged_rows: None,
        }
    }
}

/// Gameweeks visited for a requested count of `n`.
///
/// `Legacy` keeps the exclusive upper bound, so `n = 3` visits only 1 and 2.
pub fn week_indices(n: u32, mode: AggregationMode) -> Vec<u32> {
    match mode {
        AggregationMode::Standard => (1..=n).collect(),
        AggregationMode::Legacy => (1..n).collect(),
    }
}

pub fn week_file_name(week: u32) -> String {
    format!("week_{}_data.parquet", week)
}

fn merge_and_report(weeks_dir: &Path, summary: &mut RunSummary) -> Result<MergedTable> {
    let merged = merge_dir(weeks_dir)?;
    summary.merges += 1;
    summary.merged_rows = Some(merged.num_rows());
    info!(rows = merged.num_rows(), "merged weeks");
    info!("preview:\n{}", merged.preview(PREVIEW_ROWS)?);
    Ok(merged)
}

/// Fetch each gameweek, persist it to `<weeks_dir>/week_{n}_data.parquet`,
/// and merge the directory.
///
/// A week that cannot be fetched or written is logged and skipped. Merge
/// failures abort the run.
#[instrument(level = "info", skip(source, weeks_dir), fields(dir = %weeks_dir.as_ref().display()))]
pub async fn aggregate_weeks<S: JsonSource>(
    source: &S,
    n: u32,
    mode: AggregationMode,
    weeks_dir: impl AsRef<Path>,
) -> Result<RunSummary> {
    let weeks_dir = weeks_dir.as_ref();
    fs::create_dir_all(weeks_dir)
        .with_context(|| format!("creating {}", weeks_dir.display()))?;

    let mut summary = RunSummary::new();
    for week in week_indices(n, mode) {
        summary.attempted.push(week);

        match fetch_week(source, week).await {
            Ok(snapshot) => {
                let path = weeks_dir.join(week_file_name(week));
                match write_records(&snapshot.elements, &path) {
                    Ok(rows) => {
                        info!(week, rows, file = %path.display(), "week saved");
                        summary.written.push(week);
                    }
                    Err(e) => {
                        error!(week, "could not save week: {:#}", e);
                        summary.skipped.push(week);
                    }
                }
            }
            Err(e) => {
                warn!(week, "no data this round: {}", e);
                summary.skipped.push(week);
            }
        }

        if mode == AggregationMode::Legacy {
            merge_and_report(weeks_dir, &mut summary)?;
        }
    }

    if mode == AggregationMode::Standard {
        merge_and_report(weeks_dir, &mut summary)?;
    }

    info!(
        written = summary.written.len(),
        skipped = summary.skipped.len(),
        merges = summary.merges,
        "weeks done"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{init_test_logging, MapSource};
    use serde_json::{json, Value};
    use tempfile::tempdir;

    fn live(rows: i64) -> Value {
        let elements: Vec<Value> = (0..rows)
            .map(|i| json!({ "id": i, "stats": { "minutes": 90, "total_points": i } }))
            .collect();
        json!({ "elements": elements })
    }

    #[test]
    fn legacy_range_excludes_upper_bound() {
        assert_eq!(week_indices(3, AggregationMode::Legacy), vec![1, 2]);
        assert_eq!(week_indices(3, AggregationMode::Standard), vec![1, 2, 3]);
        assert!(week_indices(0, AggregationMode::Standard).is_empty());
        assert!(week_indices(1, AggregationMode::Legacy).is_empty());
    }

    #[tokio::test]
    async fn legacy_mode_fetches_two_of_three_and_merges_each_week() -> Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        let source = MapSource::new(vec![
            ("event/1/live/", live(2)),
            ("event/2/live/", live(3)),
            ("event/3/live/", live(4)),
        ]);

        let summary = aggregate_weeks(&source, 3, AggregationMode::Legacy, dir.path()).await?;

        assert_eq!(
            source.requested(),
            vec!["event/1/live/".to_string(), "event/2/live/".to_string()]
        );
        assert_eq!(summary.written, vec![1, 2]);
        assert_eq!(summary.merges, 2);
        assert_eq!(summary.merged_rows, Some(5));
        assert!(dir.path().join("week_1_data.parquet").is_file());
        assert!(!dir.path().join("week_3_data.parquet").exists());
        Ok(())
    }

    #[tokio::test]
    async fn standard_mode_is_inclusive_and_merges_once() -> Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        let source = MapSource::new(vec![
            ("event/1/live/", live(2)),
            ("event/2/live/", live(3)),
            ("event/3/live/", live(4)),
        ]);

        let summary = aggregate_weeks(&source, 3, AggregationMode::Standard, dir.path()).await?;

        assert_eq!(summary.attempted, vec![1, 2, 3]);
        assert_eq!(summary.written, vec![1, 2, 3]);
        assert_eq!(summary.merges, 1);
        assert_eq!(summary.merged_rows, Some(9));
        Ok(())
    }

    #[tokio::test]
    async fn failed_weeks_are_skipped() -> Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        let source = MapSource::new(vec![
            ("event/1/live/", live(2)),
            // week 2 missing → 404
            (
                "event/3/live/",
                json!({ "elements": [ { "id": 1, "minutes": 3 }, { "id": 2 } ] }),
            ),
            ("event/4/live/", live(1)),
        ]);

        let summary = aggregate_weeks(&source, 4, AggregationMode::Standard, dir.path()).await?;

        assert_eq!(summary.written, vec![1, 4]);
        assert_eq!(summary.skipped, vec![2, 3]);
        assert_eq!(summary.merged_rows, Some(3));
        assert!(!dir.path().join("week_3_data.parquet").exists());
        Ok(())
    }

    #[tokio::test]
    async fn nothing_fetched_merges_to_zero_rows() -> Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        let source = MapSource::new(vec![]);
        let summary = aggregate_weeks(&source, 2, AggregationMode::Standard, dir.path()).await?;
        assert_eq!(summary.skipped, vec![1, 2]);
        assert_eq!(summary.merged_rows, Some(0));
        Ok(())
    }

    #[tokio::test]
    async fn stray_file_in_weeks_dir_aborts_the_run() -> Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        fs::write(dir.path().join("README"), "not a table")?;
        let source = MapSource::new(vec![("event/1/live/", live(2))]);
        assert!(aggregate_weeks(&source, 1, AggregationMode::Standard, dir.path())
            .await
            .is_err());
        Ok(())
    }

    #[tokio::test]
    async fn weeks_with_drifting_column_types_still_merge() -> Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        let source = MapSource::new(vec![
            (
                "event/1/live/",
                json!({ "elements": [ { "id": 1, "stats": { "minutes": 90, "xg": 1 } } ] }),
            ),
            (
                "event/2/live/",
                json!({ "elements": [ { "id": 2, "stats": { "minutes": 90, "xg": 0.5 } } ] }),
            ),
        ]);

        let summary = aggregate_weeks(&source, 2, AggregationMode::Standard, dir.path()).await?;

        assert_eq!(summary.written, vec![1, 2]);
        assert_eq!(summary.merged_rows, Some(2));
        Ok(())
    }
}
