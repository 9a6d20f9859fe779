// src/flow.rs

use anyhow::Result;
use tracing::{error, info, instrument, warn};

use crate::config::{Config, OutputConfig};
use crate::fetch::{fetch_bootstrap, JsonSource};
use crate::lookup::{find_player, render_not_found, render_player_summary};
use crate::record::{BootstrapStatic, PlayerRecord};
use crate::table::write_records;
use crate::weeks::{aggregate_weeks, RunSummary};

/// Player shown when the binary gets no name.
pub const DEFAULT_PLAYER: &str = "M.Salah";

/// Result of the season-wide "show player" pass.
#[derive(Debug, Clone)]
pub struct ShowOutcome {
    /// User-facing line: the player summary, "not found", or why there is no data.
    pub message: String,
    pub player: Option<PlayerRecord>,
    pub season_rows: Option<usize>,
    pub bootstrap: Option<BootstrapStatic>,
}

/// Fetch the season data, save it to the season file and look up `name`.
///
/// Never fails: every problem ends up in `message` and the log.
#[instrument(level = "info", skip(source, output))]
pub async fn show_player<S: JsonSource>(source: &S, name: &str, output: &OutputConfig) -> ShowOutcome {
    let boot = match fetch_bootstrap(source).await {
        Ok(boot) => boot,
        Err(e) => {
            error!("failed to fetch season data: {}", e);
            return ShowOutcome {
                message: format!("no player data available: {}", e),
                player: None,
                season_rows: None,
                bootstrap: None,
            };
        }
    };

    let season_rows = match write_records(&boot.elements, &output.season_file) {
        Ok(rows) => Some(rows),
        Err(e) => {
            error!(file = %output.season_file.display(), "season file not written: {:#}", e);
            None
        }
    };

    let (message, player) = match find_player(name, &boot.elements) {
        Ok(Some(player)) => match render_player_summary(player) {
            Ok(msg) => (msg, Some(player.clone())),
            Err(e) => {
                warn!("incomplete record for {}: {}", name, e);
                (
                    format!("player {} found but record is incomplete: {}", name, e),
                    Some(player.clone()),
                )
            }
        },
        Ok(None) => (render_not_found(name), None),
        Err(e) => {
            error!("malformed player data: {}", e);
            (format!("could not search player data: {}", e), None)
        }
    };

    info!("{}", message);
    ShowOutcome {
        message,
        player,
        season_rows,
        bootstrap: Some(boot),
    }
}

/// Configured week count, else the number of finished gameweeks.
pub fn resolve_week_count(configured: Option<u32>, boot: Option<&BootstrapStatic>) -> u32 {
    if let Some(n) = configured {
        return n;
    }
    match boot.map(BootstrapStatic::finished_weeks) {
        Some(Ok(n)) => n,
        Some(Err(e)) => {
            warn!("cannot count finished gameweeks: {}", e);
            0
        }
        None => {
            warn!("no season data; skipping gameweeks");
            0
        }
    }
}

/// Show the player, hand the message to `report`, then collect and merge the
/// gameweeks. `report` runs before any gameweek work, so the message reaches
/// the user even when the merge fails.
pub async fn run<S: JsonSource>(
    source: &S,
    name: &str,
    cfg: &Config,
    report: impl FnOnce(&str),
) -> Result<(ShowOutcome, RunSummary)> {
    let outcome = show_player(source, name, &cfg.output).await;
    report(&outcome.message);

    let weeks = resolve_week_count(cfg.weeks, outcome.bootstrap.as_ref());
    info!(weeks, mode = ?cfg.mode, "collecting gameweeks");
    let summary = aggregate_weeks(source, weeks, cfg.mode, &cfg.output.weeks_dir).await?;
    Ok((outcome, summary))
}
