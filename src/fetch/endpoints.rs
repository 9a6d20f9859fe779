// src/fetch/endpoints.rs

use tracing::info;

use super::JsonSource;
use crate::error::FetchError;
use crate::record::{BootstrapStatic, WeekSnapshot};

/// Season-wide players, teams and gameweeks.
pub const BOOTSTRAP_STATIC: &str = "bootstrap-static/";

/// Live per-player data for one gameweek.
pub fn event_live_path(week: u32) -> String {
    format!("event/{}/live/", week)
}

pub async fn fetch_bootstrap<S: JsonSource>(source: &S) -> Result<BootstrapStatic, FetchError> {
    let body = source.get_json(BOOTSTRAP_STATIC).await?;
    let boot = BootstrapStatic::from_value(&body).map_err(|e| FetchError::Payload {
        url: BOOTSTRAP_STATIC.to_string(),
        source: e,
    })?;
    info!(
        players = boot.elements.len(),
        events = boot.events.len(),
        "bootstrap loaded"
    );
    Ok(boot)
}

pub async fn fetch_week<S: JsonSource>(source: &S, week: u32) -> Result<WeekSnapshot, FetchError> {
    let path = event_live_path(week);
    let body = source.get_json(&path).await?;
    WeekSnapshot::from_value(week, &body).map_err(|e| FetchError::Payload {
        url: path,
        source: e,
    })
}
