// src/record/payload.rs

use serde_json::Value;

use super::player::{records_from_array, PlayerRecord};
use crate::error::RecordError;

/// Parsed `bootstrap-static/` response: the season's players and gameweeks.
#[derive(Debug, Clone, Default)]
pub struct BootstrapStatic {
    pub elements: Vec<PlayerRecord>,
    pub events: Vec<PlayerRecord>,
}

impl BootstrapStatic {
    pub fn from_value(payload: &Value) -> Result<Self, RecordError> {
        let elements = records_from_array(payload, "elements")?;
        // events are only needed to size the week loop; tolerate their absence
        let events = match records_from_array(payload, "events") {
            Ok(events) => events,
            Err(RecordError::MissingKey(_)) => Vec::new(),
            Err(e) => return Err(e),
        };
        Ok(Self { elements, events })
    }

    /// Number of gameweeks marked `finished`.
    pub fn finished_weeks(&self) -> Result<u32, RecordError> {
        let mut n = 0;
        for event in &self.events {
            if event.get_bool("finished")? {
                n += 1;
            }
        }
        Ok(n)
    }
}

/// Parsed `event/{week}/live/` response.
#[derive(Debug, Clone)]
pub struct WeekSnapshot {
    pub week: u32,
    pub elements: Vec<PlayerRecord>,
}

impl WeekSnapshot {
    pub fn from_value(week: u32, payload: &Value) -> Result<Self, RecordError> {
        Ok(Self {
            week,
            elements: records_from_array(payload, "elements")?,
        })
    }
}
