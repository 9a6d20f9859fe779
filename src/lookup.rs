// src/lookup.rs

use tracing::debug;

use crate::error::RecordError;
use crate::record::PlayerRecord;

/// Field holding a player's display name.
pub const NAME_FIELD: &str = "web_name";

/// First record whose `web_name` equals `name` exactly (case-sensitive).
///
/// `Ok(None)` means the name is not in the collection. A record without a
/// string `web_name` ahead of the match is an error.
pub fn find_player<'a>(
    name: &str,
    players: &'a [PlayerRecord],
) -> Result<Option<&'a PlayerRecord>, RecordError> {
    debug!(name, candidates = players.len(), "find player");
    for player in players {
        if player.get_str(NAME_FIELD)? == name {
            return Ok(Some(player));
        }
    }
    Ok(None)
}

/// One-line summary of a player's name, points and cost.
pub fn render_player_summary(player: &PlayerRecord) -> Result<String, RecordError> {
    let name = player.get_str(NAME_FIELD)?;
    let points = player.get("total_points")?;
    let cost = player.get("now_cost")?;
    Ok(format!(
        "player is {}, and his total points are {}, and total cost is {}",
        name, points, cost
    ))
}

pub fn render_not_found(name: &str) -> String {
    format!("player {} not found", name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn players() -> Vec<PlayerRecord> {
        [
            json!({ "web_name": "Saka", "total_points": 150, "now_cost": 100 }),
            json!({ "web_name": "M.Salah", "total_points": 200, "now_cost": 130 }),
            json!({ "web_name": "Haaland", "total_points": 180, "now_cost": 145 }),
            json!({ "web_name": "M.Salah", "total_points": 1, "now_cost": 1 }),
        ]
        .into_iter()
        .map(|v| PlayerRecord::from_value(v).unwrap())
        .collect()
    }

    #[test]
    fn finds_first_exact_match() {
        let players = players();
        let found = find_player("M.Salah", &players).unwrap().unwrap();
        assert_eq!(found, &players[1]);
    }

    #[test]
    fn match_is_case_sensitive() {
        let players = players();
        assert!(find_player("m.salah", &players).unwrap().is_none());
        assert!(find_player("Salah", &players).unwrap().is_none());
    }

    #[test]
    fn empty_collection_is_not_found() {
        assert!(find_player("Saka", &[]).unwrap().is_none());
    }

    #[test]
    fn record_without_name_is_an_error() {
        let players = vec![PlayerRecord::from_value(json!({ "id": 1 })).unwrap()];
        assert_eq!(
            find_player("Saka", &players),
            Err(RecordError::MissingKey(NAME_FIELD.into()))
        );
    }

    #[test]
    fn summary_contains_points_and_cost() {
        let players = players();
        let msg = render_player_summary(&players[1]).unwrap();
        assert_eq!(
            msg,
            "player is M.Salah, and his total points are 200, and total cost is 130"
        );
    }

    #[test]
    fn summary_needs_points() {
        let p = PlayerRecord::from_value(json!({ "web_name": "Saka", "now_cost": 100 })).unwrap();
        assert_eq!(
            render_player_summary(&p),
            Err(RecordError::MissingKey("total_points".into()))
        );
    }
}
