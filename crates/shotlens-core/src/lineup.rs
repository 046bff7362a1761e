// Lineups: who played for whom, and the display labels used to pick players.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::AnalysisError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineupEntry {
    pub player_id: u64,
    pub player_name: String,
    pub player_nickname: Option<String>,
    pub team_name: String,
    pub jersey_number: Option<u32>,
}

impl LineupEntry {
    /// Nickname when the provider has one, full name otherwise.
    pub fn label(&self) -> &str {
        self.player_nickname
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.player_name)
    }
}

/// Entries for one team.
pub fn team_lineup(lineup: &[LineupEntry], team: &str) -> Vec<LineupEntry> {
    lineup
        .iter()
        .filter(|e| e.team_name == team)
        .cloned()
        .collect()
}

/// Sorted, de-duplicated player names offered for selection.
pub fn player_options(lineup: &[LineupEntry]) -> Vec<String> {
    let mut names: Vec<String> = lineup
        .iter()
        .filter(|e| !e.player_name.is_empty())
        .map(|e| e.player_name.clone())
        .collect();
    names.sort();
    names.dedup();
    names
}

/// Lineup entry for a player, by full name.
pub fn player_info<'a>(
    lineup: &'a [LineupEntry],
    player: &str,
) -> Result<&'a LineupEntry, AnalysisError> {
    lineup
        .iter()
        .find(|e| e.player_name == player)
        .ok_or_else(|| AnalysisError::missing("player", player))
}

/// Map from display label back to the provider's full player name.
#[derive(Debug, Clone, Default)]
pub struct PlayerLabels {
    by_label: BTreeMap<String, String>,
}

impl PlayerLabels {
    pub fn new(lineup: &[LineupEntry]) -> Self {
        let mut by_label = BTreeMap::new();
        for entry in lineup {
            let label = entry.label().to_string();
            if by_label.contains_key(&label) {
                warn!("duplicate player label '{}', using latest entry", label);
            }
            by_label.insert(label, entry.player_name.clone());
        }
        PlayerLabels { by_label }
    }

    /// Labels in sorted order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.by_label.keys().map(String::as_str)
    }

    /// Resolve a label to a player name. Full names resolve to themselves.
    pub fn resolve(&self, label: &str) -> Result<&str, AnalysisError> {
        if let Some(name) = self.by_label.get(label) {
            return Ok(name.as_str());
        }
        self.by_label
            .values()
            .find(|name| name.as_str() == label)
            .map(String::as_str)
            .ok_or_else(|| AnalysisError::missing("player label", label))
    }

    pub fn resolve_all<S: AsRef<str>>(&self, labels: &[S]) -> Result<Vec<String>, AnalysisError> {
        labels
            .iter()
            .map(|l| self.resolve(l.as_ref()).map(str::to_string))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u64, name: &str, nickname: Option<&str>, team: &str) -> LineupEntry {
        LineupEntry {
            player_id: id,
            player_name: name.into(),
            player_nickname: nickname.map(Into::into),
            team_name: team.into(),
            jersey_number: None,
        }
    }

    fn lineup() -> Vec<LineupEntry> {
        vec![
            entry(1, "Paul Pogba", None, "France"),
            entry(2, "Kylian Mbappe Lottin", Some("Kylian Mbappe"), "France"),
            entry(3, "Hugo Lloris", Some(""), "France"),
            entry(4, "Luka Modric", None, "Croatia"),
        ]
    }

    #[test]
    fn label_prefers_nickname() {
        let l = lineup();
        assert_eq!(l[0].label(), "Paul Pogba");
        assert_eq!(l[1].label(), "Kylian Mbappe");
        assert_eq!(l[2].label(), "Hugo Lloris");
    }

    #[test]
    fn options_are_sorted_per_team() {
        let france = team_lineup(&lineup(), "France");
        assert_eq!(
            player_options(&france),
            vec!["Hugo Lloris", "Kylian Mbappe Lottin", "Paul Pogba"]
        );
    }

    #[test]
    fn player_info_missing_is_reported() {
        let l = lineup();
        assert_eq!(player_info(&l, "Luka Modric").unwrap().player_id, 4);
        let err = player_info(&l, "Zinedine Zidane").unwrap_err();
        assert!(matches!(err, AnalysisError::MissingInput { what: "player", .. }));
    }

    #[test]
    fn labels_resolve_to_names() {
        let labels = PlayerLabels::new(&lineup());
        assert_eq!(labels.resolve("Kylian Mbappe").unwrap(), "Kylian Mbappe Lottin");
        assert_eq!(labels.resolve("Kylian Mbappe Lottin").unwrap(), "Kylian Mbappe Lottin");
        assert!(labels.resolve("Nobody").is_err());
        assert_eq!(
            labels.resolve_all(&["Paul Pogba", "Kylian Mbappe"]).unwrap(),
            vec!["Paul Pogba".to_string(), "Kylian Mbappe Lottin".to_string()]
        );
        let sorted: Vec<&str> = labels.labels().collect();
        assert_eq!(sorted, vec!["Hugo Lloris", "Kylian Mbappe", "Luka Modric", "Paul Pogba"]);
    }
}
