// Squad-wide per-player stats for one team, built over every event the team
// produced, and their per-column z-scores.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use crate::event::Event;
use crate::zscore::{zscore_column_distinct, ZScoreTable};

/// Squad stats columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SquadMetric {
    Shots,
    ShotsOnTarget,
    Xg,
    Passes,
    KeyPasses,
}

impl SquadMetric {
    pub const ALL: [SquadMetric; 5] = [
        SquadMetric::Shots,
        SquadMetric::ShotsOnTarget,
        SquadMetric::Xg,
        SquadMetric::Passes,
        SquadMetric::KeyPasses,
    ];

    /// Metrics preselected for comparison.
    pub const DEFAULT_SELECTION: [SquadMetric; 3] =
        [SquadMetric::Shots, SquadMetric::Xg, SquadMetric::Passes];

    pub fn name(&self) -> &'static str {
        match self {
            SquadMetric::Shots => "shots",
            SquadMetric::ShotsOnTarget => "shots_on_target",
            SquadMetric::Xg => "xg",
            SquadMetric::Passes => "passes",
            SquadMetric::KeyPasses => "key_passes",
        }
    }

    pub fn value(&self, s: &SquadStats) -> f64 {
        match self {
            SquadMetric::Shots => s.shots as f64,
            SquadMetric::ShotsOnTarget => s.shots_on_target as f64,
            SquadMetric::Xg => s.xg,
            SquadMetric::Passes => s.passes as f64,
            SquadMetric::KeyPasses => s.key_passes as f64,
        }
    }
}

impl fmt::Display for SquadMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SquadMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SquadMetric::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| format!("unknown squad metric `{s}`"))
    }
}

/// Raw counts for one squad player. Players who never shot or passed still
/// get a row with zeros.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SquadStats {
    pub player_name: String,
    pub shots: u32,
    pub shots_on_target: u32,
    pub xg: f64,
    pub passes: u32,
    pub key_passes: u32,
}

/// Build one row per named player appearing in `team`'s events, ordered by
/// player name.
pub fn build_squad_stats(events: &[Event], team: &str) -> Vec<SquadStats> {
    let mut by_player: BTreeMap<&str, SquadStats> = BTreeMap::new();

    for event in events.iter().filter(|e| e.team_name == team) {
        let Some(player) = event.player_name.as_deref() else {
            continue;
        };
        let row = by_player.entry(player).or_insert_with(|| SquadStats {
            player_name: player.to_string(),
            ..SquadStats::default()
        });
        if event.is_shot() {
            row.shots += 1;
            if event.is_on_target() {
                row.shots_on_target += 1;
            }
            row.xg += event.shot_xg.unwrap_or(0.0);
        } else if event.is_pass() {
            row.passes += 1;
            if event.pass_shot_assist {
                row.key_passes += 1;
            }
        }
    }

    debug!("squad stats for {}: {} players", team, by_player.len());
    by_player.into_values().collect()
}

/// Standardize every squad column independently. Columns with fewer than two
/// distinct values come out flat at 0.
pub fn squad_zscores(stats: &[SquadStats]) -> ZScoreTable {
    let players = stats.iter().map(|s| s.player_name.clone()).collect();
    let columns = SquadMetric::ALL
        .iter()
        .map(|metric| {
            let raw: Vec<f64> = stats.iter().map(|s| metric.value(s)).collect();
            let z = zscore_column_distinct(&raw).into_iter().map(Some).collect();
            (metric.name(), z)
        })
        .collect();
    ZScoreTable::from_columns(players, columns)
}
