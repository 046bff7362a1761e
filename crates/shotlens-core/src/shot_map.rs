// Shot map markers for one player, positioned on a 120 x 80 pitch.

use serde::Serialize;

use crate::attribution::ShotRecord;
use crate::timeline::TimedEvent;

pub const PITCH_LENGTH: f64 = 120.0;
pub const PITCH_WIDTH: f64 = 80.0;

const FADED_ALPHA: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerColor {
    /// Shot that followed the shooter's own recovery (gold).
    Highlight,
    /// First team in the match (red).
    Home,
    /// Second team (blue).
    Away,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShotMarker {
    pub x: f64,
    pub y: f64,
    pub color: MarkerColor,
    pub alpha: f64,
    /// Set on goals by the first team.
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShotMap {
    pub player_name: String,
    pub markers: Vec<ShotMarker>,
}

/// The first two distinct team names in timeline order.
pub fn match_teams(timeline: &[TimedEvent]) -> Vec<&str> {
    let mut teams: Vec<&str> = Vec::with_capacity(2);
    for t in timeline {
        let team = t.event.team_name.as_str();
        if !team.is_empty() && !teams.contains(&team) {
            teams.push(team);
            if teams.len() == 2 {
                break;
            }
        }
    }
    teams
}

/// Markers for `player`'s shots. The first team attacks left to right; the
/// other team's shots are mirrored through the pitch centre. Shots without a
/// location are skipped.
pub fn build_shot_map(shots: &[ShotRecord], timeline: &[TimedEvent], player: &str) -> ShotMap {
    let home = match_teams(timeline).first().map(|t| t.to_string());

    let markers = shots
        .iter()
        .filter(|s| s.event.is_by(player))
        .filter_map(|s| {
            let (x, y) = s.event.location()?;
            let is_home = home.as_deref() == Some(s.event.team_name.as_str());
            let color = if s.after_recovery {
                MarkerColor::Highlight
            } else if is_home {
                MarkerColor::Home
            } else {
                MarkerColor::Away
            };
            let marker = if is_home {
                let goal = s.event.is_goal();
                ShotMarker {
                    x,
                    y,
                    color,
                    alpha: if goal { 1.0 } else { FADED_ALPHA },
                    label: goal.then(|| player.to_string()),
                }
            } else {
                ShotMarker {
                    x: PITCH_LENGTH - x,
                    y: PITCH_WIDTH - y,
                    color,
                    alpha: FADED_ALPHA,
                    label: None,
                }
            };
            Some(marker)
        })
        .collect();

    ShotMap {
        player_name: player.to_string(),
        markers,
    }
}
