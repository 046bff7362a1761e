// Shot-recovery attribution: which shots followed a ball recovery by the
// shooter, per-player shot metrics, and their z-scores.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use crate::event::Event;
use crate::timeline::TimedEvent;
use crate::zscore::{zscore_column, ZScoreTable};

// ---------------------------------------------------------------------------
// Shot classification
// ---------------------------------------------------------------------------

/// A shot with its recovery attribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShotRecord {
    pub event: Event,
    pub event_time: u32,
    /// The shooter recovered the ball at some earlier point in the match.
    pub after_recovery: bool,
    /// Seconds between that recovery and the shot. Negative when the clock
    /// runs backwards across a period boundary (stoppage time).
    pub time_since_recovery: Option<i64>,
}

/// Pick the shots out of a normalized timeline and attribute recoveries.
pub fn classify_shots(timeline: &[TimedEvent]) -> Vec<ShotRecord> {
    timeline
        .iter()
        .filter(|t| t.event.is_shot())
        .map(|t| ShotRecord {
            event: t.event.clone(),
            event_time: t.event_time,
            after_recovery: t.last_recovery_time.is_some(),
            time_since_recovery: t
                .last_recovery_time
                .map(|r| i64::from(t.event_time) - i64::from(r)),
        })
        .collect()
}

/// Row of the "shots following a recovery" view for one player.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecoveryShot {
    pub minute: u32,
    pub second: u32,
    pub time_since_recovery: i64,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub outcome_name: Option<String>,
}

/// Every shot `player` took for `team`, in timeline order.
pub fn player_shots(timeline: &[TimedEvent], player: &str, team: &str) -> Vec<Event> {
    timeline
        .iter()
        .map(|t| &t.event)
        .filter(|e| e.is_shot() && e.is_by(player) && e.team_name == team)
        .cloned()
        .collect()
}

/// The player's shots that followed one of their recoveries, in match order.
pub fn shots_after_recovery(shots: &[ShotRecord], player: &str) -> Vec<RecoveryShot> {
    shots
        .iter()
        .filter(|s| s.event.is_by(player))
        .filter_map(|s| {
            Some(RecoveryShot {
                minute: s.event.minute,
                second: s.event.second,
                time_since_recovery: s.time_since_recovery?,
                x: s.event.x,
                y: s.event.y,
                outcome_name: s.event.outcome_name.clone(),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Per-player metrics
// ---------------------------------------------------------------------------

/// The six shot metrics that get standardized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotMetric {
    TotalShots,
    Goals,
    ShotsAfterRecovery,
    PctShotsAfterRecovery,
    AvgTimeAfterRecovery,
    TotalXg,
}

impl ShotMetric {
    pub const ALL: [ShotMetric; 6] = [
        ShotMetric::TotalShots,
        ShotMetric::Goals,
        ShotMetric::ShotsAfterRecovery,
        ShotMetric::PctShotsAfterRecovery,
        ShotMetric::AvgTimeAfterRecovery,
        ShotMetric::TotalXg,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ShotMetric::TotalShots => "total_shots",
            ShotMetric::Goals => "goals",
            ShotMetric::ShotsAfterRecovery => "shots_after_recovery",
            ShotMetric::PctShotsAfterRecovery => "pct_shots_after_recovery",
            ShotMetric::AvgTimeAfterRecovery => "avg_time_after_recovery",
            ShotMetric::TotalXg => "total_xg",
        }
    }

    /// Raw value for one player; `None` only for an undefined average.
    pub fn value(&self, m: &PlayerMetrics) -> Option<f64> {
        match self {
            ShotMetric::TotalShots => Some(m.total_shots as f64),
            ShotMetric::Goals => Some(m.goals as f64),
            ShotMetric::ShotsAfterRecovery => Some(m.shots_after_recovery as f64),
            ShotMetric::PctShotsAfterRecovery => Some(m.pct_shots_after_recovery),
            ShotMetric::AvgTimeAfterRecovery => m.avg_time_after_recovery,
            ShotMetric::TotalXg => Some(m.total_xg),
        }
    }
}

impl fmt::Display for ShotMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShotMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShotMetric::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| format!("unknown shot metric `{s}`"))
    }
}

/// Shot metrics for one player who took at least one shot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerMetrics {
    pub player_name: String,
    pub total_shots: u32,
    pub goals: u32,
    pub shots_after_recovery: u32,
    /// Mean seconds from recovery to shot; `None` when no shot followed a
    /// recovery.
    pub avg_time_after_recovery: Option<f64>,
    /// Missing xG counts as 0.
    pub total_xg: f64,
    pub pct_shots_after_recovery: f64,
}

#[derive(Default)]
struct Accumulator {
    shots: u32,
    goals: u32,
    after_recovery: u32,
    recovery_seconds: i64,
    xg: f64,
}

/// Aggregate shots per player, ordered by player name.
///
/// Shots without a player are dropped. Only players with at least one shot
/// get a row, so `total_shots` is never zero.
pub fn aggregate_player_metrics(shots: &[ShotRecord]) -> Vec<PlayerMetrics> {
    let mut by_player: BTreeMap<&str, Accumulator> = BTreeMap::new();
    for shot in shots {
        let Some(player) = shot.event.player_name.as_deref() else {
            debug!("shot {} has no player, skipping", shot.event.id);
            continue;
        };
        let acc = by_player.entry(player).or_default();
        acc.shots += 1;
        if shot.event.is_goal() {
            acc.goals += 1;
        }
        if let Some(secs) = shot.time_since_recovery {
            acc.after_recovery += 1;
            acc.recovery_seconds += secs;
        }
        acc.xg += shot.event.shot_xg.unwrap_or(0.0);
    }

    by_player
        .into_iter()
        .map(|(player, acc)| PlayerMetrics {
            player_name: player.to_string(),
            total_shots: acc.shots,
            goals: acc.goals,
            shots_after_recovery: acc.after_recovery,
            avg_time_after_recovery: (acc.after_recovery > 0)
                .then(|| acc.recovery_seconds as f64 / acc.after_recovery as f64),
            total_xg: acc.xg,
            pct_shots_after_recovery: acc.after_recovery as f64 / acc.shots as f64,
        })
        .collect()
}

/// Standardize each of the six shot metrics across all rows.
pub fn shot_zscores(metrics: &[PlayerMetrics]) -> ZScoreTable {
    let players = metrics.iter().map(|m| m.player_name.clone()).collect();
    let columns = ShotMetric::ALL
        .iter()
        .map(|metric| {
            let raw: Vec<Option<f64>> = metrics.iter().map(|m| metric.value(m)).collect();
            (metric.name(), zscore_column(&raw))
        })
        .collect();
    ZScoreTable::from_columns(players, columns)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
