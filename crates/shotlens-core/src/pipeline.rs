// End-to-end analysis of one match for one focus team: raw events in,
// every table the report prints out.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::attribution::{
    aggregate_player_metrics, classify_shots, player_shots, shot_zscores, shots_after_recovery,
    PlayerMetrics, RecoveryShot, ShotMetric,
};
use crate::comparison::{compare, ComparisonView};
use crate::error::AnalysisError;
use crate::event::Event;
use crate::lineup::{player_info, player_options, team_lineup, LineupEntry, PlayerLabels};
use crate::shot_map::{build_shot_map, ShotMap};
use crate::source::{MatchDataSource, MatchInfo};
use crate::squad::{build_squad_stats, squad_zscores, SquadMetric, SquadStats};
use crate::timeline::normalize;
use crate::zscore::ZScoreTable;

/// What the user selected.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub match_id: u64,
    pub team: String,
    /// Focus player, by label or full name.
    pub player: Option<String>,
    /// Players to compare, by label or full name.
    pub compare: Vec<String>,
    pub shot_metrics: Vec<ShotMetric>,
    pub squad_metrics: Vec<SquadMetric>,
}

impl AnalysisRequest {
    pub fn new(match_id: u64, team: impl Into<String>) -> Self {
        AnalysisRequest {
            match_id,
            team: team.into(),
            player: None,
            compare: Vec::new(),
            shot_metrics: ShotMetric::ALL.to_vec(),
            squad_metrics: SquadMetric::DEFAULT_SELECTION.to_vec(),
        }
    }
}

/// Single-player views.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerFocus {
    pub info: LineupEntry,
    /// The player's shots for the focus team, in match order.
    pub shots: Vec<Event>,
    pub shots_after_recovery: Vec<RecoveryShot>,
    pub shot_map: ShotMap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchAnalysis {
    pub match_info: MatchInfo,
    pub team: String,
    pub player_options: Vec<String>,
    /// Display labels of everyone in the lineup, sorted, for picking
    /// players to compare.
    pub comparison_options: Vec<String>,
    pub player: Option<PlayerFocus>,
    /// Shot metrics for every shooter in the match, both teams.
    pub player_metrics: Vec<PlayerMetrics>,
    pub shot_zscores: ZScoreTable,
    pub squad_stats: Vec<SquadStats>,
    pub squad_zscores: ZScoreTable,
    /// `None` when nothing was selected for comparison.
    pub shot_comparison: Option<ComparisonView>,
    pub squad_comparison: Option<ComparisonView>,
}

/// Run the whole pipeline for one request.
///
/// Missing matches, teams and players surface as `MissingInput`. An empty
/// comparison selection is not an error here; the comparison is `None`.
pub fn analyze(
    source: &dyn MatchDataSource,
    request: &AnalysisRequest,
) -> Result<MatchAnalysis, AnalysisError> {
    let match_info = source
        .matches()?
        .into_iter()
        .find(|m| m.match_id == request.match_id)
        .ok_or_else(|| AnalysisError::missing("match", request.match_id.to_string()))?;
    info!("analyzing {} (match {})", match_info.display_label(), match_info.match_id);

    let events = source.events(request.match_id)?;
    let lineup = source.lineup(request.match_id)?;
    debug!("loaded {} events, {} lineup entries", events.len(), lineup.len());

    let squad = team_lineup(&lineup, &request.team);
    if squad.is_empty() && !match_info.involves(&request.team) {
        return Err(AnalysisError::missing("team", request.team.as_str()));
    }

    // ---- Timeline, attribution, shot metrics ----
    let timeline = normalize(events);
    let shots = classify_shots(&timeline);
    let player_metrics = aggregate_player_metrics(&shots);
    let shot_zscores = shot_zscores(&player_metrics);
    info!(
        "{} shots, {} after a recovery, {} shooters",
        shots.len(),
        shots.iter().filter(|s| s.after_recovery).count(),
        player_metrics.len()
    );

    // ---- Squad-wide stats ----
    let sorted_events: Vec<Event> = timeline.iter().map(|t| t.event.clone()).collect();
    let squad_stats = build_squad_stats(&sorted_events, &request.team);
    let squad_zscores = squad_zscores(&squad_stats);

    // ---- Focus player ----
    let player = match &request.player {
        Some(label) => {
            let name = PlayerLabels::new(&squad).resolve(label)?.to_string();
            let info = player_info(&squad, &name)?.clone();
            let player_shots = player_shots(&timeline, &name, &request.team);
            if player_shots.is_empty() {
                info!("no shots found for {}", name);
            }
            Some(PlayerFocus {
                info,
                shots: player_shots,
                shots_after_recovery: shots_after_recovery(&shots, &name),
                shot_map: build_shot_map(&shots, &timeline, &name),
            })
        }
        None => None,
    };

    // ---- Comparisons ----
    let labels = PlayerLabels::new(&lineup);
    let selected = labels.resolve_all(&request.compare)?;
    let shot_metric_names: Vec<&str> = request.shot_metrics.iter().map(ShotMetric::name).collect();
    let squad_metric_names: Vec<&str> = request.squad_metrics.iter().map(SquadMetric::name).collect();
    let shot_comparison = comparison_view(&shot_zscores, &selected, &shot_metric_names, "shot")?;
    let squad_comparison = comparison_view(&squad_zscores, &selected, &squad_metric_names, "squad")?;

    Ok(MatchAnalysis {
        match_info,
        team: request.team.clone(),
        player_options: player_options(&squad),
        comparison_options: labels.labels().map(str::to_string).collect(),
        player,
        player_metrics,
        shot_zscores,
        squad_stats,
        squad_zscores,
        shot_comparison,
        squad_comparison,
    })
}

/// Compare the selected players that appear in `table`; players absent from
/// it (no shots, or not in the squad) are left out.
fn comparison_view(
    table: &ZScoreTable,
    selected: &[String],
    metrics: &[&str],
    kind: &str,
) -> Result<Option<ComparisonView>, AnalysisError> {
    let present: Vec<&str> = selected
        .iter()
        .map(String::as_str)
        .filter(|name| {
            let found = table.row(name).is_some();
            if !found {
                warn!("{} is not in the {} table, leaving out of comparison", name, kind);
            }
            found
        })
        .collect();

    match compare(table, present.as_slice(), metrics) {
        Ok(comparison) => Ok(Some(ComparisonView::new(comparison))),
        Err(AnalysisError::EmptySelection { what }) => {
            debug!("{} comparison skipped: no {} selected", kind, what);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
