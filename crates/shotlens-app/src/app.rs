// Resolves the configured selection against a data source and runs the
// analysis pipeline.

use shotlens_core::pipeline::{analyze, AnalysisRequest, MatchAnalysis};
use shotlens_core::source::{select_matches, MatchDataSource, MatchInfo};
use shotlens_core::AnalysisError;
use tracing::info;

use crate::config::{Config, SelectionConfig};

/// Matches of the configured competition at the configured stage that the
/// focus team played, in catalogue order.
pub fn candidate_matches(
    source: &dyn MatchDataSource,
    selection: &SelectionConfig,
) -> Result<Vec<MatchInfo>, AnalysisError> {
    let matches = source.matches()?;
    Ok(select_matches(&matches, &selection.competition_stage)
        .into_iter()
        .filter(|m| m.competition_name == selection.competition_name)
        .filter(|m| m.involves(&selection.team))
        .cloned()
        .collect())
}

/// The pinned match id, or else the first candidate match.
pub fn select_match(
    source: &dyn MatchDataSource,
    selection: &SelectionConfig,
) -> Result<u64, AnalysisError> {
    if let Some(id) = selection.match_id {
        return Ok(id);
    }
    candidate_matches(source, selection)?
        .first()
        .map(|m| m.match_id)
        .ok_or_else(|| AnalysisError::MissingInput {
            what: "match",
            name: format!(
                "{} - {} ({})",
                selection.competition_name, selection.competition_stage, selection.team
            ),
        })
}

pub fn build_request(config: &Config, match_id: u64) -> AnalysisRequest {
    AnalysisRequest {
        match_id,
        team: config.selection.team.clone(),
        player: config.selection.player.clone(),
        compare: config.comparison.players.clone(),
        shot_metrics: config.comparison.shot_metrics.clone(),
        squad_metrics: config.comparison.squad_metrics.clone(),
    }
}

/// Select the match and analyze it.
pub fn run(config: &Config, source: &dyn MatchDataSource) -> Result<MatchAnalysis, AnalysisError> {
    let match_id = select_match(source, &config.selection)?;
    info!("selected match {}", match_id);
    analyze(source, &build_request(config, match_id))
}
