// The data-access seam: whatever fetches matches, events and lineups from the
// event data provider implements `MatchDataSource`.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::event::Event;
use crate::lineup::LineupEntry;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("match {match_id} not found")]
    MatchNotFound { match_id: u64 },

    #[error("data source unavailable: {message}")]
    Unavailable { message: String },
}

/// One row of the match catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchInfo {
    pub match_id: u64,
    pub match_date: NaiveDate,
    pub competition_name: String,
    pub competition_stage: String,
    pub season_name: String,
    pub home_team: String,
    pub away_team: String,
}

impl MatchInfo {
    /// `"<competition> - <stage>"`, e.g. "FIFA World Cup - Final".
    pub fn display_label(&self) -> String {
        format!("{} - {}", self.competition_name, self.competition_stage)
    }

    pub fn involves(&self, team: &str) -> bool {
        self.home_team == team || self.away_team == team
    }
}

/// Matches played at `stage`, in catalogue order.
pub fn select_matches<'a>(matches: &'a [MatchInfo], stage: &str) -> Vec<&'a MatchInfo> {
    matches
        .iter()
        .filter(|m| m.competition_stage == stage)
        .collect()
}

/// Read-only snapshot access to one competition's data. Every call for a
/// given match id must return the same data.
pub trait MatchDataSource {
    fn matches(&self) -> Result<Vec<MatchInfo>, SourceError>;

    fn events(&self, match_id: u64) -> Result<Vec<Event>, SourceError>;

    fn lineup(&self, match_id: u64) -> Result<Vec<LineupEntry>, SourceError>;
}

/// A source backed by data already in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    pub matches: Vec<MatchInfo>,
    pub events: HashMap<u64, Vec<Event>>,
    pub lineups: HashMap<u64, Vec<LineupEntry>>,
}

impl InMemorySource {
    pub fn with_match(
        mut self,
        info: MatchInfo,
        events: Vec<Event>,
        lineup: Vec<LineupEntry>,
    ) -> Self {
        self.events.insert(info.match_id, events);
        self.lineups.insert(info.match_id, lineup);
        self.matches.push(info);
        self
    }
}

impl MatchDataSource for InMemorySource {
    fn matches(&self) -> Result<Vec<MatchInfo>, SourceError> {
        Ok(self.matches.clone())
    }

    fn events(&self, match_id: u64) -> Result<Vec<Event>, SourceError> {
        self.events
            .get(&match_id)
            .cloned()
            .ok_or(SourceError::MatchNotFound { match_id })
    }

    fn lineup(&self, match_id: u64) -> Result<Vec<LineupEntry>, SourceError> {
        self.lineups
            .get(&match_id)
            .cloned()
            .ok_or(SourceError::MatchNotFound { match_id })
    }
}
