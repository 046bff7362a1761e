// Flattened event data loading.
//
// Reads a directory laid out as:
//   matches.csv            one row per match
//   events/<match_id>.csv  one row per event, flattened provider columns
//   lineups/<match_id>.csv one row per player

use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;
use shotlens_core::event::Event;
use shotlens_core::lineup::LineupEntry;
use shotlens_core::source::{MatchDataSource, MatchInfo, SourceError};
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

impl From<DataError> for SourceError {
    fn from(e: DataError) -> Self {
        SourceError::Unavailable {
            message: e.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Raw CSV serde structs (private)
// ---------------------------------------------------------------------------

/// Event row as exported from the provider's flattened event frame. Extra
/// columns are ignored; empty cells become `None`.
#[derive(Debug, Deserialize)]
struct RawEvent {
    id: String,
    match_id: u64,
    period: u32,
    minute: u32,
    second: u32,
    type_name: String,
    player_name: Option<String>,
    #[serde(default)]
    team_name: String,
    x: Option<f64>,
    y: Option<f64>,
    outcome_name: Option<String>,
    #[serde(alias = "shot_xg")]
    shot_statsbomb_xg: Option<f64>,
    /// "True"/"False" as written by dataframe exports, or empty.
    #[serde(default)]
    pass_shot_assist: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawLineup {
    player_id: u64,
    player_name: String,
    #[serde(default)]
    player_nickname: Option<String>,
    team_name: String,
    #[serde(default)]
    jersey_number: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawMatch {
    match_id: u64,
    match_date: String,
    competition_name: String,
    #[serde(alias = "competition_stage")]
    competition_stage_name: String,
    #[serde(default)]
    season_name: String,
    #[serde(alias = "home_team")]
    home_team_name: String,
    #[serde(alias = "away_team")]
    away_team_name: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_flag(value: Option<&str>) -> bool {
    value.is_some_and(|v| {
        let v = v.trim();
        v.eq_ignore_ascii_case("true") || v == "1"
    })
}

// ---------------------------------------------------------------------------
// Reader-based loaders (private, enable testing without temp files)
// ---------------------------------------------------------------------------

fn load_events_from_reader<R: Read>(rdr: R) -> Result<Vec<Event>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut events = Vec::new();
    for result in reader.deserialize::<RawEvent>() {
        match result {
            Ok(raw) => {
                if raw.period == 0 {
                    warn!("skipping event '{}': period must start at 1", raw.id);
                    continue;
                }
                if raw.x.is_some_and(|v| !v.is_finite()) || raw.y.is_some_and(|v| !v.is_finite()) {
                    warn!("skipping event '{}': non-finite location", raw.id);
                    continue;
                }
                let shot_xg = raw.shot_statsbomb_xg.filter(|v| v.is_finite());
                events.push(Event {
                    id: raw.id.trim().to_string(),
                    match_id: raw.match_id,
                    period: raw.period,
                    minute: raw.minute,
                    second: raw.second,
                    type_name: raw.type_name.trim().to_string(),
                    player_name: non_empty(raw.player_name),
                    team_name: raw.team_name.trim().to_string(),
                    x: raw.x,
                    y: raw.y,
                    outcome_name: non_empty(raw.outcome_name),
                    shot_xg,
                    pass_shot_assist: parse_flag(raw.pass_shot_assist.as_deref()),
                });
            }
            Err(e) => {
                warn!("skipping malformed event row: {}", e);
            }
        }
    }
    Ok(events)
}

fn load_lineup_from_reader<R: Read>(rdr: R) -> Result<Vec<LineupEntry>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut lineup = Vec::new();
    for result in reader.deserialize::<RawLineup>() {
        match result {
            Ok(raw) => lineup.push(LineupEntry {
                player_id: raw.player_id,
                player_name: raw.player_name.trim().to_string(),
                player_nickname: non_empty(raw.player_nickname),
                team_name: raw.team_name.trim().to_string(),
                jersey_number: raw.jersey_number,
            }),
            Err(e) => {
                warn!("skipping malformed lineup row: {}", e);
            }
        }
    }
    Ok(lineup)
}

fn load_matches_from_reader<R: Read>(rdr: R) -> Result<Vec<MatchInfo>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut matches = Vec::new();
    for result in reader.deserialize::<RawMatch>() {
        match result {
            Ok(raw) => {
                let match_date = match NaiveDate::parse_from_str(raw.match_date.trim(), "%Y-%m-%d") {
                    Ok(d) => d,
                    Err(e) => {
                        warn!("skipping match {}: bad match_date '{}': {}", raw.match_id, raw.match_date, e);
                        continue;
                    }
                };
                matches.push(MatchInfo {
                    match_id: raw.match_id,
                    match_date,
                    competition_name: raw.competition_name.trim().to_string(),
                    competition_stage: raw.competition_stage_name.trim().to_string(),
                    season_name: raw.season_name.trim().to_string(),
                    home_team: raw.home_team_name.trim().to_string(),
                    away_team: raw.away_team_name.trim().to_string(),
                });
            }
            Err(e) => {
                warn!("skipping malformed match row: {}", e);
            }
        }
    }
    Ok(matches)
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

fn open(path: &Path) -> Result<std::fs::File, DataError> {
    std::fs::File::open(path).map_err(|e| DataError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

fn csv_error(path: &Path) -> impl FnOnce(csv::Error) -> DataError + '_ {
    move |e| DataError::Csv {
        path: path.display().to_string(),
        source: e,
    }
}

/// Load every event of one match from a CSV file.
pub fn load_events(path: &Path) -> Result<Vec<Event>, DataError> {
    let events = load_events_from_reader(open(path)?).map_err(csv_error(path))?;
    if events.is_empty() {
        return Err(DataError::Validation(format!(
            "{} produced zero valid events",
            path.display()
        )));
    }
    Ok(events)
}

/// Load one match's lineup from a CSV file.
pub fn load_lineup(path: &Path) -> Result<Vec<LineupEntry>, DataError> {
    load_lineup_from_reader(open(path)?).map_err(csv_error(path))
}

/// Load the match catalogue from a CSV file.
pub fn load_matches(path: &Path) -> Result<Vec<MatchInfo>, DataError> {
    load_matches_from_reader(open(path)?).map_err(csv_error(path))
}

// ---------------------------------------------------------------------------
// Directory-backed source
// ---------------------------------------------------------------------------

/// `MatchDataSource` over a directory of CSV exports. Files are re-read on
/// every call; nothing is cached.
#[derive(Debug, Clone)]
pub struct CsvDirSource {
    root: PathBuf,
}

impl CsvDirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        CsvDirSource { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn match_file(&self, dir: &str, match_id: u64) -> Result<PathBuf, SourceError> {
        let path = self.root.join(dir).join(format!("{match_id}.csv"));
        if !path.is_file() {
            debug!("no {} file at {}", dir, path.display());
            return Err(SourceError::MatchNotFound { match_id });
        }
        Ok(path)
    }
}

impl MatchDataSource for CsvDirSource {
    fn matches(&self) -> Result<Vec<MatchInfo>, SourceError> {
        Ok(load_matches(&self.root.join("matches.csv"))?)
    }

    fn events(&self, match_id: u64) -> Result<Vec<Event>, SourceError> {
        let path = self.match_file("events", match_id)?;
        let events = load_events(&path)?;
        if let Some(other) = events.iter().find(|e| e.match_id != match_id) {
            return Err(DataError::Validation(format!(
                "{} contains event '{}' from match {}",
                path.display(),
                other.id,
                other.match_id
            ))
            .into());
        }
        Ok(events)
    }

    fn lineup(&self, match_id: u64) -> Result<Vec<LineupEntry>, SourceError> {
        let path = self.match_file("lineups", match_id)?;
        Ok(load_lineup(&path)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    // -- Events --

    #[test]
    fn event_csv_roundtrip() {
        let csv_data = "\
id,index,match_id,period,minute,second,type_name,player_name,team_name,x,y,outcome_name,shot_statsbomb_xg,pass_shot_assist
a1,1,8658,1,0,0,Starting XI,,France,,,,,
a2,2,8658,1,5,10,Ball Recovery,Paul Pogba,France,40.0,30.5,,,
a3,3,8658,1,5,20,Pass,Paul Pogba,France,45.0,32.0,,,True
a4,4,8658,1,5,30,Shot,Antoine Griezmann,France,105.0,38.0,Saved,0.12,";

        let events = load_events_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(events.len(), 4);

        assert_eq!(events[0].player_name, None);
        assert_eq!(events[0].type_name, "Starting XI");
        assert_eq!(events[0].location(), None);

        assert_eq!(events[1].player_name.as_deref(), Some("Paul Pogba"));
        assert_eq!(events[1].location(), Some((40.0, 30.5)));
        assert!(!events[1].pass_shot_assist);

        assert!(events[2].pass_shot_assist);

        let shot = &events[3];
        assert!(shot.is_shot());
        assert_eq!(shot.outcome_name.as_deref(), Some("Saved"));
        assert!((shot.shot_xg.unwrap() - 0.12).abs() < f64::EPSILON);
        assert_eq!((shot.period, shot.minute, shot.second), (1, 5, 30));
    }

    #[test]
    fn event_csv_accepts_short_xg_header() {
        let csv_data = "\
id,match_id,period,minute,second,type_name,player_name,team_name,x,y,outcome_name,shot_xg
s1,1,2,60,0,Shot,A,T,100,40,Goal,0.5";
        let events = load_events_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(events[0].shot_xg, Some(0.5));
        assert!(!events[0].pass_shot_assist);
    }

    #[test]
    fn malformed_event_rows_are_skipped() {
        let csv_data = "\
id,match_id,period,minute,second,type_name,player_name,team_name,x,y,outcome_name,shot_statsbomb_xg
ok,1,1,1,0,Pass,A,T,,,,
bad,1,one,1,0,Pass,A,T,,,,
zero,1,0,1,0,Pass,A,T,,,,
ok2,1,1,2,0,Pass,B,T,,,,";
        let events = load_events_from_reader(csv_data.as_bytes()).unwrap();
        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["ok", "ok2"]);
    }

    #[test]
    fn flag_parsing() {
        assert!(parse_flag(Some("True")));
        assert!(parse_flag(Some("true")));
        assert!(parse_flag(Some("1")));
        assert!(!parse_flag(Some("False")));
        assert!(!parse_flag(Some("")));
        assert!(!parse_flag(None));
    }

    // -- Lineups and matches --

    #[test]
    fn lineup_csv_blank_nickname_is_none() {
        let csv_data = "\
player_id,player_name,player_nickname,team_name,jersey_number
3009,Paul Pogba,,France,6
3009,Kylian Mbappe Lottin,Kylian Mbappe,France,10";
        let lineup = load_lineup_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(lineup.len(), 2);
        assert_eq!(lineup[0].player_nickname, None);
        assert_eq!(lineup[0].jersey_number, Some(6));
        assert_eq!(lineup[1].label(), "Kylian Mbappe");
    }

    #[test]
    fn match_csv_parses_dates_and_skips_bad_ones() {
        let csv_data = "\
match_id,match_date,competition_name,competition_stage_name,season_name,home_team_name,away_team_name
8658,2018-07-15,FIFA World Cup,Final,2018,France,Croatia
8657,15/07/2018,FIFA World Cup,3rd Place Final,2018,Belgium,England";
        let matches = load_matches_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].match_date, NaiveDate::from_ymd_opt(2018, 7, 15).unwrap());
        assert_eq!(matches[0].display_label(), "FIFA World Cup - Final");
    }

    // -- Directory source --

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(dir.join("events")).unwrap();
        fs::create_dir_all(dir.join("lineups")).unwrap();
        dir
    }

    #[test]
    fn dir_source_missing_match_is_not_found() {
        let dir = scratch_dir("shotlens_data_missing_match");
        let source = CsvDirSource::new(&dir);
        assert!(matches!(
            source.events(42),
            Err(SourceError::MatchNotFound { match_id: 42 })
        ));
        assert!(matches!(
            source.lineup(42),
            Err(SourceError::MatchNotFound { match_id: 42 })
        ));
        // No catalogue at all.
        assert!(matches!(source.matches(), Err(SourceError::Unavailable { .. })));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn dir_source_rejects_foreign_events() {
        let dir = scratch_dir("shotlens_data_foreign_events");
        fs::write(
            dir.join("events/7.csv"),
            "id,match_id,period,minute,second,type_name,player_name,team_name,x,y,outcome_name,shot_statsbomb_xg\n\
             e1,8,1,0,0,Pass,A,T,,,,\n",
        )
        .unwrap();
        let source = CsvDirSource::new(&dir);
        assert!(matches!(source.events(7), Err(SourceError::Unavailable { .. })));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn dir_source_empty_events_file_is_unavailable() {
        let dir = scratch_dir("shotlens_data_empty_events");
        fs::write(
            dir.join("events/9.csv"),
            "id,match_id,period,minute,second,type_name,player_name,team_name,x,y,outcome_name,shot_statsbomb_xg\n",
        )
        .unwrap();
        let err = CsvDirSource::new(&dir).events(9).unwrap_err();
        assert!(err.to_string().contains("zero valid events"));
        let _ = fs::remove_dir_all(&dir);
    }
}
