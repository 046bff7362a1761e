// Command-line arguments. Flags override the config file.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{parse_metrics, Config, ConfigError, ReportFormat};

#[derive(Debug, Clone, Parser)]
#[command(author, version, about = "Shot and ball recovery analysis for one match", long_about = None)]
pub struct Args {
    /// Directory holding config/ and defaults/
    #[arg(long, default_value = ".")]
    pub base_dir: PathBuf,

    /// Directory with matches.csv, events/ and lineups/
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    #[arg(long)]
    pub match_id: Option<u64>,

    /// Focus team
    #[arg(long)]
    pub team: Option<String>,

    /// Focus player, by label or full name
    #[arg(long)]
    pub player: Option<String>,

    /// Players to compare
    #[arg(long = "compare", num_args = 1..)]
    pub compare: Vec<String>,

    /// Squad metrics to compare
    #[arg(long = "metrics", num_args = 1..)]
    pub metrics: Vec<String>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// List the matches at the configured stage and exit
    #[arg(long)]
    pub list_matches: bool,
}

impl Args {
    /// Overlay the flags that were given onto `config`.
    pub fn apply(&self, config: &mut Config) -> Result<(), ConfigError> {
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(id) = self.match_id {
            config.selection.match_id = Some(id);
        }
        if let Some(team) = &self.team {
            config.selection.team = team.clone();
        }
        if let Some(player) = &self.player {
            config.selection.player = Some(player.clone());
        }
        if !self.compare.is_empty() {
            config.comparison.players = self.compare.clone();
        }
        if !self.metrics.is_empty() {
            config.comparison.squad_metrics = parse_metrics("--metrics", &self.metrics)?;
        }
        if self.json {
            config.report.format = ReportFormat::Json;
        }
        crate::config::validate(config)
    }
}
