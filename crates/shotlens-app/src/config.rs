// Configuration loading and parsing (config/shotlens.toml).

use std::path::{Path, PathBuf};

use serde::Deserialize;
use shotlens_core::attribution::ShotMetric;
use shotlens_core::squad::SquadMetric;
use thiserror::Error;
use tracing::info;

const CONFIG_FILE: &str = "shotlens.toml";

/// Upper bound on printed decimals.
const MAX_DECIMALS: usize = 6;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub selection: SelectionConfig,
    pub comparison: ComparisonConfig,
    /// Root of the CSV exports.
    pub data_dir: PathBuf,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectionConfig {
    pub competition_name: String,
    #[serde(default = "default_stage")]
    pub competition_stage: String,
    pub team: String,
    /// Pin a match instead of picking the first one at `competition_stage`.
    #[serde(default)]
    pub match_id: Option<u64>,
    /// Focus player, by label or full name.
    #[serde(default)]
    pub player: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ComparisonConfig {
    pub players: Vec<String>,
    pub squad_metrics: Vec<SquadMetric>,
    pub shot_metrics: Vec<ShotMetric>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_format")]
    pub format: ReportFormat,
    #[serde(default = "default_decimals")]
    pub decimals: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            format: default_format(),
            decimals: default_decimals(),
        }
    }
}

// ---------------------------------------------------------------------------
// shotlens.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the whole file.
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    selection: SelectionConfig,
    #[serde(default)]
    comparison: ComparisonSection,
    #[serde(default)]
    data: DataSection,
    #[serde(default)]
    report: ReportConfig,
}

#[derive(Debug, Clone, Deserialize)]
struct ComparisonSection {
    #[serde(default)]
    players: Vec<String>,
    #[serde(default = "default_squad_metrics")]
    squad_metrics: Vec<String>,
    #[serde(default = "default_shot_metrics")]
    shot_metrics: Vec<String>,
}

impl Default for ComparisonSection {
    fn default() -> Self {
        ComparisonSection {
            players: Vec::new(),
            squad_metrics: default_squad_metrics(),
            shot_metrics: default_shot_metrics(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct DataSection {
    dir: Option<String>,
}

fn default_stage() -> String {
    "Final".into()
}

fn default_format() -> ReportFormat {
    ReportFormat::Text
}

fn default_decimals() -> usize {
    2
}

fn default_squad_metrics() -> Vec<String> {
    SquadMetric::DEFAULT_SELECTION
        .iter()
        .map(|m| m.name().to_string())
        .collect()
}

fn default_shot_metrics() -> Vec<String> {
    ShotMetric::ALL.iter().map(|m| m.name().to_string()).collect()
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/shotlens.toml` relative to `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy
/// defaults. Prefer `load_config()`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let file: ConfigFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    let comparison = ComparisonConfig {
        players: file.comparison.players,
        squad_metrics: parse_metrics("comparison.squad_metrics", &file.comparison.squad_metrics)?,
        shot_metrics: parse_metrics("comparison.shot_metrics", &file.comparison.shot_metrics)?,
    };

    let config = Config {
        selection: file.selection,
        comparison,
        data_dir: resolve_data_dir(file.data.dir.as_deref()),
        report: file.report,
    };

    validate(&config)?;

    Ok(config)
}

/// Copy `defaults/shotlens.toml` to `config/shotlens.toml` unless the latter
/// already exists. Returns the copied path, if any.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    if target.is_file() {
        return Ok(vec![]);
    }

    let source = base_dir.join("defaults").join(CONFIG_FILE);
    if !source.is_file() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "neither config/{CONFIG_FILE} nor defaults/{CONFIG_FILE} found in {}",
                base_dir.display()
            ),
        });
    }

    let copy_error = |e: std::io::Error| ConfigError::DefaultsCopyError {
        message: format!("failed to copy {} to {}: {e}", source.display(), target.display()),
    };
    std::fs::create_dir_all(base_dir.join("config")).map_err(copy_error)?;
    std::fs::copy(&source, &target).map_err(copy_error)?;
    info!("copied default config to {}", target.display());

    Ok(vec![target])
}

/// Copy missing defaults into `base_dir/config`, then load.
pub fn load_config(base_dir: &Path) -> Result<Config, ConfigError> {
    ensure_config_files(base_dir)?;
    load_config_from(base_dir)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

/// Parse metric names, rejecting unknown ones.
pub fn parse_metrics<M>(field: &str, names: &[String]) -> Result<Vec<M>, ConfigError>
where
    M: std::str::FromStr<Err = String>,
{
    names
        .iter()
        .map(|n| {
            n.trim().parse::<M>().map_err(|message| ConfigError::ValidationError {
                field: field.to_string(),
                message,
            })
        })
        .collect()
}

/// Configured directory if any, else the platform data directory when it
/// exists, else `data/`.
fn resolve_data_dir(configured: Option<&str>) -> PathBuf {
    if let Some(dir) = configured {
        return PathBuf::from(dir);
    }
    directories::ProjectDirs::from("", "", "shotlens")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .filter(|dir| dir.is_dir())
        .unwrap_or_else(|| PathBuf::from("data"))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn validate(config: &Config) -> Result<(), ConfigError> {
    let selection_fields: &[(&str, &str)] = &[
        ("selection.team", config.selection.team.as_str()),
        ("selection.competition_name", config.selection.competition_name.as_str()),
        ("selection.competition_stage", config.selection.competition_stage.as_str()),
    ];
    for (name, val) in selection_fields {
        if val.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must not be empty".into(),
            });
        }
    }

    if config.report.decimals > MAX_DECIMALS {
        return Err(ConfigError::ValidationError {
            field: "report.decimals".into(),
            message: format!("must be at most {MAX_DECIMALS}, got {}", config.report.decimals),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
