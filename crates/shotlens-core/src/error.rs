// Error kinds surfaced by the analysis pipeline.

use thiserror::Error;

use crate::source::SourceError;

/// Failures the caller should present as "no data" rather than crash on.
///
/// Zero-variance metrics are not an error: they are resolved locally by
/// substituting a z-score of 0.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A requested match, player, label or metric is not in the loaded data.
    #[error("no data available: {what} `{name}` not found")]
    MissingInput { what: &'static str, name: String },

    /// The caller asked to compare an empty set of players or metrics.
    #[error("nothing to compare: no {what} selected")]
    EmptySelection { what: &'static str },

    #[error(transparent)]
    Source(#[from] SourceError),
}

impl AnalysisError {
    pub(crate) fn missing(what: &'static str, name: impl Into<String>) -> Self {
        AnalysisError::MissingInput {
            what,
            name: name.into(),
        }
    }
}
