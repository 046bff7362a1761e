// Match event analysis core: timeline normalization, shot-recovery
// attribution, z-score comparison across players.

pub mod attribution;
pub mod comparison;
pub mod error;
pub mod event;
pub mod lineup;
pub mod pipeline;
pub mod shot_map;
pub mod source;
pub mod squad;
pub mod timeline;
pub mod zscore;

pub use error::AnalysisError;
pub use event::Event;
