// Local CSV exports of provider data, served through `MatchDataSource`.

pub mod csv_source;

pub use csv_source::{CsvDirSource, DataError};
