pub mod models;
pub mod rules;
pub mod normalizer;
pub mod tally;
pub mod aggregator;
pub mod peak;
pub mod report;
pub mod calendar;
pub mod extractor;
pub mod repository;

pub use models::{
    FlightRecord, FlightReport, FlightStatus, HourlyBucket, HourlyTable, PeakHours,
    RawFlightFragment, StatusTally,
};
pub use rules::ClassificationRules;
pub use calendar::{Clock, DateSelector, FixedClock, FlightType, SystemClock};
pub use extractor::{BoardExtractor, LoadFailure};
pub use report::{assemble_report, ReportBuilder};
pub use repository::{ReportRepository, RepositoryError, StoredReport};

/// Display name stamped on every report.
pub const AIRPORT_NAME: &str = "Sydney Airport";

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Board could not be loaded: {0}")]
    Load(#[from] LoadFailure),
    #[error("Report storage failed: {0}")]
    Storage(#[from] RepositoryError),
}

pub type CoreResult<T> = Result<T, CoreError>;
