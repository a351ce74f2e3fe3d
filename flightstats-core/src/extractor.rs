use async_trait::async_trait;
use chrono::NaiveDate;

use crate::calendar::FlightType;
use crate::models::RawFlightFragment;

#[derive(Debug, thiserror::Error)]
pub enum LoadFailure {
    #[error("Board request failed: {0}")]
    Http(String),
    #[error("Board did not respond within {0} seconds")]
    Timeout(u64),
    #[error("Board page loaded without any flight cards")]
    ContentMissing,
}

/// Source of raw flight cards for one day of the arrivals board.
#[async_trait]
pub trait BoardExtractor: Send + Sync {
    /// Returns every card on the board for `date`. An empty board is a valid
    /// answer; failing to load the board is not.
    async fn fetch_fragments(
        &self,
        date: NaiveDate,
        flight_type: FlightType,
    ) -> Result<Vec<RawFlightFragment>, LoadFailure>;
}
