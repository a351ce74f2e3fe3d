use crate::models::{FlightRecord, FlightStatus, StatusTally};

/// Counts records by status. Runs over every record, including ones the
/// hourly aggregation drops for a bad scheduled time.
pub fn count_statuses(records: &[FlightRecord]) -> StatusTally {
    records.iter().fold(StatusTally::default(), |mut tally, record| {
        match record.status {
            FlightStatus::OnTime => tally.on_time += 1,
            FlightStatus::Cancelled => tally.cancelled += 1,
            FlightStatus::Delayed => tally.delayed += 1,
        }
        tally
    })
}
