use std::collections::BTreeMap;

use crate::models::{FlightRecord, HourlyBucket, HOURS_PER_DAY};
use crate::rules::ClassificationRules;

/// Hour-of-day from an `HH:MM` string. `None` for empty, non-numeric or
/// out-of-range hours.
pub fn scheduled_hour(scheduled_time: &str) -> Option<u32> {
    let head = scheduled_time.split(':').next()?.trim();
    let hour: u32 = head.parse().ok()?;
    (hour < HOURS_PER_DAY).then_some(hour)
}

/// Buckets records by scheduled hour and inferred terminal.
///
/// Only hours with at least one arrival appear in the result. Records without
/// a usable hour are skipped.
pub fn count_by_hour(records: &[FlightRecord], rules: &ClassificationRules) -> BTreeMap<u32, HourlyBucket> {
    let mut buckets: BTreeMap<u32, HourlyBucket> = BTreeMap::new();

    for record in records {
        let Some(hour) = scheduled_hour(&record.scheduled_time) else {
            tracing::trace!("Skipping record without a usable hour: {:?}", record.scheduled_time);
            continue;
        };
        buckets
            .entry(hour)
            .or_default()
            .record(rules.is_primary(&record.airline));
    }

    buckets
}
