use crate::models::{FlightRecord, FlightStatus, RawFlightFragment};
use crate::rules::ClassificationRules;

/// Placeholder kept in `raw_status` when the card has no status badge.
pub const UNKNOWN_STATUS: &str = "Unknown";

/// Turns one scraped card into a canonical record.
///
/// Status resolution, first match wins:
/// 1. cancelled keyword in the text, or the badge is flagged
/// 2. delayed keyword in the text
/// 3. on time
pub fn normalize(fragment: &RawFlightFragment, rules: &ClassificationRules) -> FlightRecord {
    let raw_status = fragment.status.as_deref().map(str::trim);
    let status_lower = raw_status.unwrap_or_default().to_lowercase();

    let status = if fragment.flagged || rules.mentions_cancelled(&status_lower) {
        FlightStatus::Cancelled
    } else if rules.mentions_delayed(&status_lower) {
        FlightStatus::Delayed
    } else {
        FlightStatus::OnTime
    };

    FlightRecord {
        scheduled_time: fragment.scheduled_time.trim().to_string(),
        status,
        airline: fragment.airline.trim().to_lowercase(),
        raw_status: raw_status.unwrap_or(UNKNOWN_STATUS).to_string(),
    }
}

pub fn normalize_all(fragments: &[RawFlightFragment], rules: &ClassificationRules) -> Vec<FlightRecord> {
    fragments.iter().map(|f| normalize(f, rules)).collect()
}
