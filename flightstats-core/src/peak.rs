use std::collections::BTreeMap;

use crate::models::{hour_label, HourlyBucket, PeakHours, HOURS_PER_DAY};

/// Busiest and quietest hour of the day.
///
/// Hours missing from `buckets` count as zero. Ties go to the earlier hour.
/// The quietest hour ignores empty hours; when the whole day is empty both
/// labels stay at `"0-1"`.
pub fn peak_hours(buckets: &BTreeMap<u32, HourlyBucket>) -> PeakHours {
    let mut max_flights = 0;
    let mut min_flights = u32::MAX;
    let mut max_hour = 0;
    let mut min_hour = 0;

    for hour in 0..HOURS_PER_DAY {
        let count = buckets.get(&hour).map_or(0, |b| b.total);

        if count > max_flights {
            max_flights = count;
            max_hour = hour;
        }

        if count < min_flights && count > 0 {
            min_flights = count;
            min_hour = hour;
        }
    }

    PeakHours {
        max_flights: hour_label(max_hour),
        lowest_flights: hour_label(min_hour),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buckets(totals: &[(u32, u32)]) -> BTreeMap<u32, HourlyBucket> {
        totals
            .iter()
            .map(|&(hour, total)| (hour, HourlyBucket { secondary: total, primary: 0, total }))
            .collect()
    }

    #[test]
    fn test_empty_day_defaults() {
        let peaks = peak_hours(&BTreeMap::new());
        assert_eq!(peaks.max_flights, "0-1");
        assert_eq!(peaks.lowest_flights, "0-1");
    }

    #[test]
    fn test_lowest_skips_empty_hours() {
        let peaks = peak_hours(&buckets(&[(6, 4), (12, 9), (22, 1)]));
        assert_eq!(peaks.max_flights, "12-13");
        assert_eq!(peaks.lowest_flights, "22-23");
    }

    #[test]
    fn test_ties_prefer_earlier_hour() {
        let peaks = peak_hours(&buckets(&[(5, 2), (8, 7), (15, 7), (19, 2)]));
        assert_eq!(peaks.max_flights, "8-9");
        assert_eq!(peaks.lowest_flights, "5-6");
    }

    #[test]
    fn test_single_busy_hour() {
        let peaks = peak_hours(&buckets(&[(23, 3)]));
        assert_eq!(peaks.max_flights, "23-24");
        assert_eq!(peaks.lowest_flights, "23-24");
    }
}
