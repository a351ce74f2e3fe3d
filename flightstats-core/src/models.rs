use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const HOURS_PER_DAY: u32 = 24;

// ============================================================================
// Board input
// ============================================================================

/// One flight card as scraped from the arrivals board, before any cleanup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFlightFragment {
    pub scheduled_time: String,
    pub status: Option<String>,
    /// Status badge rendered in the alert colour.
    pub flagged: bool,
    pub airline: String,
}

impl RawFlightFragment {
    pub fn new(scheduled_time: &str, status: Option<&str>, airline: &str) -> Self {
        Self {
            scheduled_time: scheduled_time.to_string(),
            status: status.map(|s| s.to_string()),
            flagged: false,
            airline: airline.to_string(),
        }
    }

    pub fn flagged(mut self) -> Self {
        self.flagged = true;
        self
    }
}

// ============================================================================
// Canonical records
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightStatus {
    OnTime,
    Delayed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightRecord {
    /// `HH:MM` as shown on the board; may be empty or malformed.
    pub scheduled_time: String,
    pub status: FlightStatus,
    /// Lower-cased carrier name.
    pub airline: String,
    pub raw_status: String,
}

// ============================================================================
// Aggregates
// ============================================================================

/// Arrivals for one hour of the day, split by inferred terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyBucket {
    #[serde(rename = "T2")]
    pub secondary: u32,
    #[serde(rename = "T3")]
    pub primary: u32,
    pub total: u32,
}

impl HourlyBucket {
    pub fn record(&mut self, primary: bool) {
        if primary {
            self.primary += 1;
        } else {
            self.secondary += 1;
        }
        self.total += 1;
    }
}

/// Formats the `"H-H+1"` label used for hour ranges.
pub fn hour_label(hour: u32) -> String {
    format!("{}-{}", hour, hour + 1)
}

fn parse_hour_label(label: &str) -> Option<u32> {
    let (start, end) = label.split_once('-')?;
    let start: u32 = start.parse().ok()?;
    let end: u32 = end.parse().ok()?;
    (start < HOURS_PER_DAY && end == start + 1).then_some(start)
}

/// Dense 24-hour table. Serializes as a map keyed `"0-1"` .. `"23-24"` in hour order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HourlyTable([HourlyBucket; HOURS_PER_DAY as usize]);

impl HourlyTable {
    pub fn get(&self, hour: u32) -> Option<&HourlyBucket> {
        self.0.get(hour as usize)
    }

    pub fn set(&mut self, hour: u32, bucket: HourlyBucket) {
        if let Some(slot) = self.0.get_mut(hour as usize) {
            *slot = bucket;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &HourlyBucket)> {
        self.0.iter().enumerate().map(|(hour, bucket)| (hour as u32, bucket))
    }

    pub fn total(&self) -> u32 {
        self.0.iter().map(|b| b.total).sum()
    }
}

impl Serialize for HourlyTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (hour, bucket) in self.iter() {
            map.serialize_entry(&hour_label(hour), bucket)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for HourlyTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = HourlyTable;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of hour ranges to hourly buckets")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut table = HourlyTable::default();
                while let Some((label, bucket)) = access.next_entry::<String, HourlyBucket>()? {
                    let hour = parse_hour_label(&label)
                        .ok_or_else(|| de::Error::custom(format!("invalid hour range: {}", label)))?;
                    table.set(hour, bucket);
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTally {
    pub on_time: u32,
    pub cancelled: u32,
    pub delayed: u32,
}

impl StatusTally {
    pub fn total(&self) -> u32 {
        self.on_time + self.cancelled + self.delayed
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeakHours {
    pub max_flights: String,
    pub lowest_flights: String,
}

// ============================================================================
// Report
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightReport {
    pub airport: String,
    /// `YYYY/MM/DD`
    pub date: String,
    pub flight_type: String,
    pub flight_count: HourlyTable,
    pub flight_statuses: StatusTally,
    pub peak_hours: PeakHours,
}
