use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::aggregator::count_by_hour;
use crate::calendar::{format_board_date, DateSelector, FlightType};
use crate::extractor::{BoardExtractor, LoadFailure};
use crate::models::{FlightRecord, FlightReport, HourlyTable, RawFlightFragment};
use crate::normalizer::normalize_all;
use crate::peak::peak_hours;
use crate::repository::{ReportRepository, StoredReport};
use crate::rules::ClassificationRules;
use crate::tally::count_statuses;
use crate::{CoreResult, AIRPORT_NAME};

/// Builds the day summary from normalized records.
///
/// `flight_type` is echoed into the report as given.
pub fn assemble_report(
    date: NaiveDate,
    flight_type: &str,
    records: &[FlightRecord],
    rules: &ClassificationRules,
) -> FlightReport {
    let flight_statuses = count_statuses(records);
    let by_hour = count_by_hour(records, rules);
    let peaks = peak_hours(&by_hour);

    let mut flight_count = HourlyTable::default();
    for (hour, bucket) in &by_hour {
        flight_count.set(*hour, *bucket);
    }

    debug!(
        "Assembled report for {}: {} records, {} placed in hourly buckets",
        date,
        records.len(),
        flight_count.total()
    );

    FlightReport {
        airport: AIRPORT_NAME.to_string(),
        date: format_board_date(date),
        flight_type: flight_type.to_string(),
        flight_count,
        flight_statuses,
        peak_hours: peaks,
    }
}

/// Normalizes raw cards and summarizes them in one pass.
pub fn summarize(
    date: NaiveDate,
    flight_type: &str,
    fragments: &[RawFlightFragment],
    rules: &ClassificationRules,
) -> FlightReport {
    let records = normalize_all(fragments, rules);
    assemble_report(date, flight_type, &records, rules)
}

/// Runs the board extractor and the summary pipeline for one request.
#[derive(Clone)]
pub struct ReportBuilder {
    extractor: Arc<dyn BoardExtractor>,
    rules: ClassificationRules,
}

impl ReportBuilder {
    pub fn new(extractor: Arc<dyn BoardExtractor>, rules: ClassificationRules) -> Self {
        Self { extractor, rules }
    }

    pub fn rules(&self) -> &ClassificationRules {
        &self.rules
    }

    /// `flight_type` is the caller's raw value; missing values are reported as
    /// the resolved board name. Nothing is returned if the board fails to load.
    pub async fn build_report(
        &self,
        selector: DateSelector,
        flight_type: Option<&str>,
        today: NaiveDate,
    ) -> Result<FlightReport, LoadFailure> {
        let date = selector.resolve(today);
        let board = FlightType::parse(flight_type);
        let echoed = flight_type.unwrap_or(board.as_str());

        info!("Fetching {} arrivals for {}", board, format_board_date(date));
        let fragments = self.extractor.fetch_fragments(date, board).await?;
        debug!("Extractor returned {} flight cards", fragments.len());

        Ok(summarize(date, echoed, &fragments, &self.rules))
    }

    /// Builds a report and stores it.
    pub async fn capture(
        &self,
        repository: &dyn ReportRepository,
        selector: DateSelector,
        flight_type: Option<&str>,
        today: NaiveDate,
    ) -> CoreResult<StoredReport> {
        let report = self.build_report(selector, flight_type, today).await?;
        let stored = repository.save_report(&report).await?;
        info!("Stored report {} for {} ({})", stored.id, stored.report.date, stored.report.flight_type);
        Ok(stored)
    }
}
