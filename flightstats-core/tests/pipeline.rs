use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use flightstats_core::{
    BoardExtractor, ClassificationRules, CoreError, DateSelector, FlightReport, FlightType,
    LoadFailure, RawFlightFragment, ReportBuilder, ReportRepository, RepositoryError, StoredReport,
};

struct StubBoard {
    fragments: Vec<RawFlightFragment>,
    fail: bool,
    calls: Mutex<Vec<(NaiveDate, FlightType)>>,
}

impl StubBoard {
    fn with(fragments: Vec<RawFlightFragment>) -> Self {
        Self { fragments, fail: false, calls: Mutex::new(Vec::new()) }
    }

    fn failing() -> Self {
        Self { fragments: Vec::new(), fail: true, calls: Mutex::new(Vec::new()) }
    }
}

#[async_trait]
impl BoardExtractor for StubBoard {
    async fn fetch_fragments(
        &self,
        date: NaiveDate,
        flight_type: FlightType,
    ) -> Result<Vec<RawFlightFragment>, LoadFailure> {
        self.calls.lock().unwrap().push((date, flight_type));
        if self.fail {
            return Err(LoadFailure::ContentMissing);
        }
        Ok(self.fragments.clone())
    }
}

#[derive(Default)]
struct VecRepository {
    saved: Mutex<Vec<StoredReport>>,
}

#[async_trait]
impl ReportRepository for VecRepository {
    async fn save_report(&self, report: &FlightReport) -> Result<StoredReport, RepositoryError> {
        let stored = StoredReport::new(report.clone());
        self.saved.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn latest_report(&self) -> Result<Option<StoredReport>, RepositoryError> {
        Ok(self.saved.lock().unwrap().last().cloned())
    }

    async fn latest_for(
        &self,
        date: &str,
        flight_type: FlightType,
    ) -> Result<Option<StoredReport>, RepositoryError> {
        Ok(self
            .saved
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|s| s.report.date == date && FlightType::parse(Some(s.report.flight_type.as_str())) == flight_type)
            .cloned())
    }

    async fn list_reports(&self, limit: usize) -> Result<Vec<StoredReport>, RepositoryError> {
        Ok(self.saved.lock().unwrap().iter().rev().take(limit).cloned().collect())
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 12, 28).unwrap()
}

fn busy_board() -> Vec<RawFlightFragment> {
    vec![
        RawFlightFragment::new("06:10", Some("Landed"), "Qantas"),
        RawFlightFragment::new("06:35", Some("Delayed"), "Virgin Australia"),
        RawFlightFragment::new("07:00", None, "Jetstar"),
        RawFlightFragment::new("07:20", Some("On time"), "QantasLink"),
        RawFlightFragment::new("07:45", Some("Cancelled"), "Rex Airlines"),
        RawFlightFragment::new("", Some("Delayed"), "Qantas"),
        RawFlightFragment::new("--:--", None, "Bonza"),
        RawFlightFragment::new("21:05", Some("Estimated 21:40"), "Air New Zealand").flagged(),
    ]
}

#[tokio::test]
async fn test_build_report_resolves_date_and_board() {
    let board = Arc::new(StubBoard::with(busy_board()));
    let builder = ReportBuilder::new(board.clone(), ClassificationRules::default());

    let report = builder
        .build_report(DateSelector::Tomorrow, Some("domestic"), today())
        .await
        .unwrap();

    let calls = board.calls.lock().unwrap().clone();
    assert_eq!(calls, vec![(NaiveDate::from_ymd_opt(2024, 12, 29).unwrap(), FlightType::Domestic)]);
    assert_eq!(report.date, "2024/12/29");
    assert_eq!(report.flight_type, "domestic");

    assert_eq!(report.flight_statuses.on_time, 4);
    assert_eq!(report.flight_statuses.delayed, 2);
    assert_eq!(report.flight_statuses.cancelled, 2);

    let seven = report.flight_count.get(7).unwrap();
    assert_eq!((seven.primary, seven.secondary, seven.total), (1, 2, 3));
    assert_eq!(report.peak_hours.max_flights, "7-8");
    assert_eq!(report.peak_hours.lowest_flights, "21-22");
}

#[tokio::test]
async fn test_unknown_flight_type_reads_international_board() {
    let board = Arc::new(StubBoard::with(Vec::new()));
    let builder = ReportBuilder::new(board.clone(), ClassificationRules::default());

    let report = builder
        .build_report(DateSelector::Today, Some("regional"), today())
        .await
        .unwrap();
    assert_eq!(report.flight_type, "regional");

    let missing = builder.build_report(DateSelector::Today, None, today()).await.unwrap();
    assert_eq!(missing.flight_type, "international");

    let calls = board.calls.lock().unwrap().clone();
    assert!(calls.iter().all(|(_, t)| *t == FlightType::International));
}

#[tokio::test]
async fn test_load_failure_yields_no_report() {
    let builder = ReportBuilder::new(Arc::new(StubBoard::failing()), ClassificationRules::default());
    let repository = VecRepository::default();

    let result = builder.build_report(DateSelector::Today, Some("domestic"), today()).await;
    assert!(matches!(result, Err(LoadFailure::ContentMissing)));

    let captured = builder
        .capture(&repository, DateSelector::Today, Some("domestic"), today())
        .await;
    assert!(matches!(captured, Err(CoreError::Load(LoadFailure::ContentMissing))));
    assert!(repository.latest_report().await.unwrap().is_none());
}

#[tokio::test]
async fn test_capture_persists_report() {
    let builder = ReportBuilder::new(Arc::new(StubBoard::with(busy_board())), ClassificationRules::default());
    let repository = VecRepository::default();

    let stored = builder
        .capture(&repository, DateSelector::Yesterday, Some("domestic"), today())
        .await
        .unwrap();

    assert_eq!(stored.report.date, "2024/12/27");
    let found = repository
        .latest_for("2024/12/27", FlightType::Domestic)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, stored.id);
}

#[tokio::test]
async fn test_counting_invariants_hold_for_varied_boards() {
    let times = ["00:05", "23:59", "", "xx", "12:00", "7:15", "25:00", " 09:30"];
    let statuses = [None, Some("Delayed"), Some("cancelled"), Some("Landed"), Some("")];
    let airlines = ["Qantas", "Virgin", "", "QANTASLINK"];

    for size in 0..times.len() * 3 {
        let fragments: Vec<RawFlightFragment> = (0..size)
            .map(|i| {
                RawFlightFragment::new(
                    times[i % times.len()],
                    statuses[i % statuses.len()],
                    airlines[i % airlines.len()],
                )
            })
            .collect();

        let builder = ReportBuilder::new(Arc::new(StubBoard::with(fragments)), ClassificationRules::default());
        let report = builder.build_report(DateSelector::Today, None, today()).await.unwrap();

        assert_eq!(report.flight_statuses.total() as usize, size);
        assert!(report.flight_count.total() as usize <= size);

        for (_, bucket) in report.flight_count.iter() {
            assert_eq!(bucket.total, bucket.primary + bucket.secondary);
        }

        let lowest_hour: u32 = report.peak_hours.lowest_flights.split('-').next().unwrap().parse().unwrap();
        let max_hour: u32 = report.peak_hours.max_flights.split('-').next().unwrap().parse().unwrap();
        assert!(lowest_hour < 24 && max_hour < 24);
        if report.flight_count.total() == 0 {
            assert_eq!(report.peak_hours.lowest_flights, "0-1");
            assert_eq!(report.peak_hours.max_flights, "0-1");
        } else {
            assert!(report.flight_count.get(lowest_hour).unwrap().total > 0);
        }
    }
}
