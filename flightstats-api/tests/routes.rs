use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use flightstats_api::middleware::CircuitBreaker;
use flightstats_api::{app, worker, AppState};
use flightstats_core::{
    BoardExtractor, ClassificationRules, DateSelector, FixedClock, FlightReport, FlightType,
    LoadFailure, RawFlightFragment, ReportBuilder, ReportRepository, RepositoryError, StoredReport,
};
use flightstats_store::InMemoryReportRepository;
use serde_json::Value;
use tower::ServiceExt;

struct StubBoard {
    fail: bool,
}

#[async_trait]
impl BoardExtractor for StubBoard {
    async fn fetch_fragments(
        &self,
        _date: NaiveDate,
        flight_type: FlightType,
    ) -> Result<Vec<RawFlightFragment>, LoadFailure> {
        if self.fail {
            return Err(LoadFailure::Timeout(60));
        }
        let mut fragments = vec![
            RawFlightFragment::new("14:05", Some("Cancelled"), "Qantas"),
            RawFlightFragment::new("14:30", Some("On time"), "Virgin Australia"),
            RawFlightFragment::new("", Some("Delayed"), "Jetstar"),
        ];
        if flight_type == FlightType::International {
            fragments.push(RawFlightFragment::new("06:00", None, "Emirates"));
        }
        Ok(fragments)
    }
}

struct DownRepository;

#[async_trait]
impl ReportRepository for DownRepository {
    async fn save_report(&self, _report: &FlightReport) -> Result<StoredReport, RepositoryError> {
        Err(RepositoryError::Backend("connection refused".to_string()))
    }

    async fn latest_report(&self) -> Result<Option<StoredReport>, RepositoryError> {
        Err(RepositoryError::Backend("connection refused".to_string()))
    }

    async fn latest_for(
        &self,
        _date: &str,
        _flight_type: FlightType,
    ) -> Result<Option<StoredReport>, RepositoryError> {
        Err(RepositoryError::Backend("connection refused".to_string()))
    }

    async fn list_reports(&self, _limit: usize) -> Result<Vec<StoredReport>, RepositoryError> {
        Err(RepositoryError::Backend("connection refused".to_string()))
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 12, 28).unwrap()
}

fn test_state(fail: bool, repo: Arc<InMemoryReportRepository>) -> AppState {
    AppState {
        builder: ReportBuilder::new(Arc::new(StubBoard { fail }), ClassificationRules::default()),
        reports: repo,
        clock: Arc::new(FixedClock(today())),
        board_breaker: Arc::new(CircuitBreaker::new("test-board", 2, Duration::from_secs(60))),
    }
}

fn test_app(fail: bool) -> (Router, Arc<InMemoryReportRepository>) {
    let repo = Arc::new(InMemoryReportRepository::new());
    (app(test_state(fail, repo.clone())), repo)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, body)
}

#[tokio::test]
async fn test_welcome_and_health() {
    let (app, _) = test_app(false);

    let (status, body) = get(&app, "/api/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("Welcome to the Flight API!".to_string()));

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_live_report() {
    let (app, repo) = test_app(false);

    let (status, body) = get(&app, "/api/flights?date=tomorrow&flightType=domestic").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["airport"], "Sydney Airport");
    assert_eq!(body["date"], "2024/12/29");
    assert_eq!(body["flight_type"], "domestic");
    assert_eq!(body["flight_count"].as_object().unwrap().len(), 24);
    assert_eq!(body["flight_count"]["14-15"]["T3"], 1);
    assert_eq!(body["flight_count"]["14-15"]["T2"], 1);
    assert_eq!(body["flight_count"]["14-15"]["total"], 2);
    assert_eq!(body["flight_statuses"]["on_time"], 1);
    assert_eq!(body["flight_statuses"]["cancelled"], 1);
    assert_eq!(body["flight_statuses"]["delayed"], 1);
    assert_eq!(body["peak_hours"]["max_flights"], "14-15");
    assert_eq!(body["peak_hours"]["lowest_flights"], "14-15");

    // live reports are not stored
    assert_eq!(repo.len().await, 0);
}

#[tokio::test]
async fn test_unknown_selector_and_type_fall_back() {
    let (app, _) = test_app(false);

    let (status, body) = get(&app, "/api/flights?date=someday&flightType=regional").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["date"], "2024/12/28");
    assert_eq!(body["flight_type"], "regional");
    assert_eq!(body["flight_count"]["6-7"]["total"], 1);
    assert_eq!(body["peak_hours"]["lowest_flights"], "6-7");
}

#[tokio::test]
async fn test_load_failure_is_bad_gateway() {
    let (app, _) = test_app(true);

    let (status, body) = get(&app, "/api/flights?flightType=domestic").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Error fetching flight data");
}

#[tokio::test]
async fn test_scrape_then_latest() {
    let (app, repo) = test_app(false);

    let (status, _) = get(&app, "/api/flights/latest").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = get(&app, "/api/scrape?date=yesterday&flightType=domestic").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Data scraped and saved to database");
    assert_eq!(body["data"]["date"], "2024/12/27");
    let id = body["data"]["id"].clone();
    assert_eq!(repo.len().await, 1);

    let (status, body) = get(&app, "/api/flights/latest").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id);

    let (status, body) = get(&app, "/api/flights/latest?date=2024/12/27&flightType=domestic").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id);

    let (status, _) = get(&app, "/api/flights/latest?date=2024/12/27&flightType=international").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = get(&app, "/api/flights/latest?date=27-12-2024").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("YYYY/MM/DD"));
}

#[tokio::test]
async fn test_list_reports() {
    let (app, _) = test_app(false);
    for _ in 0..3 {
        let (status, _) = get(&app, "/api/scrape?flightType=domestic").await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = get(&app, "/api/reports?limit=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, body) = get(&app, "/api/reports").await;
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_circuit_opens_after_repeated_failures() {
    let (app, _) = test_app(true);

    for _ in 0..2 {
        let (status, _) = get(&app, "/api/flights").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    let (status, body) = get(&app, "/api/scrape").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].as_str().unwrap().contains("OPEN"));

    // stored reports stay reachable
    let (status, _) = get(&app, "/api/flights/latest").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_storage_outage_leaves_board_circuit_closed() {
    let state = AppState {
        reports: Arc::new(DownRepository),
        ..test_state(false, Arc::new(InMemoryReportRepository::new()))
    };
    let app = app(state);

    for _ in 0..4 {
        let (status, body) = get(&app, "/api/scrape?flightType=domestic").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal Server Error");
    }

    let (status, _) = get(&app, "/api/flights?flightType=domestic").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let (app, _) = test_app(false);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/")
                .header("origin", "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn test_snapshot_pass_stores_each_board() {
    let repo = Arc::new(InMemoryReportRepository::new());
    let state = test_state(false, repo.clone());
    let types = vec!["domestic".to_string(), "international".to_string()];

    let stored = worker::run_snapshot(&state, DateSelector::Today, &types).await;
    assert_eq!(stored, 2);

    let international = repo
        .latest_for("2024/12/28", FlightType::International)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(international.report.flight_statuses.on_time, 2);

    let failing = test_state(true, Arc::new(InMemoryReportRepository::new()));
    assert_eq!(worker::run_snapshot(&failing, DateSelector::Today, &types).await, 0);
}
