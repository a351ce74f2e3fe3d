use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use flightstats_core::calendar::{format_board_date, parse_board_date};
use flightstats_core::{DateSelector, FlightReport, FlightType, StoredReport};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::AppError;
use crate::state::AppState;

const DEFAULT_LIST_LIMIT: usize = 20;
const MAX_LIST_LIMIT: usize = 100;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct BoardQuery {
    /// `today`, `yesterday`, `tomorrow` or `day_after_tomorrow`
    pub date: Option<String>,
    #[serde(rename = "flightType")]
    pub flight_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LatestQuery {
    /// `YYYY/MM/DD`
    pub date: Option<String>,
    #[serde(rename = "flightType")]
    pub flight_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ScrapeResponse {
    pub message: String,
    pub data: StoredReport,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/
pub async fn welcome() -> &'static str {
    "Welcome to the Flight API!"
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// GET /api/flights
/// Builds a report from the live board
pub async fn get_flights(
    State(state): State<AppState>,
    Query(query): Query<BoardQuery>,
) -> Result<Json<FlightReport>, AppError> {
    let selector = DateSelector::parse(query.date.as_deref());
    let report = state
        .builder
        .build_report(selector, query.flight_type.as_deref(), state.clock.today())
        .await?;

    Ok(Json(report))
}

/// GET /api/scrape
/// Builds a report from the live board and stores it
pub async fn scrape(
    State(state): State<AppState>,
    Query(query): Query<BoardQuery>,
) -> Result<Json<ScrapeResponse>, AppError> {
    let selector = DateSelector::parse(query.date.as_deref());
    let stored = state
        .builder
        .capture(
            state.reports.as_ref(),
            selector,
            query.flight_type.as_deref(),
            state.clock.today(),
        )
        .await?;

    Ok(Json(ScrapeResponse {
        message: "Data scraped and saved to database".to_string(),
        data: stored,
    }))
}

/// GET /api/flights/latest
/// Newest stored report, optionally for one date and board
pub async fn latest(
    State(state): State<AppState>,
    Query(query): Query<LatestQuery>,
) -> Result<Json<StoredReport>, AppError> {
    let found = if query.date.is_none() && query.flight_type.is_none() {
        state.reports.latest_report().await?
    } else {
        let date = match query.date.as_deref() {
            Some(raw) => parse_board_date(raw)
                .ok_or_else(|| AppError::ValidationError(format!("Invalid date '{}', expected YYYY/MM/DD", raw)))?,
            None => state.clock.today(),
        };
        let board = FlightType::parse(query.flight_type.as_deref());
        state.reports.latest_for(&format_board_date(date), board).await?
    };

    found
        .map(Json)
        .ok_or_else(|| AppError::NotFoundError("No flight data stored yet".to_string()))
}

/// GET /api/reports
pub async fn list_reports(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<StoredReport>>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT);
    let reports = state.reports.list_reports(limit).await?;
    Ok(Json(reports))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/", get(welcome))
        .route("/api/flights", get(get_flights))
        .route("/api/flights/latest", get(latest))
        .route("/api/scrape", get(scrape))
        .route("/api/reports", get(list_reports))
}
