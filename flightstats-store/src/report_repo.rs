use async_trait::async_trait;
use chrono::{DateTime, Utc};
use flightstats_core::{
    FlightReport, FlightType, ReportRepository, RepositoryError, StoredReport,
};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

pub struct PgReportRepository {
    pool: PgPool,
}

impl PgReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ReportRow {
    id: Uuid,
    created_at: DateTime<Utc>,
    payload: Json<FlightReport>,
}

impl From<ReportRow> for StoredReport {
    fn from(row: ReportRow) -> Self {
        StoredReport {
            id: row.id,
            created_at: row.created_at,
            report: row.payload.0,
        }
    }
}

fn backend(err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::Decode(e) => RepositoryError::Corrupt(e.to_string()),
        other => RepositoryError::Backend(other.to_string()),
    }
}

#[async_trait]
impl ReportRepository for PgReportRepository {
    async fn save_report(&self, report: &FlightReport) -> Result<StoredReport, RepositoryError> {
        let stored = StoredReport::new(report.clone());
        // Echoed flight type may be anything; index on the board it resolved to.
        let board = FlightType::parse(Some(report.flight_type.as_str()));

        sqlx::query(
            r#"
            INSERT INTO flight_reports (id, airport, report_date, flight_type, payload, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(stored.id)
        .bind(&report.airport)
        .bind(&report.date)
        .bind(board.as_str())
        .bind(Json(report))
        .bind(stored.created_at)
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        Ok(stored)
    }

    async fn latest_report(&self) -> Result<Option<StoredReport>, RepositoryError> {
        let row = sqlx::query_as::<_, ReportRow>(
            "SELECT id, created_at, payload FROM flight_reports ORDER BY created_at DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        Ok(row.map(StoredReport::from))
    }

    async fn latest_for(
        &self,
        date: &str,
        flight_type: FlightType,
    ) -> Result<Option<StoredReport>, RepositoryError> {
        let row = sqlx::query_as::<_, ReportRow>(
            r#"
            SELECT id, created_at, payload
            FROM flight_reports
            WHERE report_date = $1 AND flight_type = $2
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(date)
        .bind(flight_type.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        Ok(row.map(StoredReport::from))
    }

    async fn list_reports(&self, limit: usize) -> Result<Vec<StoredReport>, RepositoryError> {
        let rows = sqlx::query_as::<_, ReportRow>(
            "SELECT id, created_at, payload FROM flight_reports ORDER BY created_at DESC LIMIT $1",
        )
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        Ok(rows.into_iter().map(StoredReport::from).collect())
    }
}
