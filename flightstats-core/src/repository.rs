use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar::FlightType;
use crate::models::FlightReport;

/// A report as kept in storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredReport {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub report: FlightReport,
}

impl StoredReport {
    pub fn new(report: FlightReport) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            report,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Storage backend error: {0}")]
    Backend(String),
    #[error("Stored report is unreadable: {0}")]
    Corrupt(String),
}

/// Repository trait for report snapshots
#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn save_report(&self, report: &FlightReport) -> Result<StoredReport, RepositoryError>;

    /// Newest report of any date and type.
    async fn latest_report(&self) -> Result<Option<StoredReport>, RepositoryError>;

    /// Newest report for one board date (`YYYY/MM/DD`) and flight type.
    async fn latest_for(
        &self,
        date: &str,
        flight_type: FlightType,
    ) -> Result<Option<StoredReport>, RepositoryError>;

    /// Most recent reports, newest first.
    async fn list_reports(&self, limit: usize) -> Result<Vec<StoredReport>, RepositoryError>;
}
