use async_trait::async_trait;
use flightstats_core::{FlightReport, FlightType, ReportRepository, RepositoryError, StoredReport};
use tokio::sync::RwLock;

/// Reports kept when no retention is given.
pub const DEFAULT_RETENTION: usize = 1000;

/// In-memory report store, used when no database is configured.
/// Holds at most `retention` reports; the oldest are dropped first.
pub struct InMemoryReportRepository {
    reports: RwLock<Vec<StoredReport>>,
    retention: usize,
}

impl Default for InMemoryReportRepository {
    fn default() -> Self {
        Self::with_retention(DEFAULT_RETENTION)
    }
}

impl InMemoryReportRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_retention(retention: usize) -> Self {
        Self {
            reports: RwLock::new(Vec::new()),
            retention: retention.max(1),
        }
    }

    pub async fn len(&self) -> usize {
        self.reports.read().await.len()
    }
}

#[async_trait]
impl ReportRepository for InMemoryReportRepository {
    async fn save_report(&self, report: &FlightReport) -> Result<StoredReport, RepositoryError> {
        let stored = StoredReport::new(report.clone());
        let mut reports = self.reports.write().await;
        reports.push(stored.clone());
        if reports.len() > self.retention {
            let excess = reports.len() - self.retention;
            reports.drain(..excess);
        }
        Ok(stored)
    }

    async fn latest_report(&self) -> Result<Option<StoredReport>, RepositoryError> {
        Ok(self.reports.read().await.last().cloned())
    }

    async fn latest_for(
        &self,
        date: &str,
        flight_type: FlightType,
    ) -> Result<Option<StoredReport>, RepositoryError> {
        let reports = self.reports.read().await;
        Ok(reports
            .iter()
            .rev()
            .find(|s| {
                s.report.date == date
                    && FlightType::parse(Some(s.report.flight_type.as_str())) == flight_type
            })
            .cloned())
    }

    async fn list_reports(&self, limit: usize) -> Result<Vec<StoredReport>, RepositoryError> {
        let reports = self.reports.read().await;
        Ok(reports.iter().rev().take(limit).cloned().collect())
    }
}
