use std::sync::Arc;

use flightstats_core::{Clock, ReportBuilder, ReportRepository};

use crate::middleware::CircuitBreaker;

#[derive(Clone)]
pub struct AppState {
    pub builder: ReportBuilder,
    pub reports: Arc<dyn ReportRepository>,
    pub clock: Arc<dyn Clock>,
    pub board_breaker: Arc<CircuitBreaker>,
}
