use async_trait::async_trait;
use chrono::NaiveDate;
use flightstats_core::calendar::format_board_date;
use flightstats_core::{BoardExtractor, FlightType, LoadFailure, RawFlightFragment};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use crate::app_config::BoardConfig;
use crate::markup::extract_fragments;

/// Arrivals board client for sydneyairport.com.au
pub struct SydneyBoardClient {
    http: Client,
    base_url: String,
    timeout_seconds: u64,
}

impl SydneyBoardClient {
    pub fn new(config: &BoardConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            timeout_seconds: config.timeout_seconds,
        })
    }

    /// Query string for one day of arrivals, sorted by scheduled time.
    pub fn board_query(date: NaiveDate, flight_type: FlightType) -> Vec<(&'static str, String)> {
        vec![
            ("query", String::new()),
            ("flightType", "arrival".to_string()),
            ("terminalType", flight_type.as_str().to_string()),
            ("date", format_board_date(date)),
            ("sortColumn", "scheduled_time".to_string()),
            ("ascending", "true".to_string()),
            ("showAll", "true".to_string()),
        ]
    }

    async fn fetch_page(&self, date: NaiveDate, flight_type: FlightType) -> Result<String, LoadFailure> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&Self::board_query(date, flight_type))
            .send()
            .await
            .map_err(|e| self.transport_failure(e))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Board returned {} for {} {}", status, flight_type, date);
            return Err(LoadFailure::Http(format!("unexpected status {}", status)));
        }

        response.text().await.map_err(|e| self.transport_failure(e))
    }

    fn transport_failure(&self, err: reqwest::Error) -> LoadFailure {
        if err.is_timeout() {
            LoadFailure::Timeout(self.timeout_seconds)
        } else {
            LoadFailure::Http(err.to_string())
        }
    }
}

#[async_trait]
impl BoardExtractor for SydneyBoardClient {
    async fn fetch_fragments(
        &self,
        date: NaiveDate,
        flight_type: FlightType,
    ) -> Result<Vec<RawFlightFragment>, LoadFailure> {
        let html = self.fetch_page(date, flight_type).await?;
        debug!("Board page for {} {}: {} bytes", flight_type, date, html.len());

        let fragments = extract_fragments(&html);
        if fragments.is_empty() {
            return Err(LoadFailure::ContentMissing);
        }
        Ok(fragments)
    }
}
