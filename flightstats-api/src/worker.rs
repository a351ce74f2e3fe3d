use flightstats_core::DateSelector;
use flightstats_store::app_config::SchedulerConfig;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{error, info};

use crate::state::AppState;

/// Periodically captures a snapshot of each configured board.
pub async fn start_snapshot_worker(state: AppState, config: SchedulerConfig) {
    let selector = DateSelector::parse(Some(config.date.as_str()));
    let mut ticker = interval(Duration::from_secs(config.interval_seconds.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(
        "Snapshot worker started: every {}s for {:?} ({})",
        config.interval_seconds,
        config.flight_types,
        config.date
    );

    loop {
        ticker.tick().await;
        run_snapshot(&state, selector, &config.flight_types).await;
    }
}

/// One pass over the configured boards. Returns how many reports were stored.
pub async fn run_snapshot(state: &AppState, selector: DateSelector, flight_types: &[String]) -> usize {
    let today = state.clock.today();
    let mut stored = 0;

    for flight_type in flight_types {
        match state
            .builder
            .capture(state.reports.as_ref(), selector, Some(flight_type.as_str()), today)
            .await
        {
            Ok(report) => {
                info!("Snapshot {} stored for {} {}", report.id, report.report.date, flight_type);
                stored += 1;
            }
            Err(e) => error!("Snapshot for {} failed: {}", flight_type, e),
        }
    }

    stored
}
