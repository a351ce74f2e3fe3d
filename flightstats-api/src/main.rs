use anyhow::Context;
use flightstats_api::{app, middleware::CircuitBreaker, worker, AppState};
use flightstats_core::{ReportBuilder, ReportRepository, SystemClock};
use flightstats_store::{app_config::Config, DbClient, InMemoryReportRepository, PgReportRepository, SydneyBoardClient};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flightstats_api=debug,flightstats_store=debug,flightstats_core=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting flightstats API on port {}", config.server.port);

    let reports: Arc<dyn ReportRepository> = match &config.database.url {
        Some(url) => {
            let db = DbClient::new(url).await.context("Failed to connect to Postgres")?;
            db.migrate().await.context("Failed to run migrations")?;
            Arc::new(PgReportRepository::new(db.pool.clone()))
        }
        None => {
            tracing::warn!(
                "No database configured, keeping the last {} reports in memory",
                config.database.memory_retention
            );
            Arc::new(InMemoryReportRepository::with_retention(config.database.memory_retention))
        }
    };

    let board = SydneyBoardClient::new(&config.board).context("Failed to build board client")?;

    let app_state = AppState {
        builder: ReportBuilder::new(Arc::new(board), config.rules.clone()),
        reports,
        clock: Arc::new(SystemClock),
        board_breaker: Arc::new(CircuitBreaker::new(
            "arrivals-board",
            config.resiliency.failure_threshold,
            Duration::from_secs(config.resiliency.reset_timeout_seconds),
        )),
    };

    if config.scheduler.enabled {
        tokio::spawn(worker::start_snapshot_worker(app_state.clone(), config.scheduler.clone()));
    }

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
