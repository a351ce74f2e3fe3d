use flightstats_core::ClassificationRules;
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub board: BoardConfig,
    #[serde(default)]
    pub rules: ClassificationRules,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub resiliency: ResiliencyConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// Reports are kept in memory when unset.
    pub url: Option<String>,
    /// Cap on reports held in memory when `url` is unset.
    #[serde(default = "default_memory_retention")]
    pub memory_retention: usize,
}

fn default_memory_retention() -> usize { 1000 }

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            memory_retention: default_memory_retention(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct BoardConfig {
    pub base_url: String,
    #[serde(default = "default_board_timeout")]
    pub timeout_seconds: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_board_timeout() -> u64 { 60 }
fn default_user_agent() -> String { format!("flightstats/{}", env!("CARGO_PKG_VERSION")) }

#[derive(Debug, Deserialize, Clone)]
pub struct SchedulerConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_interval")]
    pub interval_seconds: u64,
    /// Date selector name, e.g. `today` or `tomorrow`.
    #[serde(default = "default_date")]
    pub date: String,
    #[serde(default = "default_flight_types")]
    pub flight_types: Vec<String>,
}

fn default_interval() -> u64 { 3600 }
fn default_date() -> String { "today".to_string() }
fn default_flight_types() -> Vec<String> { vec!["domestic".to_string(), "international".to_string()] }

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_seconds: default_interval(),
            date: default_date(),
            flight_types: default_flight_types(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ResiliencyConfig {
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: usize,
    #[serde(default = "default_reset_timeout")]
    pub reset_timeout_seconds: u64,
}

fn default_failure_threshold() -> usize { 3 }
fn default_reset_timeout() -> u64 { 120 }

impl Default for ResiliencyConfig {
    fn default() -> Self {
        Self {
            failure_threshold: default_failure_threshold(),
            reset_timeout_seconds: default_reset_timeout(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg.. `FLIGHTSTATS_SERVER__PORT=8080`
            .add_source(config::Environment::with_prefix("FLIGHTSTATS").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
