pub mod app_config;
pub mod board;
pub mod database;
pub mod markup;
pub mod memory_repo;
pub mod report_repo;

pub use board::SydneyBoardClient;
pub use database::DbClient;
pub use memory_repo::InMemoryReportRepository;
pub use report_repo::PgReportRepository;
