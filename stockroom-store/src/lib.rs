pub mod app_config;
pub mod catalog_repo;
pub mod database;
pub mod memory_repo;

pub use app_config::{Config, ConfigError, DatabaseConfig, LoggingConfig};
pub use catalog_repo::PgProductRepository;
pub use database::Database;
pub use memory_repo::InMemoryProductRepository;
