pub mod adapter;
pub mod app_config;
pub mod database;

pub use adapter::PostgresAdapter;
pub use app_config::Config;
pub use database::DbClient;
