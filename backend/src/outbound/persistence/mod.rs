//! PostgreSQL persistence adapters.
//!
//! Async repositories use Diesel with `diesel-async` over a shared `bb8`
//! pool. Schema introspection and migrations use blocking connections since
//! they only run from the command-line tools.
//!
//! Row structs (`models.rs`) and table definitions (`schema.rs`) stay private
//! to this module; adapters translate them into domain types.
//!
//! # Example
//!
//! ```rust,no_run
//! use salesdesk::outbound::persistence::{DbPool, DieselCatalogueRepository, PoolConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/salesdesk")).await?;
//! let catalogue = DieselCatalogueRepository::new(pool);
//! # let _ = catalogue;
//! # Ok(())
//! # }
//! ```

mod diesel_catalogue_repository;
mod diesel_chat_history_repository;
mod diesel_error_mapping;
mod diesel_message_repository;
mod diesel_search_repository;
mod diesel_support_repository;
mod diesel_user_action_repository;
mod migrations;
mod models;
mod pool;
mod postgres_schema_snapshot_repository;
mod schema;

pub use diesel_catalogue_repository::DieselCatalogueRepository;
pub use diesel_chat_history_repository::DieselChatHistoryRepository;
pub use diesel_message_repository::DieselMessageRepository;
pub use diesel_search_repository::DieselSearchRepository;
pub use diesel_support_repository::DieselSupportRepository;
pub use diesel_user_action_repository::DieselUserActionRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
pub use postgres_schema_snapshot_repository::PostgresSchemaSnapshotRepository;
