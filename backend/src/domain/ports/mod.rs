//! Domain ports for the hexagonal boundary.
//!
//! Each port owns an error enum generated by `define_port_error!` and (in
//! tests) a `mockall` mock. Ports that domain services consume also carry a
//! fixture implementation for wiring those services without a database.

mod macros;
pub(crate) use macros::define_port_error;

mod catalogue_repository;
mod chat_history_repository;
mod message_repository;
mod schema_snapshot_repository;
mod search_repository;
mod support_repository;
mod user_action_repository;

#[cfg(test)]
pub use catalogue_repository::MockCatalogueRepository;
pub use catalogue_repository::{
    CatalogueRepository, CatalogueRepositoryError, FixtureCatalogueRepository,
};
#[cfg(test)]
pub use chat_history_repository::MockChatHistoryRepository;
pub use chat_history_repository::{ChatHistoryRepository, ChatHistoryRepositoryError};
#[cfg(test)]
pub use message_repository::MockMessageRepository;
pub use message_repository::{MessageRepository, MessageRepositoryError};
#[cfg(test)]
pub use schema_snapshot_repository::MockSchemaSnapshotRepository;
pub use schema_snapshot_repository::{SchemaSnapshotRepository, SchemaSnapshotRepositoryError};
#[cfg(test)]
pub use search_repository::MockSearchRepository;
pub use search_repository::{FixtureSearchRepository, SearchRepository, SearchRepositoryError};
#[cfg(test)]
pub use support_repository::MockSupportRepository;
pub use support_repository::{
    FixtureSupportRepository, SupportRepository, SupportRepositoryError,
};
#[cfg(test)]
pub use user_action_repository::MockUserActionRepository;
pub use user_action_repository::{
    FixtureUserActionRepository, UserActionRepository, UserActionRepositoryError,
};
