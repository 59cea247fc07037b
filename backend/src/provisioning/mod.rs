//! Development bootstrap for the knowledge-base database.
//!
//! A run drops and recreates the database and its owning role, applies the
//! embedded schema migration, hands ownership to the role and finally creates
//! the search indexes. Every step is fail-fast. Running it twice against the
//! same server yields the same schema.

mod error;
mod fingerprint;
mod identifiers;
mod plan;
mod runner;

pub use error::ProvisionError;
pub use fingerprint::schema_fingerprint;
pub use identifiers::{IdentifierError, MAX_IDENTIFIER_LEN, RolePassword, SqlIdentifier};
pub use plan::{
    ProvisionPlan, ProvisionStep, ProvisionTarget, SEARCH_INDEXES_SQL, SqlStatement,
    index_statements,
};
pub use runner::{
    ProvisionConnections, ProvisionReport, Provisioner, StatementExecutor, apply_statements,
};
