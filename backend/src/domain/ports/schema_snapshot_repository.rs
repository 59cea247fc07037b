//! Port for introspecting the provisioned schema.

use crate::domain::er_diagram::SchemaDiagram;

use super::define_port_error;

define_port_error! {
    /// Errors raised while reading schema metadata.
    pub enum SchemaSnapshotRepositoryError {
        /// Connection to the database failed.
        Connection { message: String } => "schema snapshot connection failed: {message}",
        /// Catalogue query failed.
        Query { message: String } => "schema snapshot query failed: {message}",
    }
}

/// Reads tables, keys, indexes and checks of the `public` schema.
#[cfg_attr(test, mockall::automock)]
pub trait SchemaSnapshotRepository: Send + Sync {
    fn load_schema_diagram(&self) -> Result<SchemaDiagram, SchemaSnapshotRepositoryError>;
}
