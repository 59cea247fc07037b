//! Schema introspection over `pg_catalog` using the synchronous client.

use std::collections::BTreeMap;

use postgres::{Client, NoTls};

use crate::domain::er_diagram::{
    SchemaCheck, SchemaColumn, SchemaDiagram, SchemaIndex, SchemaRelationship, SchemaTable,
};
use crate::domain::ports::{SchemaSnapshotRepository, SchemaSnapshotRepositoryError};

const TABLES_SQL: &str = concat!(
    "SELECT cls.relname AS table_name ",
    "FROM pg_catalog.pg_class cls ",
    "JOIN pg_catalog.pg_namespace ns ON ns.oid = cls.relnamespace ",
    "WHERE ns.nspname = 'public' AND cls.relkind IN ('r', 'p') ",
    "  AND cls.relname <> '__diesel_schema_migrations' ",
    "ORDER BY cls.relname"
);

const COLUMNS_SQL: &str = concat!(
    "SELECT cls.relname AS table_name, attr.attname AS column_name, ",
    "  pg_catalog.format_type(attr.atttypid, attr.atttypmod) AS data_type, ",
    "  NOT attr.attnotnull AS is_nullable, ",
    "  EXISTS (SELECT 1 FROM pg_catalog.pg_index idx ",
    "          WHERE idx.indrelid = cls.oid AND idx.indisprimary ",
    "            AND attr.attnum = ANY(idx.indkey)) AS is_primary_key ",
    "FROM pg_catalog.pg_attribute attr ",
    "JOIN pg_catalog.pg_class cls ON cls.oid = attr.attrelid ",
    "JOIN pg_catalog.pg_namespace ns ON ns.oid = cls.relnamespace ",
    "WHERE ns.nspname = 'public' AND cls.relkind IN ('r', 'p') ",
    "  AND attr.attnum > 0 AND NOT attr.attisdropped ",
    "ORDER BY cls.relname, attr.attnum"
);

const FOREIGN_KEYS_SQL: &str = concat!(
    "SELECT source.relname AS referencing_table, source_attr.attname AS referencing_column, ",
    "  target.relname AS referenced_table, target_attr.attname AS referenced_column, ",
    "  NOT source_attr.attnotnull AS referencing_is_nullable ",
    "FROM pg_catalog.pg_constraint con ",
    "JOIN pg_catalog.pg_class source ON source.oid = con.conrelid ",
    "JOIN pg_catalog.pg_namespace ns ON ns.oid = source.relnamespace ",
    "JOIN pg_catalog.pg_class target ON target.oid = con.confrelid ",
    "JOIN unnest(con.conkey) WITH ORDINALITY AS source_key(attnum, ord) ON TRUE ",
    "JOIN unnest(con.confkey) WITH ORDINALITY AS target_key(attnum, ord) ",
    "  ON source_key.ord = target_key.ord ",
    "JOIN pg_catalog.pg_attribute source_attr ",
    "  ON source_attr.attrelid = source.oid AND source_attr.attnum = source_key.attnum ",
    "JOIN pg_catalog.pg_attribute target_attr ",
    "  ON target_attr.attrelid = target.oid AND target_attr.attnum = target_key.attnum ",
    "WHERE con.contype = 'f' AND ns.nspname = 'public' ",
    "ORDER BY source.relname, source_attr.attname, con.conname"
);

const INDEXES_SQL: &str = concat!(
    "SELECT tablename AS table_name, indexname AS index_name, indexdef AS definition ",
    "FROM pg_catalog.pg_indexes ",
    "WHERE schemaname = 'public' AND tablename <> '__diesel_schema_migrations' ",
    "ORDER BY tablename, indexname"
);

const CHECKS_SQL: &str = concat!(
    "SELECT cls.relname AS table_name, con.conname AS constraint_name, ",
    "  pg_catalog.pg_get_constraintdef(con.oid) AS definition ",
    "FROM pg_catalog.pg_constraint con ",
    "JOIN pg_catalog.pg_class cls ON cls.oid = con.conrelid ",
    "JOIN pg_catalog.pg_namespace ns ON ns.oid = cls.relnamespace ",
    "WHERE con.contype = 'c' AND ns.nspname = 'public' ",
    "ORDER BY cls.relname, con.conname"
);

/// Reads the `public` schema layout from PostgreSQL system catalogs.
#[derive(Debug, Clone)]
pub struct PostgresSchemaSnapshotRepository {
    database_url: String,
}

impl PostgresSchemaSnapshotRepository {
    /// Construct a repository from a connection URL; nothing connects until
    /// a snapshot is loaded.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use salesdesk::outbound::persistence::PostgresSchemaSnapshotRepository;
    ///
    /// let repository =
    ///     PostgresSchemaSnapshotRepository::new("postgres://salesdesk@localhost/salesdesk");
    /// let _ = repository;
    /// ```
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
        }
    }
}

fn query_error(error: postgres::Error) -> SchemaSnapshotRepositoryError {
    SchemaSnapshotRepositoryError::query(error.to_string())
}

impl SchemaSnapshotRepository for PostgresSchemaSnapshotRepository {
    fn load_schema_diagram(&self) -> Result<SchemaDiagram, SchemaSnapshotRepositoryError> {
        let mut client = Client::connect(&self.database_url, NoTls)
            .map_err(|error| SchemaSnapshotRepositoryError::connection(error.to_string()))?;

        let mut columns_by_table: BTreeMap<String, Vec<SchemaColumn>> = BTreeMap::new();
        for row in client.query(COLUMNS_SQL, &[]).map_err(query_error)? {
            columns_by_table
                .entry(row.get("table_name"))
                .or_default()
                .push(SchemaColumn {
                    name: row.get("column_name"),
                    data_type: row.get("data_type"),
                    is_primary_key: row.get("is_primary_key"),
                    is_nullable: row.get("is_nullable"),
                });
        }

        let tables = client
            .query(TABLES_SQL, &[])
            .map_err(query_error)?
            .into_iter()
            .map(|row| {
                let name: String = row.get("table_name");
                let columns = columns_by_table.remove(&name).unwrap_or_default();
                SchemaTable { name, columns }
            })
            .collect();

        let relationships = client
            .query(FOREIGN_KEYS_SQL, &[])
            .map_err(query_error)?
            .into_iter()
            .map(|row| SchemaRelationship {
                referencing_table: row.get("referencing_table"),
                referencing_column: row.get("referencing_column"),
                referenced_table: row.get("referenced_table"),
                referenced_column: row.get("referenced_column"),
                referencing_is_nullable: row.get("referencing_is_nullable"),
            })
            .collect();

        let indexes = client
            .query(INDEXES_SQL, &[])
            .map_err(query_error)?
            .into_iter()
            .map(|row| SchemaIndex {
                table: row.get("table_name"),
                name: row.get("index_name"),
                definition: row.get("definition"),
            })
            .collect();

        let checks = client
            .query(CHECKS_SQL, &[])
            .map_err(query_error)?
            .into_iter()
            .map(|row| SchemaCheck {
                table: row.get("table_name"),
                name: row.get("constraint_name"),
                definition: row.get("definition"),
            })
            .collect();

        Ok(SchemaDiagram {
            tables,
            relationships,
            indexes,
            checks,
        })
    }
}
