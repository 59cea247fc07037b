//! Database reset, migration and index helpers for integration tests.
//!
//! Resets go through the `postgres` client because `DROP DATABASE` cannot run
//! inside the transactions Diesel opens.

use pg_embedded_setup_unpriv::TestCluster;
use postgres::{Client, NoTls};
use salesdesk::outbound::persistence::run_pending_migrations;
use salesdesk::provisioning::{SEARCH_INDEXES_SQL, index_statements};

use super::format_postgres_error;

/// Drop and recreate `name` on the cluster.
pub fn reset_database(cluster: &TestCluster, name: &str) -> Result<(), String> {
    let admin_url = cluster.connection().database_url("postgres");
    let mut client =
        Client::connect(&admin_url, NoTls).map_err(|err| format_postgres_error(&err))?;
    client
        .batch_execute(&format!(
            "DROP DATABASE IF EXISTS {name} WITH (FORCE); CREATE DATABASE {name};"
        ))
        .map_err(|err| format_postgres_error(&err))
}

/// Apply the embedded schema migration.
pub fn migrate_schema(url: &str) -> Result<(), String> {
    run_pending_migrations(url)
        .map(|_| ())
        .map_err(|err| format!("migration: {err}"))
}

/// Apply the search index file statement by statement.
pub fn apply_search_indexes(url: &str) -> Result<(), String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    for statement in index_statements(SEARCH_INDEXES_SQL) {
        client
            .batch_execute(statement.text())
            .map_err(|err| format!("{statement}: {}", format_postgres_error(&err)))?;
    }
    Ok(())
}

/// Run one statement, returning the formatted server error on failure.
pub fn execute(url: &str, sql: &str) -> Result<u64, String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    client
        .execute(sql, &[])
        .map_err(|err| format_postgres_error(&err))
}

/// Start a cluster and return it with the URL of a freshly migrated and
/// indexed database called `name`.
pub fn prepared_database(name: &str) -> Result<(TestCluster, String), String> {
    let cluster = super::test_cluster()?;
    reset_database(&cluster, name)?;
    let url = cluster.connection().database_url(name);
    migrate_schema(&url)?;
    apply_search_indexes(&url)?;
    Ok((cluster, url))
}
