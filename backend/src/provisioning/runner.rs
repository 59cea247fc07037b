//! Executes a [`ProvisionPlan`] against a live server.
//!
//! Each step opens its own connection: bootstrap and grants run as the admin
//! role, the migration and indexes run as the application role so it owns
//! what it creates. The first failing statement aborts the run.

use postgres::{Client, NoTls};
use tracing::{debug, info};
use zeroize::Zeroizing;

use super::error::ProvisionError;
use super::plan::{ProvisionPlan, ProvisionStep, SqlStatement};
use crate::outbound::persistence::run_pending_migrations;

/// Connection strings used by a run.
#[derive(Clone)]
pub struct ProvisionConnections {
    /// Admin role on the maintenance database.
    pub admin_url: Zeroizing<String>,
    /// Admin role on the provisioned database.
    pub admin_target_url: Zeroizing<String>,
    /// Application role on the provisioned database.
    pub target_url: Zeroizing<String>,
}

/// Something that executes one statement at a time.
pub trait StatementExecutor {
    /// Run `sql`, returning the server's message on failure.
    fn execute(&mut self, sql: &str) -> Result<(), String>;
}

impl StatementExecutor for Client {
    fn execute(&mut self, sql: &str) -> Result<(), String> {
        self.batch_execute(sql).map_err(|error| match error.as_db_error() {
            Some(db) => db.message().to_owned(),
            None => error.to_string(),
        })
    }
}

/// Execute `statements` in order, stopping at the first failure.
///
/// # Errors
///
/// Returns [`ProvisionError::Statement`] naming the failing statement.
pub fn apply_statements(
    executor: &mut impl StatementExecutor,
    step: ProvisionStep,
    statements: &[SqlStatement],
) -> Result<usize, ProvisionError> {
    for statement in statements {
        debug!(%step, %statement, "executing");
        executor
            .execute(statement.text())
            .map_err(|message| ProvisionError::Statement {
                step,
                statement: statement.to_string(),
                message,
            })?;
    }
    Ok(statements.len())
}

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionReport {
    pub statements_executed: usize,
    pub migrations_applied: Vec<String>,
    pub indexes_applied: bool,
}

/// Runs every step of a plan.
pub struct Provisioner {
    connections: ProvisionConnections,
    plan: ProvisionPlan,
}

impl Provisioner {
    pub fn new(connections: ProvisionConnections, plan: ProvisionPlan) -> Self {
        Self { connections, plan }
    }

    /// Drop and rebuild the database, schema, grants and indexes.
    ///
    /// # Errors
    ///
    /// Returns the first [`ProvisionError`] encountered; earlier steps are
    /// not rolled back.
    pub fn run(&self) -> Result<ProvisionReport, ProvisionError> {
        let mut executed = 0;

        executed += self.run_step(ProvisionStep::Bootstrap, &self.connections.admin_url)?;

        info!(step = %ProvisionStep::Migrate, "applying schema migration");
        let migrations_applied =
            run_pending_migrations(&self.connections.target_url).map_err(|error| {
                ProvisionError::Migration {
                    step: ProvisionStep::Migrate,
                    message: error.to_string(),
                }
            })?;
        info!(step = %ProvisionStep::Migrate, applied = migrations_applied.len(), "step complete");

        executed += self.run_step(ProvisionStep::Grants, &self.connections.admin_target_url)?;

        let indexes_applied = self.plan.includes_indexes();
        if indexes_applied {
            executed += self.run_step(ProvisionStep::Indexes, &self.connections.target_url)?;
        } else {
            info!(step = %ProvisionStep::Indexes, "skipped");
        }

        Ok(ProvisionReport {
            statements_executed: executed,
            migrations_applied,
            indexes_applied,
        })
    }

    fn run_step(&self, step: ProvisionStep, url: &str) -> Result<usize, ProvisionError> {
        info!(%step, "starting step");
        let mut client =
            Client::connect(url, NoTls).map_err(|error| ProvisionError::Connection {
                step,
                message: error.to_string(),
            })?;
        let count = apply_statements(&mut client, step, self.plan.statements(step))?;
        info!(%step, statements = count, "step complete");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Default)]
    struct RecordingExecutor {
        executed: Vec<String>,
        fail_on: Option<usize>,
    }

    impl StatementExecutor for RecordingExecutor {
        fn execute(&mut self, sql: &str) -> Result<(), String> {
            if self.fail_on == Some(self.executed.len()) {
                return Err("role \"kb_app\" already exists".to_owned());
            }
            self.executed.push(sql.to_owned());
            Ok(())
        }
    }

    fn statements() -> Vec<SqlStatement> {
        vec![
            SqlStatement::new("DROP ROLE IF EXISTS kb_app"),
            SqlStatement::secret(
                Zeroizing::new("CREATE ROLE kb_app WITH LOGIN PASSWORD 'pw'".to_owned()),
                "CREATE ROLE kb_app WITH LOGIN PASSWORD '***'",
            ),
            SqlStatement::new("CREATE DATABASE kb OWNER kb_app"),
        ]
    }

    #[rstest]
    fn executes_every_statement_in_order() {
        let mut executor = RecordingExecutor::default();
        let count = apply_statements(&mut executor, ProvisionStep::Bootstrap, &statements())
            .expect("all statements succeed");

        assert_eq!(count, 3);
        assert_eq!(executor.executed[2], "CREATE DATABASE kb OWNER kb_app");
    }

    #[rstest]
    fn stops_at_first_failure_without_leaking_password() {
        let mut executor = RecordingExecutor {
            fail_on: Some(1),
            ..RecordingExecutor::default()
        };
        let err = apply_statements(&mut executor, ProvisionStep::Bootstrap, &statements())
            .expect_err("second statement fails");

        assert_eq!(executor.executed.len(), 1, "later statements must not run");
        assert_eq!(err.step(), Some(ProvisionStep::Bootstrap));
        let message = err.to_string();
        assert!(message.starts_with("bootstrap: `CREATE ROLE kb_app WITH LOGIN PASSWORD '***'`"));
        assert!(message.contains("already exists"));
        assert!(!message.contains("'pw'"));
    }
}
