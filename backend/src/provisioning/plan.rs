//! The ordered statements a provisioning run executes.
//!
//! Building a plan touches no database, so the exact DDL can be asserted in
//! unit tests. The migration step is not part of the plan; it comes from the
//! embedded Diesel migrations.

use std::fmt;

use zeroize::Zeroizing;

use super::identifiers::{RolePassword, SqlIdentifier};

/// Search and point-lookup indexes applied after grants.
pub const SEARCH_INDEXES_SQL: &str = include_str!("../../sql/search_indexes.sql");

/// Phases of a provisioning run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionStep {
    /// Drop and recreate the database and role as the admin.
    Bootstrap,
    /// Apply the schema migration as the application role.
    Migrate,
    /// Hand the schema to the application role.
    Grants,
    /// Create search indexes.
    Indexes,
}

impl ProvisionStep {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bootstrap => "bootstrap",
            Self::Migrate => "migrate",
            Self::Grants => "grants",
            Self::Indexes => "indexes",
        }
    }
}

impl fmt::Display for ProvisionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A statement and the text safe to show in logs and errors.
#[derive(Clone)]
pub struct SqlStatement {
    text: Zeroizing<String>,
    summary: Option<String>,
}

impl SqlStatement {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Zeroizing::new(text.into()),
            summary: None,
        }
    }

    /// A statement carrying a secret; only `summary` is ever displayed.
    pub fn secret(text: Zeroizing<String>, summary: impl Into<String>) -> Self {
        Self {
            text,
            summary: Some(summary.into()),
        }
    }

    /// The SQL to send to the server.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for SqlStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.summary {
            Some(summary) => f.write_str(summary),
            None => f.write_str(&self.text),
        }
    }
}

impl fmt::Debug for SqlStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SqlStatement")
            .field(&self.to_string())
            .finish()
    }
}

/// Database and role to (re)create.
#[derive(Debug, Clone)]
pub struct ProvisionTarget {
    pub database: SqlIdentifier,
    pub role: SqlIdentifier,
    pub password: RolePassword,
}

/// Statements for every SQL-driven step of a run.
#[derive(Debug, Clone)]
pub struct ProvisionPlan {
    bootstrap: Vec<SqlStatement>,
    grants: Vec<SqlStatement>,
    indexes: Vec<SqlStatement>,
}

impl ProvisionPlan {
    /// Build the plan for `target`; `with_indexes = false` leaves the index
    /// step empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use salesdesk::provisioning::{
    ///     ProvisionPlan, ProvisionStep, ProvisionTarget, RolePassword, SqlIdentifier,
    /// };
    ///
    /// let target = ProvisionTarget {
    ///     database: SqlIdentifier::parse("database name", "salesdesk").unwrap(),
    ///     role: SqlIdentifier::parse("role name", "salesdesk").unwrap(),
    ///     password: RolePassword::new("secret").unwrap(),
    /// };
    /// let plan = ProvisionPlan::new(&target, true);
    /// assert!(plan.statements(ProvisionStep::Bootstrap)[0].text().contains("pg_terminate_backend"));
    /// assert!(plan.statements(ProvisionStep::Migrate).is_empty());
    /// ```
    pub fn new(target: &ProvisionTarget, with_indexes: bool) -> Self {
        Self {
            bootstrap: bootstrap_statements(target),
            grants: grant_statements(target),
            indexes: if with_indexes {
                index_statements(SEARCH_INDEXES_SQL)
            } else {
                Vec::new()
            },
        }
    }

    /// Statements for `step`; the migrate step has none.
    pub fn statements(&self, step: ProvisionStep) -> &[SqlStatement] {
        match step {
            ProvisionStep::Bootstrap => &self.bootstrap,
            ProvisionStep::Migrate => &[],
            ProvisionStep::Grants => &self.grants,
            ProvisionStep::Indexes => &self.indexes,
        }
    }

    pub fn includes_indexes(&self) -> bool {
        !self.indexes.is_empty()
    }
}

fn bootstrap_statements(target: &ProvisionTarget) -> Vec<SqlStatement> {
    let database = &target.database;
    let role = &target.role;

    let mut create_role = Zeroizing::new(format!("CREATE ROLE {role} WITH LOGIN PASSWORD "));
    create_role.push_str(&target.password.to_sql_literal());

    vec![
        SqlStatement::new(format!(
            "SELECT pg_terminate_backend(pid) FROM pg_stat_activity \
             WHERE datname = {} AND pid <> pg_backend_pid()",
            database.as_literal()
        )),
        SqlStatement::new(format!("DROP DATABASE IF EXISTS {database} WITH (FORCE)")),
        SqlStatement::new(format!("DROP ROLE IF EXISTS {role}")),
        SqlStatement::secret(
            create_role,
            format!("CREATE ROLE {role} WITH LOGIN PASSWORD '***'"),
        ),
        SqlStatement::new(format!(
            "CREATE DATABASE {database} OWNER {role} ENCODING 'UTF8' TEMPLATE template0"
        )),
    ]
}

fn grant_statements(target: &ProvisionTarget) -> Vec<SqlStatement> {
    let database = &target.database;
    let role = &target.role;
    vec![
        SqlStatement::new(format!("ALTER DATABASE {database} OWNER TO {role}")),
        SqlStatement::new(format!("ALTER SCHEMA public OWNER TO {role}")),
        SqlStatement::new(format!("GRANT ALL PRIVILEGES ON DATABASE {database} TO {role}")),
        SqlStatement::new(format!("GRANT ALL ON ALL TABLES IN SCHEMA public TO {role}")),
        SqlStatement::new(format!("GRANT ALL ON ALL SEQUENCES IN SCHEMA public TO {role}")),
    ]
}

/// Split an index file into statements, dropping `--` comment lines.
pub fn index_statements(sql: &str) -> Vec<SqlStatement> {
    let without_comments: String = sql
        .lines()
        .filter(|line| !line.trim_start().starts_with("--"))
        .collect::<Vec<_>>()
        .join("\n");
    without_comments
        .split(';')
        .map(|statement| statement.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|statement| !statement.is_empty())
        .map(SqlStatement::new)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn target() -> ProvisionTarget {
        ProvisionTarget {
            database: SqlIdentifier::parse("database name", "kb").expect("database"),
            role: SqlIdentifier::parse("role name", "kb_app").expect("role"),
            password: RolePassword::new("o'clock").expect("password"),
        }
    }

    #[rstest]
    fn bootstrap_drops_before_creating(target: ProvisionTarget) {
        let plan = ProvisionPlan::new(&target, true);
        let texts: Vec<&str> = plan
            .statements(ProvisionStep::Bootstrap)
            .iter()
            .map(SqlStatement::text)
            .collect();

        assert_eq!(
            texts,
            vec![
                "SELECT pg_terminate_backend(pid) FROM pg_stat_activity \
                 WHERE datname = 'kb' AND pid <> pg_backend_pid()",
                "DROP DATABASE IF EXISTS kb WITH (FORCE)",
                "DROP ROLE IF EXISTS kb_app",
                "CREATE ROLE kb_app WITH LOGIN PASSWORD 'o''clock'",
                "CREATE DATABASE kb OWNER kb_app ENCODING 'UTF8' TEMPLATE template0",
            ]
        );
    }

    #[rstest]
    fn password_never_appears_in_display(target: ProvisionTarget) {
        let plan = ProvisionPlan::new(&target, false);
        let rendered: Vec<String> = plan
            .statements(ProvisionStep::Bootstrap)
            .iter()
            .map(|statement| format!("{statement} {statement:?}"))
            .collect();

        assert!(rendered.iter().all(|line| !line.contains("clock")));
        assert!(rendered.iter().any(|line| line.contains("PASSWORD '***'")));
    }

    #[rstest]
    fn grants_hand_schema_to_role(target: ProvisionTarget) {
        let plan = ProvisionPlan::new(&target, true);
        let grants = plan.statements(ProvisionStep::Grants);

        assert!(grants.iter().all(|statement| statement.text().contains("kb_app")));
        assert!(
            grants
                .iter()
                .any(|statement| statement.text() == "ALTER SCHEMA public OWNER TO kb_app")
        );
    }

    #[rstest]
    fn index_step_can_be_skipped(target: ProvisionTarget) {
        assert!(ProvisionPlan::new(&target, true).includes_indexes());
        let plan = ProvisionPlan::new(&target, false);
        assert!(!plan.includes_indexes());
        assert!(plan.statements(ProvisionStep::Indexes).is_empty());
    }

    #[rstest]
    fn index_file_splits_into_guarded_statements() {
        let statements = index_statements(SEARCH_INDEXES_SQL);

        assert_eq!(statements.len(), 17);
        assert!(
            statements
                .iter()
                .all(|statement| statement.text().starts_with("CREATE INDEX IF NOT EXISTS"))
        );
        assert!(statements.iter().any(|statement| {
            statement.text()
                == "CREATE INDEX IF NOT EXISTS idx_messages_fts ON messages \
                    USING GIN (to_tsvector('russian', content))"
        }));
    }

    #[rstest]
    fn index_splitting_ignores_comments_and_blank_statements() {
        let statements = index_statements("-- header; with semicolon\n\nCREATE INDEX a ON t (c);\n;\n");
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].text(), "CREATE INDEX a ON t (c)");
    }
}
