//! Stable digests of an introspected schema.

use sha2::{Digest, Sha256};

use crate::domain::{SchemaDiagram, render_mermaid_er_diagram};

/// SHA-256 over the rendered diagram, index definitions and check
/// constraints of the normalised snapshot.
///
/// Two provisioning runs that produce the same schema produce the same
/// fingerprint; constraint names generated by PostgreSQL are part of it.
pub fn schema_fingerprint(diagram: &SchemaDiagram) -> String {
    let diagram = diagram.normalized();
    let mut hasher = Sha256::new();
    hasher.update(render_mermaid_er_diagram(&diagram).as_bytes());
    for table in &diagram.tables {
        for column in &table.columns {
            let line = format!(
                "column {}.{} null={}\n",
                table.name, column.name, column.is_nullable
            );
            hasher.update(line.as_bytes());
        }
    }
    for index in &diagram.indexes {
        hasher.update(format!("index {} {}\n", index.name, index.definition).as_bytes());
    }
    for check in &diagram.checks {
        let line = format!("check {}.{} {}\n", check.table, check.name, check.definition);
        hasher.update(line.as_bytes());
    }
    hex::encode(hasher.finalize())
}
