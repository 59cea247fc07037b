//! Schema snapshots and their Mermaid ER rendering.
//!
//! A snapshot captures what provisioning produced: tables with typed columns,
//! foreign keys, indexes and check constraints. Two snapshots taken after
//! separate provisioning runs compare equal once normalised, which is how
//! re-running the bootstrap is shown to be idempotent.

use std::collections::BTreeSet;
use std::fmt::Write as _;

/// Introspected layout of the `public` schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaDiagram {
    pub tables: Vec<SchemaTable>,
    pub relationships: Vec<SchemaRelationship>,
    pub indexes: Vec<SchemaIndex>,
    pub checks: Vec<SchemaCheck>,
}

impl SchemaDiagram {
    /// Return a copy with every collection in a deterministic order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use salesdesk::domain::{SchemaDiagram, SchemaTable};
    ///
    /// let diagram = SchemaDiagram {
    ///     tables: vec![
    ///         SchemaTable { name: "user_actions".to_owned(), columns: vec![] },
    ///         SchemaTable { name: "chat_history".to_owned(), columns: vec![] },
    ///     ],
    ///     ..SchemaDiagram::default()
    /// };
    ///
    /// assert_eq!(diagram.normalized().tables[0].name, "chat_history");
    /// ```
    pub fn normalized(&self) -> Self {
        let mut tables = self.tables.clone();
        for table in &mut tables {
            table.columns.sort_by(|a, b| a.name.cmp(&b.name));
        }
        tables.sort_by(|a, b| a.name.cmp(&b.name));

        let mut relationships = self.relationships.clone();
        relationships.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

        let mut indexes = self.indexes.clone();
        indexes.sort_by(|a, b| (&a.table, &a.name).cmp(&(&b.table, &b.name)));

        let mut checks = self.checks.clone();
        checks.sort_by(|a, b| (&a.table, &a.name).cmp(&(&b.table, &b.name)));

        Self {
            tables,
            relationships,
            indexes,
            checks,
        }
    }

    /// Look up a table by name.
    pub fn table(&self, name: &str) -> Option<&SchemaTable> {
        self.tables.iter().find(|table| table.name == name)
    }

    /// Names of all indexes on `table`.
    pub fn index_names(&self, table: &str) -> BTreeSet<&str> {
        self.indexes
            .iter()
            .filter(|index| index.table == table)
            .map(|index| index.name.as_str())
            .collect()
    }
}

/// A table and its columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaTable {
    pub name: String,
    pub columns: Vec<SchemaColumn>,
}

impl SchemaTable {
    pub fn column(&self, name: &str) -> Option<&SchemaColumn> {
        self.columns.iter().find(|column| column.name == name)
    }
}

/// A column as reported by `format_type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaColumn {
    pub name: String,
    pub data_type: String,
    pub is_primary_key: bool,
    pub is_nullable: bool,
}

/// A single-column foreign key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaRelationship {
    pub referencing_table: String,
    pub referencing_column: String,
    pub referenced_table: String,
    pub referenced_column: String,
    pub referencing_is_nullable: bool,
}

impl SchemaRelationship {
    fn sort_key(&self) -> (&str, &str, &str, &str) {
        (
            self.referenced_table.as_str(),
            self.referencing_table.as_str(),
            self.referenced_column.as_str(),
            self.referencing_column.as_str(),
        )
    }
}

/// An index with its `pg_get_indexdef` text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaIndex {
    pub table: String,
    pub name: String,
    pub definition: String,
}

/// A `CHECK` constraint with its `pg_get_constraintdef` text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaCheck {
    pub table: String,
    pub name: String,
    pub definition: String,
}

/// Render the tables and foreign keys as a Mermaid `erDiagram`.
///
/// Foreign-key columns are marked `FK`; nullable references render with the
/// optional-many cardinality.
///
/// # Examples
///
/// ```rust
/// use salesdesk::domain::{
///     SchemaColumn, SchemaDiagram, SchemaRelationship, SchemaTable, render_mermaid_er_diagram,
/// };
///
/// let column = |name: &str, pk: bool| SchemaColumn {
///     name: name.to_owned(),
///     data_type: "integer".to_owned(),
///     is_primary_key: pk,
///     is_nullable: false,
/// };
/// let diagram = SchemaDiagram {
///     tables: vec![
///         SchemaTable { name: "sales_tariffs".to_owned(), columns: vec![column("id", true)] },
///         SchemaTable { name: "tariff_use_cases".to_owned(), columns: vec![column("tariff_id", false)] },
///     ],
///     relationships: vec![SchemaRelationship {
///         referencing_table: "tariff_use_cases".to_owned(),
///         referencing_column: "tariff_id".to_owned(),
///         referenced_table: "sales_tariffs".to_owned(),
///         referenced_column: "id".to_owned(),
///         referencing_is_nullable: false,
///     }],
///     ..SchemaDiagram::default()
/// };
///
/// assert!(render_mermaid_er_diagram(&diagram).contains("SalesTariffs ||--|{ TariffUseCases"));
/// ```
pub fn render_mermaid_er_diagram(diagram: &SchemaDiagram) -> String {
    let diagram = diagram.normalized();
    let foreign_keys: BTreeSet<(&str, &str)> = diagram
        .relationships
        .iter()
        .map(|rel| (rel.referencing_table.as_str(), rel.referencing_column.as_str()))
        .collect();

    let mut out = String::from("erDiagram\n");
    for table in &diagram.tables {
        let _ = writeln!(out, "  {} {{", to_pascal_case(&table.name));
        for column in &table.columns {
            let mut keys = Vec::new();
            if column.is_primary_key {
                keys.push("PK");
            }
            if foreign_keys.contains(&(table.name.as_str(), column.name.as_str())) {
                keys.push("FK");
            }
            let _ = write!(
                out,
                "    {} {}",
                mermaid_type(&column.data_type),
                column.name
            );
            if !keys.is_empty() {
                let _ = write!(out, " {}", keys.join(","));
            }
            out.push('\n');
        }
        out.push_str("  }\n\n");
    }

    for rel in &diagram.relationships {
        let cardinality = if rel.referencing_is_nullable {
            "||--o{"
        } else {
            "||--|{"
        };
        let _ = writeln!(
            out,
            "  {} {cardinality} {} : \"{} -> {}\"",
            to_pascal_case(&rel.referenced_table),
            to_pascal_case(&rel.referencing_table),
            rel.referencing_column,
            rel.referenced_column,
        );
    }

    out
}

fn to_pascal_case(value: &str) -> String {
    let pascal: String = value
        .split('_')
        .filter(|part| !part.is_empty())
        .flat_map(|part| {
            let mut chars = part.chars();
            chars
                .next()
                .into_iter()
                .flat_map(char::to_uppercase)
                .chain(chars)
        })
        .collect();
    if pascal.is_empty() {
        value.to_owned()
    } else {
        pascal
    }
}

/// Mermaid attribute types must be single words; `topic_tag[]` becomes
/// `topic_tag_array` and `timestamp with time zone` becomes
/// `timestamp_with_time_zone`.
fn mermaid_type(data_type: &str) -> String {
    let expanded = data_type.replace("[]", " array");
    let words: Vec<String> = expanded
        .split(|c: char| !c.is_ascii_alphanumeric() && c != '_')
        .filter(|word| !word.is_empty())
        .map(str::to_ascii_lowercase)
        .collect();
    if words.is_empty() {
        "unknown".to_owned()
    } else {
        words.join("_")
    }
}
