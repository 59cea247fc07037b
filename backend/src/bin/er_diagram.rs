//! Print the live schema as a Mermaid ER diagram.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), forbid(clippy::expect_used))]

use std::io;

use clap::Parser;
use salesdesk::config::resolve_database_url;
use salesdesk::domain::ports::SchemaSnapshotRepository;
use salesdesk::domain::render_mermaid_er_diagram;
use salesdesk::outbound::persistence::PostgresSchemaSnapshotRepository;

/// `salesdesk-er` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "salesdesk-er",
    about = "Render the knowledge-base schema as a Mermaid ER diagram",
    version
)]
struct CliArgs {
    /// Database connection URL. Falls back to `DATABASE_URL` when omitted.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let database_url = resolve_database_url(args.database_url).map_err(io::Error::other)?;

    let diagram = PostgresSchemaSnapshotRepository::new(database_url)
        .load_schema_diagram()
        .map_err(|error| io::Error::other(format!("introspect schema: {error}")))?;

    print!("{}", render_mermaid_er_diagram(&diagram));
    Ok(())
}
