//! Drop and recreate the knowledge-base database, role, schema and indexes.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;
use ortho_config::OrthoConfig;
use salesdesk::config::ProvisionSettings;
use salesdesk::domain::ports::SchemaSnapshotRepository;
use salesdesk::logging::init_tracing;
use salesdesk::outbound::persistence::PostgresSchemaSnapshotRepository;
use salesdesk::provisioning::{ProvisionPlan, Provisioner, schema_fingerprint};
use tracing::{info, warn};

/// `salesdesk-provision` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "salesdesk-provision",
    about = "Drop and recreate the knowledge-base database from scratch",
    version
)]
struct CliArgs {
    /// Env file loaded before settings are read.
    #[arg(long = "env-file", value_name = "path", default_value = ".env")]
    env_file: PathBuf,
    /// Stop after grants without creating search indexes.
    #[arg(long = "skip-indexes")]
    skip_indexes: bool,
}

fn main() -> io::Result<()> {
    init_tracing();
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    load_env_file(&args.env_file)?;

    let settings = ProvisionSettings::load_from_iter([OsString::from("salesdesk-provision")])
        .map_err(|error| io::Error::other(format!("load provisioning settings: {error}")))?;
    let target = settings.target().map_err(io::Error::other)?;
    let connections = settings.connections(&target).map_err(io::Error::other)?;
    let target_url = connections.target_url.clone();

    info!(database = %target.database, role = %target.role, "provisioning");
    let plan = ProvisionPlan::new(&target, !args.skip_indexes);
    let report = Provisioner::new(connections, plan)
        .run()
        .map_err(io::Error::other)?;

    let diagram = PostgresSchemaSnapshotRepository::new(target_url.as_str())
        .load_schema_diagram()
        .map_err(|error| io::Error::other(format!("introspect schema: {error}")))?;

    println!("database={}", target.database);
    println!("role={}", target.role);
    println!("statements={}", report.statements_executed);
    println!("migrations={}", report.migrations_applied.join(","));
    println!("indexes={}", report.indexes_applied);
    println!("tables={}", diagram.tables.len());
    println!("schema_fingerprint={}", schema_fingerprint(&diagram));
    Ok(())
}

/// Load `path` into the process environment; a missing file is not an error.
fn load_env_file(path: &Path) -> io::Result<()> {
    match dotenvy::from_path(path) {
        Ok(()) => {
            info!(path = %path.display(), "loaded env file");
            Ok(())
        }
        Err(error) if error.not_found() => {
            warn!(path = %path.display(), "env file not found; using process environment");
            Ok(())
        }
        Err(error) => Err(io::Error::other(format!(
            "read env file '{}': {error}",
            path.display()
        ))),
    }
}
