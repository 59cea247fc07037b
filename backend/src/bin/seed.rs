//! Load a knowledge-pack JSON document into the knowledge base.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io;
use std::sync::Arc;

use camino::Utf8PathBuf;
use catalogue_seed::KnowledgePack;
use clap::Parser;
use salesdesk::config::resolve_database_url;
use salesdesk::domain::KnowledgePackSeeder;
use salesdesk::logging::init_tracing;
use salesdesk::outbound::persistence::{
    DbPool, DieselCatalogueRepository, DieselSupportRepository, PoolConfig,
};
use tokio::runtime::Builder;

/// `salesdesk-seed` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "salesdesk-seed",
    about = "Seed tariffs, features and support questions from a knowledge pack",
    version
)]
struct CliArgs {
    /// Path to the knowledge-pack JSON document.
    #[arg(long = "pack", value_name = "path")]
    pack: Utf8PathBuf,
    /// Database connection URL. Falls back to `DATABASE_URL` when omitted.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn main() -> io::Result<()> {
    init_tracing();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let pack = KnowledgePack::from_file(&args.pack)
        .map_err(|error| io::Error::other(format!("load knowledge pack: {error}")))?;

    let database_url = resolve_database_url(args.database_url).map_err(io::Error::other)?;
    let pool = DbPool::new(PoolConfig::new(&database_url))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;

    let seeder = KnowledgePackSeeder::new(
        Arc::new(DieselCatalogueRepository::new(pool.clone())),
        Arc::new(DieselSupportRepository::new(pool)),
    );
    let outcome = seeder
        .seed(&pack)
        .await
        .map_err(|error| io::Error::other(format!("seed knowledge pack: {error}")))?;

    println!("features={}", outcome.features);
    println!("tariffs={}", outcome.tariffs);
    println!("support_categories={}", outcome.support.categories);
    println!("support_questions={}", outcome.support.questions);
    println!("support_relations={}", outcome.support.relations);
    Ok(())
}
