//! Knowledge-base persistence for the sales and support chatbot.
//!
//! - [`domain`]: typed mirror of the schema, ports and services.
//! - [`outbound`]: Diesel and PostgreSQL adapters plus the search cache.
//! - [`provisioning`]: drop-and-recreate bootstrap of database, role and
//!   schema.
//! - [`config`]: environment-driven settings for the binaries.

pub mod config;
pub mod domain;
pub mod logging;
pub mod outbound;
pub mod provisioning;
