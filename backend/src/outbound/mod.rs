//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel and the
//!   blocking `postgres` client for catalogue introspection.
//! - **cache**: in-process LRU decorator for search results.
//!
//! Adapters translate between domain types and storage representations and
//! hold no business rules.

pub mod cache;
pub mod persistence;
