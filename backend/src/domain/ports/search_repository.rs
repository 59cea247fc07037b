//! Port for ranked full-text search.

use async_trait::async_trait;

use crate::domain::{SearchHit, SearchQuery, SearchScope};

use super::define_port_error;

define_port_error! {
    /// Errors raised by search adapters.
    pub enum SearchRepositoryError {
        /// Connection to the database failed.
        Connection { message: String } => "search connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "search query failed: {message}",
    }
}

/// Runs a normalised query against one scope.
///
/// Hits come back ordered by relevance, highest first, and never exceed the
/// query limit.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchRepository: Send + Sync {
    async fn search(
        &self,
        scope: SearchScope,
        query: SearchQuery,
    ) -> Result<Vec<SearchHit>, SearchRepositoryError>;
}

/// Fixture implementation that finds nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureSearchRepository;

#[async_trait]
impl SearchRepository for FixtureSearchRepository {
    async fn search(
        &self,
        _scope: SearchScope,
        _query: SearchQuery,
    ) -> Result<Vec<SearchHit>, SearchRepositoryError> {
        Ok(Vec::new())
    }
}
