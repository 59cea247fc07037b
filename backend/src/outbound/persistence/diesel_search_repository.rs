//! PostgreSQL full-text search adapter.
//!
//! Each scope matches `plainto_tsquery('russian', $1)` against the same
//! `to_tsvector` expression its GIN index covers, and ranks hits with
//! `ts_rank_cd`.

use async_trait::async_trait;
use diesel::sql_types::{BigInt, Text};
use diesel_async::RunQueryDsl;

use crate::domain::ports::{SearchRepository, SearchRepositoryError};
use crate::domain::{SearchHit, SearchQuery, SearchScope};

use super::diesel_error_mapping::{Failure, FailureKind};
use super::models::SearchHitRow;
use super::pool::DbPool;

/// Table and indexed text expression for a scope.
fn scope_source(scope: SearchScope) -> (&'static str, &'static str) {
    match scope {
        SearchScope::Features => ("tariff_features", "name || ' ' || description"),
        SearchScope::Tariffs => ("sales_tariffs", "name || ' ' || description"),
        SearchScope::UseCases => (
            "tariff_use_cases",
            "scenario || ' ' || solution || ' ' || target_audience",
        ),
        SearchScope::GeneralQuestions => ("support_general", "question || ' ' || answer"),
        SearchScope::TariffQuestions => ("support_tariff_specific", "question || ' ' || answer"),
        SearchScope::Messages => ("messages", "content"),
    }
}

fn search_statement(scope: SearchScope) -> String {
    let (table, text) = scope_source(scope);
    format!(
        "SELECT id AS source_id, {text} AS content, \
         ts_rank_cd(to_tsvector('russian', {text}), plainto_tsquery('russian', $1)) AS relevance \
         FROM {table} \
         WHERE to_tsvector('russian', {text}) @@ plainto_tsquery('russian', $1) \
         ORDER BY relevance DESC, id \
         LIMIT $2"
    )
}

/// Diesel-backed implementation of [`SearchRepository`].
#[derive(Clone)]
pub struct DieselSearchRepository {
    pool: DbPool,
}

impl DieselSearchRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: impl Into<Failure>) -> SearchRepositoryError {
    let Failure { kind, message } = failure.into();
    match kind {
        FailureKind::Connection => SearchRepositoryError::connection(message),
        FailureKind::Conflict | FailureKind::Constraint | FailureKind::Query => {
            SearchRepositoryError::query(message)
        }
    }
}

#[async_trait]
impl SearchRepository for DieselSearchRepository {
    async fn search(
        &self,
        scope: SearchScope,
        query: SearchQuery,
    ) -> Result<Vec<SearchHit>, SearchRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let rows: Vec<SearchHitRow> = diesel::sql_query(search_statement(scope))
            .bind::<Text, _>(query.text())
            .bind::<BigInt, _>(i64::from(query.limit()))
            .load(&mut conn)
            .await
            .map_err(map_failure)?;
        Ok(rows
            .into_iter()
            .map(|row| SearchHit {
                source: scope,
                source_id: row.source_id,
                content: row.content,
                relevance: row.relevance,
            })
            .collect())
    }
}
