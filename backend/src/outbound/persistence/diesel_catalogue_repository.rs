//! PostgreSQL-backed commercial catalogue adapter.
//!
//! Saves run in one transaction per call. Reads assemble tariff overviews
//! from three queries (tariffs, included features, use cases) and order them
//! in Rust, because the price column is text and sorts lexically in SQL.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{CatalogueRepository, CatalogueRepositoryError};
use crate::domain::{
    Feature, FeatureDraft, FeatureId, IncludedFeature, TariffBundle, TariffId, TariffOverview,
    UseCase, UserLimit, sort_tariffs_by_price,
};

use super::diesel_error_mapping::{Failure, FailureKind};
use super::models::{
    FeatureRow, NewFeatureRow, NewTariffFeatureRow, NewTariffQuestionRow, NewTariffRow,
    NewUseCaseRow, TariffRow, UseCaseRow,
};
use super::pool::DbPool;
use super::schema::{
    sales_tariffs, support_tariff_specific, tariff_feature_relations, tariff_features,
    tariff_use_cases,
};

/// Diesel-backed implementation of [`CatalogueRepository`].
#[derive(Clone)]
pub struct DieselCatalogueRepository {
    pool: DbPool,
}

impl DieselCatalogueRepository {
    /// Create a repository over `pool`.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use salesdesk::outbound::persistence::{DbPool, DieselCatalogueRepository, PoolConfig};
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost/salesdesk")).await?;
    /// let repository = DieselCatalogueRepository::new(pool);
    /// # let _ = repository;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: impl Into<Failure>) -> CatalogueRepositoryError {
    let Failure { kind, message } = failure.into();
    match kind {
        FailureKind::Connection => CatalogueRepositoryError::connection(message),
        FailureKind::Conflict => CatalogueRepositoryError::conflict(message),
        FailureKind::Constraint => CatalogueRepositoryError::constraint_violation(message),
        FailureKind::Query => CatalogueRepositoryError::query(message),
    }
}

fn feature_from_row(row: FeatureRow) -> Result<Feature, CatalogueRepositoryError> {
    let category = row
        .category
        .parse()
        .map_err(|err: crate::domain::ParseFeatureCategoryError| {
            CatalogueRepositoryError::invalid_data(err.to_string())
        })?;
    Ok(Feature {
        id: FeatureId::new(row.id),
        name: row.name,
        description: row.description,
        category,
        created_at: row.created_at,
    })
}

fn overview_from_parts(
    row: TariffRow,
    features: Vec<IncludedFeature>,
    use_cases: Vec<UseCase>,
) -> Result<TariffOverview, CatalogueRepositoryError> {
    let price = row.price.parse().map_err(|err: crate::domain::ParsePriceError| {
        CatalogueRepositoryError::invalid_data(format!("tariff '{}': {err}", row.name))
    })?;
    let user_limit = row
        .user_limit
        .map(UserLimit::new)
        .transpose()
        .map_err(|err| {
            CatalogueRepositoryError::invalid_data(format!("tariff '{}': {err}", row.name))
        })?;
    Ok(TariffOverview {
        id: TariffId::new(row.id),
        name: row.name,
        price,
        user_limit,
        description: row.description,
        features,
        use_cases,
    })
}

/// Load features and use cases for `rows` and build overviews.
async fn assemble_overviews(
    conn: &mut AsyncPgConnection,
    rows: Vec<TariffRow>,
) -> Result<Vec<TariffOverview>, CatalogueRepositoryError> {
    let ids: Vec<i32> = rows.iter().map(|row| row.id).collect();

    let feature_rows: Vec<(i32, Option<bool>, FeatureRow)> = tariff_feature_relations::table
        .inner_join(tariff_features::table)
        .filter(tariff_feature_relations::tariff_id.eq_any(&ids))
        .order_by((tariff_features::category, tariff_features::name))
        .select((
            tariff_feature_relations::tariff_id,
            tariff_feature_relations::is_premium,
            FeatureRow::as_select(),
        ))
        .load(conn)
        .await
        .map_err(map_failure)?;

    let use_case_rows: Vec<UseCaseRow> = tariff_use_cases::table
        .filter(tariff_use_cases::tariff_id.eq_any(&ids))
        .order_by(tariff_use_cases::id)
        .select(UseCaseRow::as_select())
        .load(conn)
        .await
        .map_err(map_failure)?;

    let mut features_by_tariff: HashMap<i32, Vec<IncludedFeature>> = HashMap::new();
    for (tariff_id, is_premium, row) in feature_rows {
        let feature = feature_from_row(row)?;
        features_by_tariff
            .entry(tariff_id)
            .or_default()
            .push(IncludedFeature {
                id: feature.id,
                name: feature.name,
                description: feature.description,
                category: feature.category,
                is_premium: is_premium.unwrap_or(false),
            });
    }

    let mut use_cases_by_tariff: HashMap<i32, Vec<UseCase>> = HashMap::new();
    for row in use_case_rows {
        let Some(tariff_id) = row.tariff_id else {
            continue;
        };
        use_cases_by_tariff
            .entry(tariff_id)
            .or_default()
            .push(UseCase {
                scenario: row.scenario,
                solution: row.solution,
                target_audience: row.target_audience,
            });
    }

    let mut overviews = rows
        .into_iter()
        .map(|row| {
            let features = features_by_tariff.remove(&row.id).unwrap_or_default();
            let use_cases = use_cases_by_tariff.remove(&row.id).unwrap_or_default();
            overview_from_parts(row, features, use_cases)
        })
        .collect::<Result<Vec<_>, _>>()?;
    sort_tariffs_by_price(&mut overviews);
    Ok(overviews)
}

/// Insert one tariff and everything hanging off it.
async fn insert_bundle(
    conn: &mut AsyncPgConnection,
    bundle: &TariffBundle,
) -> Result<i32, diesel::result::Error> {
    let tariff = &bundle.tariff;
    let tariff_id = diesel::insert_into(sales_tariffs::table)
        .values(NewTariffRow {
            name: tariff.name.as_str(),
            price: tariff.price.to_string(),
            user_limit: tariff.user_limit.map(UserLimit::get),
            description: tariff.description.as_str(),
        })
        .returning(sales_tariffs::id)
        .get_result::<i32>(conn)
        .await?;

    let feature_rows: Vec<_> = bundle
        .features
        .iter()
        .map(|feature| NewTariffFeatureRow {
            tariff_id,
            feature_id: feature.feature_id.as_i32(),
            is_premium: feature.is_premium,
        })
        .collect();
    if !feature_rows.is_empty() {
        diesel::insert_into(tariff_feature_relations::table)
            .values(&feature_rows)
            .execute(conn)
            .await?;
    }

    let use_case_rows: Vec<_> = bundle
        .use_cases
        .iter()
        .map(|case| NewUseCaseRow {
            tariff_id,
            scenario: case.scenario.as_str(),
            solution: case.solution.as_str(),
            target_audience: case.target_audience.as_str(),
        })
        .collect();
    if !use_case_rows.is_empty() {
        diesel::insert_into(tariff_use_cases::table)
            .values(&use_case_rows)
            .execute(conn)
            .await?;
    }

    let question_rows: Vec<_> = bundle
        .questions
        .iter()
        .map(|question| NewTariffQuestionRow {
            tariff_id,
            feature_id: question.feature_id.map(|id| id.as_i32()),
            question: question.question.as_str(),
            answer: question.answer.as_str(),
            priority: question.priority.get(),
        })
        .collect();
    if !question_rows.is_empty() {
        diesel::insert_into(support_tariff_specific::table)
            .values(&question_rows)
            .execute(conn)
            .await?;
    }

    Ok(tariff_id)
}

#[async_trait]
impl CatalogueRepository for DieselCatalogueRepository {
    async fn save_features(
        &self,
        features: Vec<FeatureDraft>,
    ) -> Result<Vec<Feature>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let rows = conn
            .transaction(|conn| {
                async move {
                    let mut rows = Vec::with_capacity(features.len());
                    for draft in &features {
                        let row = diesel::insert_into(tariff_features::table)
                            .values(NewFeatureRow {
                                name: draft.name.as_str(),
                                description: draft.description.as_str(),
                                category: draft.category.as_str(),
                            })
                            .returning(FeatureRow::as_returning())
                            .get_result(conn)
                            .await?;
                        rows.push(row);
                    }
                    Ok::<_, diesel::result::Error>(rows)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_failure)?;
        rows.into_iter().map(feature_from_row).collect()
    }

    async fn load_features(&self) -> Result<Vec<Feature>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let rows = tariff_features::table
            .order_by((tariff_features::category, tariff_features::name))
            .select(FeatureRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_failure)?;
        rows.into_iter().map(feature_from_row).collect()
    }

    async fn feature_exists(&self, name: &str) -> Result<bool, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        diesel::select(diesel::dsl::exists(
            tariff_features::table.filter(tariff_features::name.eq(name)),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_failure)
    }

    async fn save_tariffs(
        &self,
        tariffs: Vec<TariffBundle>,
    ) -> Result<Vec<TariffId>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let ids = conn
            .transaction(|conn| {
                async move {
                    let mut ids = Vec::with_capacity(tariffs.len());
                    for bundle in &tariffs {
                        ids.push(insert_bundle(conn, bundle).await?);
                    }
                    Ok::<_, diesel::result::Error>(ids)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_failure)?;
        Ok(ids.into_iter().map(TariffId::new).collect())
    }

    async fn list_tariffs(&self) -> Result<Vec<TariffOverview>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let rows = sales_tariffs::table
            .select(TariffRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_failure)?;
        assemble_overviews(&mut conn, rows).await
    }

    async fn find_tariff(
        &self,
        name: &str,
    ) -> Result<Option<TariffOverview>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let rows = sales_tariffs::table
            .filter(sales_tariffs::name.eq(name))
            .select(TariffRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_failure)?;
        Ok(assemble_overviews(&mut conn, rows).await?.into_iter().next())
    }

    async fn delete_tariff(&self, name: &str) -> Result<bool, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let deleted = diesel::delete(sales_tariffs::table.filter(sales_tariffs::name.eq(name)))
            .execute(&mut conn)
            .await
            .map_err(map_failure)?;
        Ok(deleted > 0)
    }
}
