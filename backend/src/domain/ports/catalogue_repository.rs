//! Port for the commercial catalogue: features, tariffs and their links.

use async_trait::async_trait;

use crate::domain::{Feature, FeatureDraft, TariffBundle, TariffId, TariffOverview};

use super::define_port_error;

define_port_error! {
    /// Errors raised by catalogue repository adapters.
    pub enum CatalogueRepositoryError {
        /// Connection to the database failed.
        Connection { message: String } => "catalogue connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "catalogue query failed: {message}",
        /// A unique name or question already exists.
        Conflict { message: String } => "catalogue entry already exists: {message}",
        /// A row violated a `CHECK`, `NOT NULL` or foreign key constraint.
        ConstraintViolation { message: String } =>
            "catalogue entry violates a schema constraint: {message}",
        /// A stored value no longer parses into its domain type.
        InvalidData { message: String } => "catalogue row is invalid: {message}",
    }
}

/// Reads and writes tariffs and features.
///
/// Multi-row saves are transactional: either every row is written or none.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueRepository: Send + Sync {
    /// Insert features and return them with their ids, in input order.
    async fn save_features(
        &self,
        features: Vec<FeatureDraft>,
    ) -> Result<Vec<Feature>, CatalogueRepositoryError>;

    /// All features ordered by category then name.
    async fn load_features(&self) -> Result<Vec<Feature>, CatalogueRepositoryError>;

    async fn feature_exists(&self, name: &str) -> Result<bool, CatalogueRepositoryError>;

    /// Insert tariffs with their feature links, use cases and tariff
    /// questions. Returns ids in input order.
    async fn save_tariffs(
        &self,
        tariffs: Vec<TariffBundle>,
    ) -> Result<Vec<TariffId>, CatalogueRepositoryError>;

    /// Every tariff with its features and use cases, cheapest first and
    /// on-request tariffs last.
    async fn list_tariffs(&self) -> Result<Vec<TariffOverview>, CatalogueRepositoryError>;

    async fn find_tariff(
        &self,
        name: &str,
    ) -> Result<Option<TariffOverview>, CatalogueRepositoryError>;

    /// Delete a tariff by name; returns whether a row was removed.
    ///
    /// Feature links, use cases and tariff questions go with it.
    async fn delete_tariff(&self, name: &str) -> Result<bool, CatalogueRepositoryError>;
}

/// Fixture implementation backed by an empty catalogue.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureCatalogueRepository;

#[async_trait]
impl CatalogueRepository for FixtureCatalogueRepository {
    async fn save_features(
        &self,
        _features: Vec<FeatureDraft>,
    ) -> Result<Vec<Feature>, CatalogueRepositoryError> {
        Ok(Vec::new())
    }

    async fn load_features(&self) -> Result<Vec<Feature>, CatalogueRepositoryError> {
        Ok(Vec::new())
    }

    async fn feature_exists(&self, _name: &str) -> Result<bool, CatalogueRepositoryError> {
        Ok(false)
    }

    async fn save_tariffs(
        &self,
        _tariffs: Vec<TariffBundle>,
    ) -> Result<Vec<TariffId>, CatalogueRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_tariffs(&self) -> Result<Vec<TariffOverview>, CatalogueRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_tariff(
        &self,
        _name: &str,
    ) -> Result<Option<TariffOverview>, CatalogueRepositoryError> {
        Ok(None)
    }

    async fn delete_tariff(&self, _name: &str) -> Result<bool, CatalogueRepositoryError> {
        Ok(false)
    }
}
