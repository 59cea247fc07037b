//! Port for the support knowledge base.

use async_trait::async_trait;

use crate::domain::{
    QuestionRef, QuestionRelation, SupportBundle, SupportCategoryName, SupportQuestion,
    SupportSaveSummary,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by support repository adapters.
    pub enum SupportRepositoryError {
        /// Connection to the database failed.
        Connection { message: String } => "support connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "support query failed: {message}",
        /// A category, question or relation already exists.
        Conflict { message: String } => "support entry already exists: {message}",
        /// A row violated a schema constraint such as tag cardinality.
        ConstraintViolation { message: String } =>
            "support entry violates a schema constraint: {message}",
        /// A relation endpoint names a question that is not stored.
        UnresolvedQuestion { question: String } =>
            "relation endpoint does not exist: {question}",
        /// A stored value no longer parses into its domain type.
        InvalidData { message: String } => "support row is invalid: {message}",
    }
}

/// Reads and writes support categories, questions and relations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SupportRepository: Send + Sync {
    /// Save every bundle in one transaction.
    ///
    /// Questions from all bundles are inserted before relations are resolved,
    /// so relations may point at questions in other categories and at
    /// tariff-specific questions already stored.
    async fn save_support(
        &self,
        bundles: Vec<SupportBundle>,
    ) -> Result<SupportSaveSummary, SupportRepositoryError>;

    /// General questions ordered by category then priority (highest first).
    async fn list_questions(
        &self,
        category: Option<SupportCategoryName>,
    ) -> Result<Vec<SupportQuestion>, SupportRepositoryError>;

    /// Relations where `question` is the source.
    async fn relations_for(
        &self,
        question: QuestionRef,
    ) -> Result<Vec<QuestionRelation>, SupportRepositoryError>;
}

/// Fixture implementation with no support content.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureSupportRepository;

#[async_trait]
impl SupportRepository for FixtureSupportRepository {
    async fn save_support(
        &self,
        _bundles: Vec<SupportBundle>,
    ) -> Result<SupportSaveSummary, SupportRepositoryError> {
        Ok(SupportSaveSummary::default())
    }

    async fn list_questions(
        &self,
        _category: Option<SupportCategoryName>,
    ) -> Result<Vec<SupportQuestion>, SupportRepositoryError> {
        Ok(Vec::new())
    }

    async fn relations_for(
        &self,
        _question: QuestionRef,
    ) -> Result<Vec<QuestionRelation>, SupportRepositoryError> {
        Ok(Vec::new())
    }
}
