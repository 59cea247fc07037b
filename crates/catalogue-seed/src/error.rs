//! Error types for knowledge-pack parsing and validation.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while loading a knowledge pack.
///
/// Parsing failures and consistency failures share one enum so callers can
/// report either with a single message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PackError {
    /// The pack file could not be read.
    #[error("failed to read knowledge pack at '{path}': {message}")]
    IoError {
        /// Path to the pack file.
        path: Utf8PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The JSON is malformed or missing required fields.
    #[error("invalid knowledge pack JSON: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
    },

    /// The document version is not supported.
    #[error("unsupported knowledge pack version: expected {expected}, found {actual}")]
    UnsupportedVersion {
        /// Version understood by this crate.
        expected: u32,
        /// Version declared by the document.
        actual: u32,
    },

    /// The document declares no features, tariffs or support categories.
    #[error("knowledge pack is empty")]
    EmptyPack,

    /// A support category declares no questions.
    #[error("support category '{name}' has no questions")]
    EmptyCategory {
        /// Category name.
        name: String,
    },

    /// Two features share a name.
    #[error("duplicate feature '{name}'")]
    DuplicateFeature {
        /// Feature name.
        name: String,
    },

    /// Two tariffs share a name.
    #[error("duplicate tariff '{name}'")]
    DuplicateTariff {
        /// Tariff name.
        name: String,
    },

    /// Two support categories share a name.
    #[error("duplicate support category '{name}'")]
    DuplicateCategory {
        /// Category name.
        name: String,
    },

    /// Two general questions share the same text.
    #[error("duplicate general question '{question}'")]
    DuplicateQuestion {
        /// Question text.
        question: String,
    },

    /// One tariff declares the same question twice.
    #[error("tariff '{tariff}' declares question '{question}' more than once")]
    DuplicateTariffQuestion {
        /// Tariff name.
        tariff: String,
        /// Question text.
        question: String,
    },

    /// A tariff references a feature that the pack does not declare.
    #[error("tariff '{tariff}' references unknown feature '{feature}'")]
    UnknownFeature {
        /// Tariff name.
        tariff: String,
        /// Referenced feature name.
        feature: String,
    },

    /// A relation endpoint does not resolve to a declared question.
    #[error("relation in category '{category}' points at unknown question '{question}'")]
    UnresolvedRelation {
        /// Category owning the relation.
        category: String,
        /// Question text of the unresolved endpoint.
        question: String,
    },
}
