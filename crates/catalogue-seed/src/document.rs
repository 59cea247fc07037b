//! Knowledge-pack document types and JSON loading.

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use serde::{Deserialize, Serialize};

use crate::error::PackError;
use crate::validation::validate_pack;

/// A parsed and internally consistent knowledge pack.
///
/// Construct with [`KnowledgePack::from_json`] or
/// [`KnowledgePack::from_file`]; both reject documents whose references do
/// not resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgePack {
    version: u32,
    features: Vec<FeatureSeed>,
    tariffs: Vec<TariffSeed>,
    support: Vec<SupportCategorySeed>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct RawKnowledgePack {
    pub(crate) version: u32,
    #[serde(default)]
    pub(crate) features: Vec<FeatureSeed>,
    #[serde(default)]
    pub(crate) tariffs: Vec<TariffSeed>,
    #[serde(default)]
    pub(crate) support: Vec<SupportCategorySeed>,
}

impl KnowledgePack {
    /// Parses and validates a knowledge pack from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::ParseError`] for malformed JSON and the matching
    /// consistency variant when references or names do not line up.
    pub fn from_json(json: &str) -> Result<Self, PackError> {
        let raw: RawKnowledgePack =
            serde_json::from_str(json).map_err(|e| PackError::ParseError {
                message: e.to_string(),
            })?;

        validate_pack(&raw)?;

        Ok(Self {
            version: raw.version,
            features: raw.features,
            tariffs: raw.tariffs,
            support: raw.support,
        })
    }

    /// Loads a knowledge pack from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::IoError`] when the file cannot be read, otherwise
    /// the errors of [`KnowledgePack::from_json`].
    pub fn from_file(path: &Utf8Path) -> Result<Self, PackError> {
        let io_error = |message: String| PackError::IoError {
            path: path.to_path_buf(),
            message,
        };
        let file_name = path
            .file_name()
            .ok_or_else(|| io_error("path does not name a file".to_owned()))?;
        let parent = match path.parent() {
            Some(dir) if !dir.as_str().is_empty() => dir,
            _ => Utf8Path::new("."),
        };

        let dir = Dir::open_ambient_dir(parent.as_std_path(), ambient_authority())
            .map_err(|e| io_error(e.to_string()))?;
        let contents = dir
            .read_to_string(file_name)
            .map_err(|e| io_error(e.to_string()))?;

        Self::from_json(&contents)
    }

    /// Returns the document version.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Returns the declared features.
    #[must_use]
    pub fn features(&self) -> &[FeatureSeed] {
        &self.features
    }

    /// Returns the declared tariffs.
    #[must_use]
    pub fn tariffs(&self) -> &[TariffSeed] {
        &self.tariffs
    }

    /// Returns the declared support categories.
    #[must_use]
    pub fn support(&self) -> &[SupportCategorySeed] {
        &self.support
    }
}

/// A tariff feature declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FeatureSeed {
    /// Unique feature name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Feature category label, for example `Security`.
    pub category: String,
}

/// A tariff with its feature references, use cases and questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TariffSeed {
    /// Unique tariff name.
    pub name: String,
    /// Price label, for example `990 руб/мес` or `По запросу`.
    pub price: String,
    /// Optional seat limit.
    #[serde(default)]
    pub user_limit: Option<i32>,
    /// Human-readable description.
    pub description: String,
    /// Features included in the tariff, referenced by name.
    #[serde(default)]
    pub features: Vec<FeatureRefSeed>,
    /// Example scenarios for the tariff.
    #[serde(default)]
    pub use_cases: Vec<UseCaseSeed>,
    /// Tariff-specific support questions.
    #[serde(default)]
    pub questions: Vec<TariffQuestionSeed>,
}

/// A reference from a tariff to a declared feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FeatureRefSeed {
    /// Name of the referenced feature.
    pub name: String,
    /// Whether the feature is a premium add-on for this tariff.
    #[serde(default)]
    pub is_premium: bool,
}

/// An example scenario for a tariff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UseCaseSeed {
    /// The customer's situation.
    pub scenario: String,
    /// How the tariff addresses it.
    pub solution: String,
    /// Who the scenario is aimed at.
    pub target_audience: String,
}

/// A support question scoped to one tariff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TariffQuestionSeed {
    /// Question text, unique within the tariff.
    pub question: String,
    /// Answer text.
    pub answer: String,
    /// Optional feature the question is about, referenced by name.
    #[serde(default)]
    pub feature: Option<String>,
    /// Ranking hint; higher surfaces first.
    #[serde(default)]
    pub priority: i32,
}

/// A support category with its general questions and relations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SupportCategorySeed {
    /// Category name, for example `Getting Started`.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// General questions filed under the category.
    pub questions: Vec<GeneralQuestionSeed>,
    /// Relations between questions.
    #[serde(default)]
    pub relations: Vec<RelationSeed>,
}

/// A general support question with a flat tag list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GeneralQuestionSeed {
    /// Question text, unique across the pack.
    pub question: String,
    /// Answer text.
    pub answer: String,
    /// Topic, difficulty and component tags mixed together.
    pub tags: Vec<String>,
    /// Ranking hint; higher surfaces first.
    #[serde(default)]
    pub priority: i32,
}

/// A directed relation between two questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RelationSeed {
    /// Question the relation starts from.
    pub source: QuestionPointer,
    /// Question the relation points at.
    pub target: QuestionPointer,
    /// Relation label: `related`, `prerequisite` or `followup`.
    #[serde(rename = "type")]
    pub relation_type: String,
}

/// Points at a question by its text.
///
/// General questions are unique across the pack; tariff questions are only
/// unique within their tariff, so the tariff name is part of the pointer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", deny_unknown_fields)]
pub enum QuestionPointer {
    /// A general support question.
    General {
        /// Question text.
        question: String,
    },
    /// A tariff-specific support question.
    Tariff {
        /// Owning tariff name.
        tariff: String,
        /// Question text.
        question: String,
    },
}

impl QuestionPointer {
    /// Returns the question text the pointer refers to.
    #[must_use]
    pub fn question(&self) -> &str {
        match self {
            Self::General { question } | Self::Tariff { question, .. } => question,
        }
    }
}
