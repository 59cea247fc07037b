//! Support knowledge base: categories, questions and question relations.
//!
//! Questions live in two tables: `support_general` for product-wide questions
//! and `support_tariff_specific` for questions scoped to a tariff. Relations
//! between questions may cross tables, so each endpoint is a [`QuestionRef`]
//! carrying both the table and the row id.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::enums::{QuestionKind, RelationType, SupportCategoryName};
use super::limits::Priority;
use super::tags::SupportTags;

/// Category columns supplied on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportCategoryDraft {
    pub name: SupportCategoryName,
    pub description: String,
}

/// General question columns supplied on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneralQuestionDraft {
    pub question: String,
    pub answer: String,
    pub tags: SupportTags,
    pub priority: Priority,
}

/// Identifies a question by its natural key before ids are known.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QuestionKey {
    /// General questions are unique by text.
    General { question: String },
    /// Tariff questions are unique per tariff.
    Tariff { tariff: String, question: String },
}

impl QuestionKey {
    pub fn question(&self) -> &str {
        match self {
            Self::General { question } | Self::Tariff { question, .. } => question,
        }
    }
}

impl fmt::Display for QuestionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::General { question } => write!(f, "general question '{question}'"),
            Self::Tariff { tariff, question } => {
                write!(f, "tariff '{tariff}' question '{question}'")
            }
        }
    }
}

/// A relation expressed with natural keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRelationDraft {
    pub source: QuestionKey,
    pub target: QuestionKey,
    pub kind: RelationType,
}

/// Everything saved for one support category in a single transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportBundle {
    pub category: SupportCategoryDraft,
    pub questions: Vec<GeneralQuestionDraft>,
    pub relations: Vec<QuestionRelationDraft>,
}

/// Row counts written by a support save.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SupportSaveSummary {
    pub categories: usize,
    pub questions: usize,
    pub relations: usize,
}

/// Reference to a stored question in either question table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum QuestionRef {
    General(i32),
    Tariff(i32),
}

impl QuestionRef {
    /// Rebuild a reference from the `(id, type)` column pair.
    pub fn from_parts(id: i32, kind: QuestionKind) -> Self {
        match kind {
            QuestionKind::General => Self::General(id),
            QuestionKind::Tariff => Self::Tariff(id),
        }
    }

    pub fn id(&self) -> i32 {
        match self {
            Self::General(id) | Self::Tariff(id) => *id,
        }
    }

    pub fn kind(&self) -> QuestionKind {
        match self {
            Self::General(_) => QuestionKind::General,
            Self::Tariff(_) => QuestionKind::Tariff,
        }
    }
}

impl fmt::Display for QuestionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind(), self.id())
    }
}

/// A stored relation between two questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuestionRelation {
    pub source: QuestionRef,
    pub target: QuestionRef,
    pub kind: RelationType,
}

/// Read model of a general support question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupportQuestion {
    pub id: i32,
    /// Absent when the row has no category.
    pub category: Option<SupportCategoryName>,
    pub question: String,
    pub answer: String,
    pub tags: SupportTags,
    pub priority: Option<Priority>,
}

impl SupportQuestion {
    pub fn question_ref(&self) -> QuestionRef {
        QuestionRef::General(self.id)
    }
}
