//! Commercial catalogue: tariffs, features and use cases.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::FeatureCategory;
use super::limits::{Priority, UserLimit};
use super::price::Price;

/// Primary key of a row in `tariff_features`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureId(i32);

impl FeatureId {
    pub fn new(value: i32) -> Self {
        Self(value)
    }

    pub fn as_i32(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Primary key of a row in `sales_tariffs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TariffId(i32);

impl TariffId {
    pub fn new(value: i32) -> Self {
        Self(value)
    }

    pub fn as_i32(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for TariffId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A feature to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureDraft {
    pub name: String,
    pub description: String,
    pub category: FeatureCategory,
}

/// A stored feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feature {
    pub id: FeatureId,
    pub name: String,
    pub description: String,
    pub category: FeatureCategory,
    pub created_at: DateTime<Utc>,
}

/// Tariff columns supplied on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TariffDraft {
    pub name: String,
    pub price: Price,
    pub user_limit: Option<UserLimit>,
    pub description: String,
}

/// Link from a tariff to an existing feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TariffFeatureRef {
    pub feature_id: FeatureId,
    pub is_premium: bool,
}

/// Example scenario for a tariff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseCase {
    pub scenario: String,
    pub solution: String,
    pub target_audience: String,
}

/// Support question scoped to one tariff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TariffQuestionDraft {
    pub question: String,
    pub answer: String,
    pub feature_id: Option<FeatureId>,
    pub priority: Priority,
}

/// Everything saved for one tariff in a single transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TariffBundle {
    pub tariff: TariffDraft,
    pub features: Vec<TariffFeatureRef>,
    pub use_cases: Vec<UseCase>,
    pub questions: Vec<TariffQuestionDraft>,
}

impl TariffBundle {
    /// Bundle with no related rows.
    pub fn new(tariff: TariffDraft) -> Self {
        Self {
            tariff,
            features: Vec::new(),
            use_cases: Vec::new(),
            questions: Vec::new(),
        }
    }
}

/// A feature as included in a particular tariff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncludedFeature {
    pub id: FeatureId,
    pub name: String,
    pub description: String,
    pub category: FeatureCategory,
    pub is_premium: bool,
}

/// Read model of a tariff with its features and use cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TariffOverview {
    pub id: TariffId,
    pub name: String,
    pub price: Price,
    pub user_limit: Option<UserLimit>,
    pub description: String,
    pub features: Vec<IncludedFeature>,
    pub use_cases: Vec<UseCase>,
}

/// Order tariffs for presentation: cheapest first, on-request last.
///
/// Ties are broken by name so the order is deterministic.
pub fn sort_tariffs_by_price(tariffs: &mut [TariffOverview]) {
    tariffs.sort_by(|left, right| {
        left.price
            .cmp(&right.price)
            .then_with(|| left.name.cmp(&right.name))
    });
}
