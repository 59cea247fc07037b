//! Full-text search over the knowledge base.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::enums::closed_enum;

closed_enum! {
    /// Which indexed text a search runs against.
    pub enum SearchScope ("search scope") {
        /// Feature name and description.
        Features => "feature",
        /// Tariff name and description.
        Tariffs => "tariff",
        /// Use case scenario, solution and audience.
        UseCases => "use_case",
        /// General support question and answer.
        GeneralQuestions => "general",
        /// Tariff-specific question and answer.
        TariffQuestions => "specific",
        /// Chat message content.
        Messages => "message",
    }
}

/// Default number of hits returned by a search.
pub const DEFAULT_SEARCH_LIMIT: u32 = 5;

/// Upper bound on hits per search.
pub const MAX_SEARCH_LIMIT: u32 = 50;

/// A normalised full-text query.
///
/// Whitespace is collapsed so equivalent inputs share cache entries. Blank
/// input has no query at all.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchQuery {
    text: String,
    limit: u32,
}

impl SearchQuery {
    /// Normalise `raw`; returns `None` when nothing searchable remains.
    pub fn new(raw: &str, limit: u32) -> Option<Self> {
        let text = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        if text.is_empty() || limit == 0 {
            return None;
        }
        Some(Self {
            text,
            limit: limit.min(MAX_SEARCH_LIMIT),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }
}

/// One ranked search result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub source: SearchScope,
    pub source_id: i32,
    /// The text the index covers, as stored.
    pub content: String,
    /// `ts_rank_cd` score; higher is better.
    pub relevance: f32,
}
