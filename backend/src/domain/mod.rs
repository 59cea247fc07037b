//! Domain types and services for the sales and support knowledge base.
//!
//! Purpose: give every constrained column a Rust type that cannot hold an
//! invalid value, and keep orchestration (seeding, rate limiting) independent
//! of the persistence adapters behind [`ports`].
//!
//! Public surface:
//! - Closed vocabularies (`TopicTag`, `FeatureCategory`, `RelationType`, ...)
//!   mirroring PostgreSQL enums and `CHECK` lists.
//! - Bounded values (`Price`, `UserLimit`, `Priority`, `TagSet`).
//! - Drafts for inserts and read models for queries.
//! - `KnowledgePackSeeder` and `RateLimiter` services.
//! - `SchemaDiagram` snapshots and Mermaid rendering.

pub mod catalogue;
pub mod chat;
pub mod enums;
pub mod er_diagram;
pub mod knowledge_pack;
pub mod limits;
pub mod ports;
pub mod price;
pub mod search;
pub mod support;
pub mod tags;
pub mod user_actions;

pub use self::catalogue::{
    Feature, FeatureDraft, FeatureId, IncludedFeature, TariffBundle, TariffDraft,
    TariffFeatureRef, TariffId, TariffOverview, TariffQuestionDraft, UseCase,
    sort_tariffs_by_price,
};
pub use self::chat::{
    ChatMessage, MessageDraft, MessageId, StoredMessage, ThreadedMessage, UserId,
};
pub use self::enums::{
    ComponentTag, DifficultyTag, FeatureCategory, MessageRole, ParseComponentTagError,
    ParseDifficultyTagError, ParseFeatureCategoryError, ParseMessageRoleError,
    ParseQuestionKindError, ParseRelationTypeError, ParseSupportCategoryNameError,
    ParseTopicTagError, QuestionKind, RelationType, SupportCategoryName, TopicTag,
};
pub use self::er_diagram::{
    SchemaCheck, SchemaColumn, SchemaDiagram, SchemaIndex, SchemaRelationship, SchemaTable,
    render_mermaid_er_diagram,
};
pub use self::knowledge_pack::{
    KnowledgePackSeedOutcome, KnowledgePackSeeder, KnowledgePackSeedingError,
};
pub use self::limits::{BoundedValueError, Priority, UserLimit};
pub use self::price::{ParsePriceError, Price, Roubles};
pub use self::search::{
    DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT, ParseSearchScopeError, SearchHit, SearchQuery,
    SearchScope,
};
pub use self::support::{
    GeneralQuestionDraft, QuestionKey, QuestionRef, QuestionRelation, QuestionRelationDraft,
    SupportBundle, SupportCategoryDraft, SupportQuestion, SupportSaveSummary,
};
pub use self::tags::{SupportTagError, SupportTags, TagSet, TagSetError};
pub use self::user_actions::{
    ERROR_ACTION_TYPE, RateDecision, RateLimitPolicy, RateLimiter, UserAction,
};
