//! Diesel table definitions for the knowledge base schema.
//!
//! These definitions must match `migrations/` exactly. Enum array columns on
//! `support_general` are declared with their PostgreSQL types, but reads and
//! writes of those columns go through text casts in `sql_query` statements.

/// PostgreSQL enum types created by the schema migration.
pub mod sql_types {
    /// `topic_tag` enum.
    #[derive(diesel::query_builder::QueryId, diesel::sql_types::SqlType)]
    #[diesel(postgres_type(name = "topic_tag"))]
    pub struct TopicTag;

    /// `difficulty_tag` enum.
    #[derive(diesel::query_builder::QueryId, diesel::sql_types::SqlType)]
    #[diesel(postgres_type(name = "difficulty_tag"))]
    pub struct DifficultyTag;

    /// `component_tag` enum.
    #[derive(diesel::query_builder::QueryId, diesel::sql_types::SqlType)]
    #[diesel(postgres_type(name = "component_tag"))]
    pub struct ComponentTag;
}

diesel::table! {
    /// One JSON transcript per chat user.
    chat_history (user_id) {
        user_id -> Int8,
        /// JSON array of chat messages, append-only.
        history -> Jsonb,
    }
}

diesel::table! {
    /// Individual chat messages; replies point at their parent.
    messages (id) {
        id -> Int4,
        user_id -> Int8,
        /// `user` or `assistant`.
        role -> Text,
        content -> Text,
        created_at -> Timestamptz,
        /// Set to NULL when the parent is deleted.
        parent_message_id -> Nullable<Int4>,
    }
}

diesel::table! {
    /// Capabilities that tariffs may include.
    tariff_features (id) {
        id -> Int4,
        name -> Text,
        description -> Text,
        category -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Commercial pricing plans.
    sales_tariffs (id) {
        id -> Int4,
        name -> Text,
        /// `<digits> руб/мес` or `По запросу`.
        price -> Text,
        user_limit -> Nullable<Int4>,
        description -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Features included in each tariff.
    tariff_feature_relations (tariff_id, feature_id) {
        tariff_id -> Int4,
        feature_id -> Int4,
        is_premium -> Nullable<Bool>,
    }
}

diesel::table! {
    tariff_use_cases (id) {
        id -> Int4,
        tariff_id -> Nullable<Int4>,
        scenario -> Text,
        solution -> Text,
        target_audience -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    support_categories (id) {
        id -> Int4,
        name -> Text,
        description -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    use diesel::sql_types::*;
    use super::sql_types::{ComponentTag, DifficultyTag, TopicTag};

    /// Product-wide support questions.
    support_general (id) {
        id -> Int4,
        category_id -> Nullable<Int4>,
        question -> Text,
        answer -> Text,
        topic_tags -> Array<TopicTag>,
        difficulty -> DifficultyTag,
        component_tags -> Array<ComponentTag>,
        priority -> Nullable<Int4>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Support questions scoped to one tariff.
    support_tariff_specific (id) {
        id -> Int4,
        tariff_id -> Nullable<Int4>,
        feature_id -> Nullable<Int4>,
        question -> Text,
        answer -> Text,
        priority -> Nullable<Int4>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Links between questions in either question table.
    ///
    /// `source_type`/`target_type` say which table each id refers to.
    support_question_relations (source_id, target_id) {
        source_id -> Int4,
        target_id -> Int4,
        relation_type -> Text,
        source_type -> Text,
        target_type -> Text,
    }
}

diesel::table! {
    /// Append-only audit log, also used for rate limiting.
    user_actions (id) {
        id -> Int4,
        user_id -> Nullable<Int8>,
        action_type -> Text,
        details -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(tariff_feature_relations -> sales_tariffs (tariff_id));
diesel::joinable!(tariff_feature_relations -> tariff_features (feature_id));
diesel::joinable!(tariff_use_cases -> sales_tariffs (tariff_id));
diesel::joinable!(support_general -> support_categories (category_id));
diesel::joinable!(support_tariff_specific -> sales_tariffs (tariff_id));

diesel::allow_tables_to_appear_in_same_query!(
    chat_history,
    messages,
    tariff_features,
    sales_tariffs,
    tariff_feature_relations,
    tariff_use_cases,
    support_categories,
    support_general,
    support_tariff_specific,
    support_question_relations,
    user_actions,
);
