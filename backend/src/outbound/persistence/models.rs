//! Internal Diesel row structs for the knowledge base tables.
//!
//! These types never leave the persistence layer. Rows read through
//! `sql_query` use `QueryableByName`; the rest derive `Selectable`.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::{Array, Float4, Int4, Int8, Nullable, Text, Timestamptz};

use super::schema::{
    messages, sales_tariffs, support_categories, support_question_relations,
    support_tariff_specific, tariff_feature_relations, tariff_features, tariff_use_cases,
    user_actions,
};

// ---------------------------------------------------------------------------
// Chat storage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MessageRow {
    pub id: i32,
    pub user_id: i64,
    pub role: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub parent_message_id: Option<i32>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = messages)]
pub(crate) struct NewMessageRow<'a> {
    pub user_id: i64,
    pub role: &'a str,
    pub content: &'a str,
    pub parent_message_id: Option<i32>,
}

/// A message row produced by the recursive thread query.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct ThreadRow {
    #[diesel(sql_type = Int4)]
    pub id: i32,
    #[diesel(sql_type = Int8)]
    pub user_id: i64,
    #[diesel(sql_type = Text)]
    pub role: String,
    #[diesel(sql_type = Text)]
    pub content: String,
    #[diesel(sql_type = Timestamptz)]
    pub created_at: DateTime<Utc>,
    #[diesel(sql_type = Nullable<Int4>)]
    pub parent_message_id: Option<i32>,
    #[diesel(sql_type = Int4)]
    pub depth: i32,
}

// ---------------------------------------------------------------------------
// Commercial catalogue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tariff_features)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct FeatureRow {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tariff_features)]
pub(crate) struct NewFeatureRow<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub category: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = sales_tariffs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TariffRow {
    pub id: i32,
    pub name: String,
    pub price: String,
    pub user_limit: Option<i32>,
    pub description: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = sales_tariffs)]
pub(crate) struct NewTariffRow<'a> {
    pub name: &'a str,
    pub price: String,
    pub user_limit: Option<i32>,
    pub description: &'a str,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tariff_feature_relations)]
pub(crate) struct NewTariffFeatureRow {
    pub tariff_id: i32,
    pub feature_id: i32,
    pub is_premium: bool,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tariff_use_cases)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UseCaseRow {
    pub tariff_id: Option<i32>,
    pub scenario: String,
    pub solution: String,
    pub target_audience: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tariff_use_cases)]
pub(crate) struct NewUseCaseRow<'a> {
    pub tariff_id: i32,
    pub scenario: &'a str,
    pub solution: &'a str,
    pub target_audience: &'a str,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = support_tariff_specific)]
pub(crate) struct NewTariffQuestionRow<'a> {
    pub tariff_id: i32,
    pub feature_id: Option<i32>,
    pub question: &'a str,
    pub answer: &'a str,
    pub priority: i32,
}

// ---------------------------------------------------------------------------
// Support knowledge base
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = support_categories)]
pub(crate) struct NewSupportCategoryRow<'a> {
    pub name: &'a str,
    pub description: &'a str,
}

/// A general question with enum columns cast to text.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct SupportQuestionRow {
    #[diesel(sql_type = Int4)]
    pub id: i32,
    #[diesel(sql_type = Nullable<Text>)]
    pub category: Option<String>,
    #[diesel(sql_type = Text)]
    pub question: String,
    #[diesel(sql_type = Text)]
    pub answer: String,
    #[diesel(sql_type = Array<Text>)]
    pub topic_tags: Vec<String>,
    #[diesel(sql_type = Text)]
    pub difficulty: String,
    #[diesel(sql_type = Array<Text>)]
    pub component_tags: Vec<String>,
    #[diesel(sql_type = Nullable<Int4>)]
    pub priority: Option<i32>,
}

/// `RETURNING id` of a raw insert.
#[derive(Debug, Clone, Copy, QueryableByName)]
pub(crate) struct InsertedIdRow {
    #[diesel(sql_type = Int4)]
    pub id: i32,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = support_question_relations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct QuestionRelationRow {
    pub source_id: i32,
    pub target_id: i32,
    pub relation_type: String,
    pub source_type: String,
    pub target_type: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = support_question_relations)]
pub(crate) struct NewQuestionRelationRow<'a> {
    pub source_id: i32,
    pub target_id: i32,
    pub relation_type: &'a str,
    pub source_type: &'a str,
    pub target_type: &'a str,
}

// ---------------------------------------------------------------------------
// Audit log and search
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_actions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserActionRow {
    pub id: i32,
    pub user_id: Option<i64>,
    pub action_type: String,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_actions)]
pub(crate) struct NewUserActionRow<'a> {
    pub user_id: i64,
    pub action_type: &'a str,
    pub details: Option<&'a str>,
}

/// One ranked full-text match.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct SearchHitRow {
    #[diesel(sql_type = Int4)]
    pub source_id: i32,
    #[diesel(sql_type = Text)]
    pub content: String,
    #[diesel(sql_type = Float4)]
    pub relevance: f32,
}
