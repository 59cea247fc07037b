//! PostgreSQL-backed support knowledge base adapter.
//!
//! Enum array columns are written and read through text casts, so Diesel
//! never needs to know the PostgreSQL enum types.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::{Array, Int4, Nullable, Text};
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{SupportRepository, SupportRepositoryError};
use crate::domain::{
    ComponentTag, DifficultyTag, GeneralQuestionDraft, Priority, QuestionKey, QuestionKind,
    QuestionRef, QuestionRelation, RelationType, SupportBundle, SupportCategoryName,
    SupportQuestion, SupportSaveSummary, SupportTags, TagSet, TopicTag,
};

use super::diesel_error_mapping::{Failure, FailureKind};
use super::models::{
    InsertedIdRow, NewQuestionRelationRow, NewSupportCategoryRow, QuestionRelationRow,
    SupportQuestionRow,
};
use super::pool::DbPool;
use super::schema::{
    sales_tariffs, support_categories, support_general, support_question_relations,
    support_tariff_specific,
};

const INSERT_GENERAL_SQL: &str = concat!(
    "INSERT INTO support_general ",
    "(category_id, question, answer, topic_tags, difficulty, component_tags, priority) ",
    "VALUES ($1, $2, $3, $4::text[]::topic_tag[], $5::difficulty_tag, ",
    "$6::text[]::component_tag[], $7) ",
    "RETURNING id"
);

const LIST_QUESTIONS_SQL: &str = concat!(
    "SELECT g.id, c.name AS category, g.question, g.answer, ",
    "g.topic_tags::text[] AS topic_tags, g.difficulty::text AS difficulty, ",
    "g.component_tags::text[] AS component_tags, g.priority ",
    "FROM support_general g ",
    "LEFT JOIN support_categories c ON c.id = g.category_id ",
    "WHERE $1::text IS NULL OR c.name = $1 ",
    "ORDER BY c.name NULLS LAST, g.priority DESC NULLS LAST, g.id"
);

/// Diesel-backed implementation of [`SupportRepository`].
#[derive(Clone)]
pub struct DieselSupportRepository {
    pool: DbPool,
}

impl DieselSupportRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failure inside the save transaction.
#[derive(Debug)]
enum SaveError {
    Diesel(diesel::result::Error),
    Unresolved(QuestionKey),
}

impl From<diesel::result::Error> for SaveError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

fn map_failure(failure: impl Into<Failure>) -> SupportRepositoryError {
    let Failure { kind, message } = failure.into();
    match kind {
        FailureKind::Connection => SupportRepositoryError::connection(message),
        FailureKind::Conflict => SupportRepositoryError::conflict(message),
        FailureKind::Constraint => SupportRepositoryError::constraint_violation(message),
        FailureKind::Query => SupportRepositoryError::query(message),
    }
}

fn map_save_error(error: SaveError) -> SupportRepositoryError {
    match error {
        SaveError::Diesel(error) => map_failure(error),
        SaveError::Unresolved(key) => SupportRepositoryError::unresolved_question(key.to_string()),
    }
}

fn invalid(err: impl std::fmt::Display) -> SupportRepositoryError {
    SupportRepositoryError::invalid_data(err.to_string())
}

fn question_from_row(row: SupportQuestionRow) -> Result<SupportQuestion, SupportRepositoryError> {
    let topics = row
        .topic_tags
        .iter()
        .map(|tag| tag.parse::<TopicTag>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(invalid)?;
    let components = row
        .component_tags
        .iter()
        .map(|tag| tag.parse::<ComponentTag>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(invalid)?;
    let tags = SupportTags {
        topics: TagSet::from_stored(topics).map_err(invalid)?,
        difficulty: row.difficulty.parse::<DifficultyTag>().map_err(invalid)?,
        components: TagSet::from_stored(components).map_err(invalid)?,
    };
    let category = row
        .category
        .map(|name| name.parse::<SupportCategoryName>())
        .transpose()
        .map_err(invalid)?;
    let priority = row
        .priority
        .map(Priority::try_from)
        .transpose()
        .map_err(invalid)?;
    Ok(SupportQuestion {
        id: row.id,
        category,
        question: row.question,
        answer: row.answer,
        tags,
        priority,
    })
}

fn relation_from_row(row: QuestionRelationRow) -> Result<QuestionRelation, SupportRepositoryError> {
    let source_kind = row.source_type.parse::<QuestionKind>().map_err(invalid)?;
    let target_kind = row.target_type.parse::<QuestionKind>().map_err(invalid)?;
    Ok(QuestionRelation {
        source: QuestionRef::from_parts(row.source_id, source_kind),
        target: QuestionRef::from_parts(row.target_id, target_kind),
        kind: row.relation_type.parse::<RelationType>().map_err(invalid)?,
    })
}

async fn insert_general_question(
    conn: &mut AsyncPgConnection,
    category_id: i32,
    draft: &GeneralQuestionDraft,
) -> Result<i32, diesel::result::Error> {
    let topics: Vec<&str> = draft.tags.topics.iter().map(|tag| tag.as_str()).collect();
    let components: Vec<&str> = draft
        .tags
        .components
        .iter()
        .map(|tag| tag.as_str())
        .collect();
    let row: InsertedIdRow = diesel::sql_query(INSERT_GENERAL_SQL)
        .bind::<Int4, _>(category_id)
        .bind::<Text, _>(draft.question.as_str())
        .bind::<Text, _>(draft.answer.as_str())
        .bind::<Array<Text>, _>(topics)
        .bind::<Text, _>(draft.tags.difficulty.as_str())
        .bind::<Array<Text>, _>(components)
        .bind::<Int4, _>(draft.priority.get())
        .get_result(conn)
        .await?;
    Ok(row.id)
}

/// Resolve a natural key to a stored question, preferring rows inserted in
/// this transaction.
async fn resolve_key(
    conn: &mut AsyncPgConnection,
    inserted: &HashMap<String, i32>,
    key: &QuestionKey,
) -> Result<QuestionRef, SaveError> {
    let found = match key {
        QuestionKey::General { question } => {
            if let Some(id) = inserted.get(question) {
                return Ok(QuestionRef::General(*id));
            }
            support_general::table
                .filter(support_general::question.eq(question))
                .select(support_general::id)
                .first::<i32>(conn)
                .await
                .optional()?
                .map(QuestionRef::General)
        }
        QuestionKey::Tariff { tariff, question } => support_tariff_specific::table
            .inner_join(sales_tariffs::table)
            .filter(sales_tariffs::name.eq(tariff))
            .filter(support_tariff_specific::question.eq(question))
            .select(support_tariff_specific::id)
            .first::<i32>(conn)
            .await
            .optional()?
            .map(QuestionRef::Tariff),
    };
    found.ok_or_else(|| SaveError::Unresolved(key.clone()))
}

async fn save_bundles(
    conn: &mut AsyncPgConnection,
    bundles: &[SupportBundle],
) -> Result<SupportSaveSummary, SaveError> {
    let mut summary = SupportSaveSummary::default();
    let mut inserted = HashMap::new();

    for bundle in bundles {
        let category_id = diesel::insert_into(support_categories::table)
            .values(NewSupportCategoryRow {
                name: bundle.category.name.as_str(),
                description: bundle.category.description.as_str(),
            })
            .returning(support_categories::id)
            .get_result::<i32>(conn)
            .await?;
        summary.categories += 1;

        for question in &bundle.questions {
            let id = insert_general_question(conn, category_id, question).await?;
            inserted.insert(question.question.clone(), id);
            summary.questions += 1;
        }
    }

    for relation in bundles.iter().flat_map(|bundle| &bundle.relations) {
        let source = resolve_key(conn, &inserted, &relation.source).await?;
        let target = resolve_key(conn, &inserted, &relation.target).await?;
        diesel::insert_into(support_question_relations::table)
            .values(NewQuestionRelationRow {
                source_id: source.id(),
                target_id: target.id(),
                relation_type: relation.kind.as_str(),
                source_type: source.kind().as_str(),
                target_type: target.kind().as_str(),
            })
            .execute(conn)
            .await?;
        summary.relations += 1;
    }

    Ok(summary)
}

#[async_trait]
impl SupportRepository for DieselSupportRepository {
    async fn save_support(
        &self,
        bundles: Vec<SupportBundle>,
    ) -> Result<SupportSaveSummary, SupportRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        conn.transaction::<_, SaveError, _>(|conn| {
            async move { save_bundles(conn, &bundles).await }.scope_boxed()
        })
        .await
        .map_err(map_save_error)
    }

    async fn list_questions(
        &self,
        category: Option<SupportCategoryName>,
    ) -> Result<Vec<SupportQuestion>, SupportRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let rows: Vec<SupportQuestionRow> = diesel::sql_query(LIST_QUESTIONS_SQL)
            .bind::<Nullable<Text>, _>(category.map(|name| name.as_str()))
            .load(&mut conn)
            .await
            .map_err(map_failure)?;
        rows.into_iter().map(question_from_row).collect()
    }

    async fn relations_for(
        &self,
        question: QuestionRef,
    ) -> Result<Vec<QuestionRelation>, SupportRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let rows = support_question_relations::table
            .filter(support_question_relations::source_id.eq(question.id()))
            .filter(support_question_relations::source_type.eq(question.kind().as_str()))
            .order_by(support_question_relations::target_id)
            .select(QuestionRelationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_failure)?;
        rows.into_iter().map(relation_from_row).collect()
    }
}
