//! Behavioural tests for check constraints on the knowledge-base schema.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use pg_embedded_setup_unpriv::TestCluster;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

mod support;

use support::{execute, handle_cluster_setup_failure, prepared_database};

const TEST_DB: &str = "schema_constraints_bdd";
const TOPICS: [&str; 5] = ["installation", "configuration", "usage", "error", "billing"];
const COMPONENTS: [&str; 5] = ["ui", "api", "database", "security", "integration"];

fn tag_list(tags: &[&str], count: usize) -> String {
    tags.iter()
        .take(count)
        .map(|tag| format!("'{tag}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn quoted(value: &str) -> String {
    value.replace('\'', "''")
}

struct SchemaWorld {
    cluster: Option<(TestCluster, String)>,
    setup_error: Option<String>,
    outcome: Option<Result<u64, String>>,
}

impl SchemaWorld {
    fn database_url(&self) -> Option<&str> {
        match (&self.cluster, &self.setup_error) {
            (Some((_, url)), _) => Some(url.as_str()),
            (None, reason) => {
                let reason = reason.as_deref().unwrap_or("unknown reason");
                eprintln!("SKIP-TEST-CLUSTER: scenario skipped ({reason})");
                None
            }
        }
    }

    fn insert(&mut self, sql: &str) {
        let Some(url) = self.database_url() else {
            return;
        };
        let outcome = execute(url, sql);
        self.outcome = Some(outcome);
    }

    fn outcome(&self) -> Option<&Result<u64, String>> {
        self.database_url()?;
        Some(self.outcome.as_ref().expect("an insert should have run"))
    }
}

#[fixture]
fn world() -> SchemaWorld {
    match prepared_database(TEST_DB) {
        Ok(cluster) => SchemaWorld {
            cluster: Some(cluster),
            setup_error: None,
            outcome: None,
        },
        Err(reason) => {
            let _: Option<()> = handle_cluster_setup_failure(&reason);
            SchemaWorld {
                cluster: None,
                setup_error: Some(reason),
                outcome: None,
            }
        }
    }
}

#[given("a migrated knowledge base")]
fn a_migrated_knowledge_base(world: &mut SchemaWorld) {
    let _ = world;
}

#[when("a tariff with user limit {limit} is inserted")]
fn a_tariff_with_user_limit_is_inserted(world: &mut SchemaWorld, limit: i32) {
    world.insert(&format!(
        "INSERT INTO sales_tariffs (name, price, user_limit, description) \
         VALUES ('Лимит {limit}', '990 руб/мес', {limit}, 'Проверка лимита')"
    ));
}

#[when("a tariff priced \"{price}\" is inserted")]
fn a_tariff_priced_is_inserted(world: &mut SchemaWorld, price: String) {
    let literal = quoted(&price);
    world.insert(&format!(
        "INSERT INTO sales_tariffs (name, price, description) \
         VALUES ('Цена', '{literal}', 'Проверка цены')"
    ));
}

#[when("a general question with {count} topic tags is inserted")]
fn a_general_question_with_topic_tags_is_inserted(world: &mut SchemaWorld, count: usize) {
    let topics = tag_list(&TOPICS, count);
    world.insert(&format!(
        "WITH category AS ( \
            INSERT INTO support_categories (name, description) \
            VALUES ('Billing', 'Оплата') RETURNING id \
         ) \
         INSERT INTO support_general \
            (category_id, question, answer, topic_tags, difficulty, component_tags, priority) \
         SELECT id, 'Вопрос', 'Ответ', ARRAY[{topics}]::topic_tag[], 'basic', \
            ARRAY['ui']::component_tag[], 1 FROM category"
    ));
}

#[when("a general question with {count} component tags is inserted")]
fn a_general_question_with_component_tags_is_inserted(world: &mut SchemaWorld, count: usize) {
    let components = tag_list(&COMPONENTS, count);
    world.insert(&format!(
        "INSERT INTO support_general \
            (question, answer, topic_tags, difficulty, component_tags, priority) \
         VALUES ('Компоненты', 'Ответ', ARRAY['usage']::topic_tag[], 'basic', \
            ARRAY[{components}]::component_tag[], 1)"
    ));
}

#[when("a general question with priority {priority} is inserted")]
fn a_general_question_with_priority_is_inserted(world: &mut SchemaWorld, priority: i32) {
    world.insert(&format!(
        "INSERT INTO support_general \
            (question, answer, topic_tags, difficulty, component_tags, priority) \
         VALUES ('Приоритет', 'Ответ', ARRAY['usage']::topic_tag[], 'basic', \
            ARRAY['ui']::component_tag[], {priority})"
    ));
}

#[when("a general question without category or priority is inserted")]
fn a_general_question_without_category_is_inserted(world: &mut SchemaWorld) {
    world.insert(
        "INSERT INTO support_general (question, answer, topic_tags, difficulty, component_tags) \
         VALUES ('Без категории', 'Ответ', ARRAY['usage']::topic_tag[], 'basic', \
            ARRAY['ui']::component_tag[])",
    );
}

#[when("a tariff question with priority {priority} is inserted")]
fn a_tariff_question_with_priority_is_inserted(world: &mut SchemaWorld, priority: i32) {
    world.insert(&format!(
        "WITH tariff AS ( \
            INSERT INTO sales_tariffs (name, price, description) \
            VALUES ('Бизнес', '4990 руб/мес', 'Для команд') RETURNING id \
         ) \
         INSERT INTO support_tariff_specific (tariff_id, question, answer, priority) \
         SELECT id, 'Есть ли API?', 'Да', {priority} FROM tariff"
    ));
}

#[when("a tariff question without a tariff is inserted")]
fn a_tariff_question_without_a_tariff_is_inserted(world: &mut SchemaWorld) {
    world.insert(
        "INSERT INTO support_tariff_specific (question, answer) \
         VALUES ('Общий вопрос по тарифам', 'Ответ')",
    );
}

#[when("a use case without a tariff is inserted")]
fn a_use_case_without_a_tariff_is_inserted(world: &mut SchemaWorld) {
    world.insert(
        "INSERT INTO tariff_use_cases (scenario, solution, target_audience) \
         VALUES ('Запуск', 'Шаблоны', 'Стартапы')",
    );
}

#[when("an action without a user is inserted")]
fn an_action_without_a_user_is_inserted(world: &mut SchemaWorld) {
    world.insert("INSERT INTO user_actions (action_type) VALUES ('startup')");
}

#[when("a feature in category \"{category}\" is inserted")]
fn a_feature_in_category_is_inserted(world: &mut SchemaWorld, category: String) {
    let literal = quoted(&category);
    world.insert(&format!(
        "INSERT INTO tariff_features (name, description, category) \
         VALUES ('Функция', 'Описание', '{literal}')"
    ));
}

#[when("a feature with a null creation time is inserted")]
fn a_feature_with_a_null_creation_time_is_inserted(world: &mut SchemaWorld) {
    world.insert(
        "INSERT INTO tariff_features (name, description, category, created_at) \
         VALUES ('Функция', 'Описание', 'UI', NULL)",
    );
}

#[when("a support category named \"{name}\" is inserted")]
fn a_support_category_named_is_inserted(world: &mut SchemaWorld, name: String) {
    let literal = quoted(&name);
    world.insert(&format!(
        "INSERT INTO support_categories (name, description) VALUES ('{literal}', 'Описание')"
    ));
}

#[when("a \"{relation}\" relation from \"{source}\" to \"{target}\" is inserted")]
fn a_relation_is_inserted(
    world: &mut SchemaWorld,
    relation: String,
    source: String,
    target: String,
) {
    let (relation, source, target) = (quoted(&relation), quoted(&source), quoted(&target));
    world.insert(&format!(
        "INSERT INTO support_question_relations \
            (source_id, target_id, relation_type, source_type, target_type) \
         VALUES (1, 2, '{relation}', '{source}', '{target}')"
    ));
}

#[when("a chat history holding a JSON object is stored")]
fn a_chat_history_holding_an_object_is_stored(world: &mut SchemaWorld) {
    world.insert(
        "INSERT INTO chat_history (user_id, history) VALUES (7, '{\"role\": \"user\"}'::jsonb)",
    );
}

#[when("a message replying to itself is inserted")]
fn a_message_replying_to_itself_is_inserted(world: &mut SchemaWorld) {
    world.insert(
        "INSERT INTO messages (id, user_id, role, content, parent_message_id) \
         VALUES (999, 1, 'user', 'Привет', 999)",
    );
}

#[then("the insert succeeds")]
fn the_insert_succeeds(world: &mut SchemaWorld) {
    let Some(outcome) = world.outcome() else {
        return;
    };
    assert_eq!(outcome.as_ref().ok(), Some(&1), "unexpected outcome: {outcome:?}");
}

#[then("the insert is rejected by {constraint}")]
fn the_insert_is_rejected_by(world: &mut SchemaWorld, constraint: String) {
    let Some(outcome) = world.outcome() else {
        return;
    };
    let error = outcome.as_ref().expect_err("insert should be rejected");
    assert!(
        error.contains(&format!("constraint: {constraint}")),
        "expected {constraint}, got: {error}"
    );
}

#[then("the insert is rejected for a null {column}")]
fn the_insert_is_rejected_for_a_null(world: &mut SchemaWorld, column: String) {
    let Some(outcome) = world.outcome() else {
        return;
    };
    let error = outcome.as_ref().expect_err("insert should be rejected");
    assert!(
        error.contains("23502") && error.contains(&format!("column \"{column}\"")),
        "expected a not-null violation on {column}, got: {error}"
    );
}

#[scenario(
    path = "tests/features/schema_constraints.feature",
    name = "User limits outside one to one hundred are rejected"
)]
fn user_limit_zero_is_rejected(world: SchemaWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/schema_constraints.feature",
    name = "User limits above one hundred are rejected"
)]
fn user_limit_above_range_is_rejected(world: SchemaWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/schema_constraints.feature",
    name = "The upper user limit is accepted"
)]
fn upper_user_limit_is_accepted(world: SchemaWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/schema_constraints.feature",
    name = "Prices must be monthly roubles or on request"
)]
fn malformed_price_is_rejected(world: SchemaWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/schema_constraints.feature",
    name = "On-request prices are accepted"
)]
fn on_request_price_is_accepted(world: SchemaWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/schema_constraints.feature",
    name = "General questions need at least one topic tag"
)]
fn empty_topic_tags_are_rejected(world: SchemaWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/schema_constraints.feature",
    name = "General questions allow at most three topic tags"
)]
fn four_topic_tags_are_rejected(world: SchemaWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/schema_constraints.feature",
    name = "Three topic tags are accepted"
)]
fn three_topic_tags_are_accepted(world: SchemaWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/schema_constraints.feature",
    name = "General questions need at least one component tag"
)]
fn empty_component_tags_are_rejected(world: SchemaWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/schema_constraints.feature",
    name = "General questions allow at most three component tags"
)]
fn four_component_tags_are_rejected(world: SchemaWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/schema_constraints.feature",
    name = "Three component tags are accepted"
)]
fn three_component_tags_are_accepted(world: SchemaWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/schema_constraints.feature",
    name = "General question priorities below zero are rejected"
)]
fn negative_general_priority_is_rejected(world: SchemaWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/schema_constraints.feature",
    name = "General question priorities above five are rejected"
)]
fn general_priority_above_five_is_rejected(world: SchemaWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/schema_constraints.feature",
    name = "General question priority zero is accepted"
)]
fn general_priority_zero_is_accepted(world: SchemaWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/schema_constraints.feature",
    name = "General question priority five is accepted"
)]
fn general_priority_five_is_accepted(world: SchemaWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/schema_constraints.feature",
    name = "Tariff question priorities above five are rejected"
)]
fn tariff_priority_above_five_is_rejected(world: SchemaWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/schema_constraints.feature",
    name = "Tariff question priorities below zero are rejected"
)]
fn negative_tariff_priority_is_rejected(world: SchemaWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/schema_constraints.feature",
    name = "Tariff question priority five is accepted"
)]
fn tariff_priority_five_is_accepted(world: SchemaWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/schema_constraints.feature",
    name = "Feature categories come from a fixed list"
)]
fn unknown_feature_category_is_rejected(world: SchemaWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/schema_constraints.feature",
    name = "Listed feature categories are accepted"
)]
fn listed_feature_category_is_accepted(world: SchemaWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/schema_constraints.feature",
    name = "Support category names come from a fixed list"
)]
fn unknown_support_category_is_rejected(world: SchemaWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/schema_constraints.feature",
    name = "Listed support category names are accepted"
)]
fn listed_support_category_is_accepted(world: SchemaWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/schema_constraints.feature",
    name = "Relation types come from a fixed list"
)]
fn unknown_relation_type_is_rejected(world: SchemaWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/schema_constraints.feature",
    name = "Relation sources must name a question table"
)]
fn unknown_relation_source_is_rejected(world: SchemaWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/schema_constraints.feature",
    name = "Relation targets must name a question table"
)]
fn unknown_relation_target_is_rejected(world: SchemaWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/schema_constraints.feature",
    name = "Listed relation kinds are accepted"
)]
fn listed_relation_kinds_are_accepted(world: SchemaWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/schema_constraints.feature",
    name = "General questions may omit category and priority"
)]
fn general_question_without_category_is_accepted(world: SchemaWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/schema_constraints.feature",
    name = "Use cases may omit their tariff"
)]
fn use_case_without_tariff_is_accepted(world: SchemaWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/schema_constraints.feature",
    name = "Tariff questions may omit their tariff and priority"
)]
fn tariff_question_without_tariff_is_accepted(world: SchemaWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/schema_constraints.feature",
    name = "Actions may omit the user"
)]
fn action_without_user_is_accepted(world: SchemaWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/schema_constraints.feature",
    name = "Creation times are always recorded"
)]
fn null_creation_time_is_rejected(world: SchemaWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/schema_constraints.feature",
    name = "Chat histories must be JSON arrays"
)]
fn non_array_chat_history_is_rejected(world: SchemaWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/schema_constraints.feature",
    name = "Messages cannot reply to themselves"
)]
fn self_reply_is_rejected(world: SchemaWorld) {
    let _ = world;
}
