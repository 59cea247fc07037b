//! Behavioural tests for the drop-and-recreate provisioning run.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use pg_embedded_setup_unpriv::TestCluster;
use postgres::{Client, NoTls};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use salesdesk::config::ProvisionSettings;
use salesdesk::domain::SchemaDiagram;
use salesdesk::domain::ports::SchemaSnapshotRepository;
use salesdesk::outbound::persistence::PostgresSchemaSnapshotRepository;
use salesdesk::provisioning::{ProvisionPlan, Provisioner, schema_fingerprint};

mod support;

use support::{format_postgres_error, handle_cluster_setup_failure, test_cluster};

const DB_NAME: &str = "kb_provisioned";
const DB_USER: &str = "kb_owner";
const FTS_INDEXES: [(&str, &str); 6] = [
    ("sales_tariffs", "idx_tariff_fts"),
    ("tariff_features", "idx_feature_fts"),
    ("tariff_use_cases", "idx_usecase_fts"),
    ("support_general", "idx_support_general_fts"),
    ("support_tariff_specific", "idx_support_tariff_fts"),
    ("messages", "idx_messages_fts"),
];

struct ProvisioningWorld {
    cluster: Option<TestCluster>,
    setup_error: Option<String>,
    snapshots: Vec<SchemaDiagram>,
    target_url: Option<String>,
}

impl ProvisioningWorld {
    fn cluster(&self) -> Option<&TestCluster> {
        if self.cluster.is_none() {
            let reason = self.setup_error.as_deref().unwrap_or("unknown reason");
            eprintln!("SKIP-TEST-CLUSTER: scenario skipped ({reason})");
        }
        self.cluster.as_ref()
    }

    fn provision(&mut self, with_indexes: bool) {
        let Some(cluster) = self.cluster() else {
            return;
        };
        let settings = ProvisionSettings {
            admin_url: Some(cluster.connection().database_url("postgres")),
            db_name: Some(DB_NAME.to_owned()),
            db_user: Some(DB_USER.to_owned()),
            db_password: Some("it's-a-secret".to_owned()),
            db_host: None,
            db_port: None,
        };
        let target = settings.target().expect("valid target");
        let connections = settings.connections(&target).expect("connections");
        let target_url = connections.target_url.as_str().to_owned();

        let report = Provisioner::new(connections, ProvisionPlan::new(&target, with_indexes))
            .run()
            .expect("provisioning should succeed");
        assert_eq!(report.indexes_applied, with_indexes);
        assert_eq!(report.migrations_applied.len(), 1);

        let diagram = PostgresSchemaSnapshotRepository::new(target_url.as_str())
            .load_schema_diagram()
            .expect("introspect provisioned schema");
        self.snapshots.push(diagram);
        self.target_url = Some(target_url);
    }

    fn target_client(&self) -> Option<Client> {
        self.cluster()?;
        let url = self.target_url.as_deref().expect("provisioned target");
        Some(
            Client::connect(url, NoTls)
                .unwrap_or_else(|err| panic!("connect: {}", format_postgres_error(&err))),
        )
    }

    fn latest(&self) -> Option<&SchemaDiagram> {
        self.cluster()?;
        Some(self.snapshots.last().expect("a provisioning run"))
    }
}

#[fixture]
fn world() -> ProvisioningWorld {
    match test_cluster() {
        Ok(cluster) => ProvisioningWorld {
            cluster: Some(cluster),
            setup_error: None,
            snapshots: Vec::new(),
            target_url: None,
        },
        Err(reason) => {
            let _: Option<()> = handle_cluster_setup_failure(&reason);
            ProvisioningWorld {
                cluster: None,
                setup_error: Some(reason),
                snapshots: Vec::new(),
                target_url: None,
            }
        }
    }
}

#[given("an embedded PostgreSQL server")]
fn an_embedded_postgresql_server(world: &mut ProvisioningWorld) {
    let _ = world;
}

#[when("the knowledge base is provisioned")]
fn the_knowledge_base_is_provisioned(world: &mut ProvisioningWorld) {
    world.provision(true);
}

#[when("the knowledge base is provisioned again")]
fn the_knowledge_base_is_provisioned_again(world: &mut ProvisioningWorld) {
    world.provision(true);
}

#[when("the knowledge base is provisioned without indexes")]
fn the_knowledge_base_is_provisioned_without_indexes(world: &mut ProvisioningWorld) {
    world.provision(false);
}

#[when("a tariff row is stored")]
fn a_tariff_row_is_stored(world: &mut ProvisioningWorld) {
    let Some(mut client) = world.target_client() else {
        return;
    };
    client
        .execute(
            "INSERT INTO sales_tariffs (name, price, description) VALUES ($1, $2, $3)",
            &[&"Старт", &"990 руб/мес", &"Для небольших команд"],
        )
        .unwrap_or_else(|err| panic!("insert tariff: {}", format_postgres_error(&err)));
}

#[then("both runs report the same schema fingerprint")]
fn both_runs_report_the_same_schema_fingerprint(world: &mut ProvisioningWorld) {
    if world.cluster().is_none() {
        return;
    }
    let [first, second] = world.snapshots.as_slice() else {
        panic!("expected two provisioning runs");
    };
    assert_eq!(first.normalized(), second.normalized());
    assert_eq!(schema_fingerprint(first), schema_fingerprint(second));
}

#[then("the schema has {count} tables")]
fn the_schema_has_tables(world: &mut ProvisioningWorld, count: usize) {
    let Some(diagram) = world.latest() else {
        return;
    };
    let names: Vec<&str> = diagram.tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names.len(), count, "tables: {names:?}");
}

#[then("full-text indexes exist on every searchable table")]
fn full_text_indexes_exist(world: &mut ProvisioningWorld) {
    let Some(diagram) = world.latest() else {
        return;
    };
    for (table, index) in FTS_INDEXES {
        assert!(
            diagram.index_names(table).contains(index),
            "{table} is missing {index}"
        );
    }
}

#[then("no full-text indexes exist")]
fn no_full_text_indexes_exist(world: &mut ProvisioningWorld) {
    let Some(diagram) = world.latest() else {
        return;
    };
    for (table, index) in FTS_INDEXES {
        assert!(!diagram.index_names(table).contains(index));
    }
}

#[then("no tariff rows remain")]
fn no_tariff_rows_remain(world: &mut ProvisioningWorld) {
    let Some(mut client) = world.target_client() else {
        return;
    };
    let count: i64 = client
        .query_one("SELECT count(*) FROM sales_tariffs", &[])
        .expect("count tariffs")
        .get(0);
    assert_eq!(count, 0);
}

#[then("the application role owns the tables")]
fn the_application_role_owns_the_tables(world: &mut ProvisioningWorld) {
    let Some(mut client) = world.target_client() else {
        return;
    };
    let foreign_owned: i64 = client
        .query_one(
            "SELECT count(*) FROM pg_tables WHERE schemaname = 'public' AND tableowner <> $1",
            &[&DB_USER],
        )
        .expect("count table owners")
        .get(0);
    assert_eq!(foreign_owned, 0);
}

#[scenario(
    path = "tests/features/provisioning.feature",
    name = "Provisioning twice yields an identical schema"
)]
fn provisioning_twice_yields_an_identical_schema(world: ProvisioningWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/provisioning.feature",
    name = "Reprovisioning discards existing rows"
)]
fn reprovisioning_discards_existing_rows(world: ProvisioningWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/provisioning.feature",
    name = "Index creation can be skipped"
)]
fn index_creation_can_be_skipped(world: ProvisioningWorld) {
    let _ = world;
}
