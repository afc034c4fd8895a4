//! Saves through the PostgreSQL backend. Needs `DATABASE_URL` or the `DB_*`
//! variables; skipped otherwise.

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use treco::entity::{feature, feature_scenario, scenario, scenario_result, suite_result};
use treco::error::{IngestError, SaveError};
use treco::services::ingest;
use uuid::Uuid;

use super::test_helpers::{create_test_pool, params, unique_service, SAMPLE};

#[tokio::test]
async fn test_saving_same_report_twice_reuses_scenarios() {
    let Some(pool) = create_test_pool().await else {
        return;
    };
    let mut params = params("junit");
    params.service = unique_service("onboarding");

    let first = ingest(&pool, &params, SAMPLE.as_bytes()).await.unwrap();
    let second = ingest(&pool, &params, SAMPLE.as_bytes()).await.unwrap();
    assert_ne!(first.suite_result_id, second.suite_result_id);

    let db = pool.connection();
    let scenarios = scenario::Entity::find()
        .filter(scenario::Column::Service.eq(params.service.as_str()))
        .all(db)
        .await
        .unwrap();
    assert_eq!(scenarios.len(), 5);

    let suites = suite_result::Entity::find()
        .filter(suite_result::Column::Service.eq(params.service.as_str()))
        .count(db)
        .await
        .unwrap();
    assert_eq!(suites, 2);

    let ids: Vec<Uuid> = scenarios.iter().map(|s| s.id).collect();
    let links = feature_scenario::Entity::find()
        .filter(feature_scenario::Column::ScenarioId.is_in(ids.clone()))
        .all(db)
        .await
        .unwrap();
    let mut linked: Vec<_> = links.iter().map(|l| l.feature_id.as_str()).collect();
    linked.sort();
    assert_eq!(linked, vec!["DAKOTA-1", "DAKOTA-1", "DAKOTA-2", "DAKOTA-3"]);

    // Both runs point their results at the same five scenarios
    let results = scenario_result::Entity::find()
        .filter(scenario_result::Column::ScenarioId.is_in(ids))
        .count(db)
        .await
        .unwrap();
    assert_eq!(results, 10);
}

#[tokio::test]
async fn test_failed_suite_insert_rolls_back_scenarios() {
    let Some(pool) = create_test_pool().await else {
        return;
    };
    let mut params = params("junit");
    params.service = unique_service("rollback");
    // Passes the scenarios insert but violates the suite_results check
    params.test_type = "smoke".to_string();

    let err = ingest(&pool, &params, SAMPLE.as_bytes()).await.unwrap_err();
    assert!(matches!(err, IngestError::Save(SaveError::Database(_))));

    let db = pool.connection();
    let scenarios = scenario::Entity::find()
        .filter(scenario::Column::Service.eq(params.service.as_str()))
        .count(db)
        .await
        .unwrap();
    assert_eq!(scenarios, 0);

    let suites = suite_result::Entity::find()
        .filter(suite_result::Column::Service.eq(params.service.as_str()))
        .count(db)
        .await
        .unwrap();
    assert_eq!(suites, 0);
}

#[tokio::test]
async fn test_long_run_values_and_tickets_are_stored() {
    let Some(pool) = create_test_pool().await else {
        return;
    };
    let prefix = format!("P{}", "X".repeat(80));
    let ticket = format!("{}-7", prefix);
    let report = format!(
        r#"<testsuite name="long" tests="1"><testcase name="covers {}"/></testsuite>"#,
        ticket
    );

    let mut params = params("junit");
    params.service = unique_service(&"s".repeat(300));
    params.build = "b".repeat(300);
    params.environment = "e".repeat(150);
    params.jira = prefix;

    let outcome = ingest(&pool, &params, report.as_bytes()).await.unwrap();
    assert_eq!(outcome.features, 1);

    let db = pool.connection();
    let suite = suite_result::Entity::find_by_id(outcome.suite_result_id)
        .one(db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(suite.build.len(), 300);
    assert_eq!(suite.environment.len(), 150);

    let stored = feature::Entity::find_by_id(ticket).one(db).await.unwrap();
    assert!(stored.is_some());
}
