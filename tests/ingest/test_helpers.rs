//! Shared fixtures and the in-memory storage backend.

use std::collections::BTreeSet;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use treco::config::{Config, ConfigError};
use treco::db::{DbPool, ResultStore, Storage};
use treco::error::SaveError;
use treco::models::{
    PersistableAggregate, RunParams, SaveReceipt, Scenario, ScenarioResult, SuiteResult,
};
use treco::services::result_builder;
use uuid::Uuid;

/// Five cases: one error, one skipped, one failure, two passes.
pub const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<testsuite skipped="1" hostname="testHost" name="dakota.app.ui.tests.TestsForOnboarding" tests="5" failures="1" timestamp="2021-03-23T19:25:34 SGT" time="6.286" errors="1">
    <testcase name="test_with_error (DAKOTA-1)" time="6.286" classname="some.test.Class">
        <error type="org.openqa.selenium.WebDriverException" message="An unknown server-side error occurred"/>
    </testcase>
    <testcase name="test_skipped" time="0.0" classname="some.test.Class">
        <skipped/>
    </testcase>
    <testcase name="test_failed dakota-2" time="2.123" classname="some.test.Class">
        <failure message="expected true"/>
    </testcase>
    <testcase name="test_passed_1" time="1.987" classname="some.test.Class" features="DAKOTA-1 DAKOTA-3"/>
    <testcase name="test_passed_2" time="3.14" classname="some.test.Class"/>
</testsuite>
"#;

/// Two suites, cases in document order a1, a2, b1.
pub const TWO_SUITES: &str = r#"<testsuites>
    <testsuite name="A" tests="2" failures="1" time="1.5">
        <testcase name="a1" time="0.5"/>
        <testcase name="a2" time="1.0"><failure/></testcase>
    </testsuite>
    <testsuite name="B" tests="1" skipped="1" time="0">
        <testcase name="b1"><skipped/></testcase>
    </testsuite>
</testsuites>
"#;

/// Validated run parameters for the given report format.
pub fn params(format: &str) -> RunParams {
    RunParams {
        build: "build-42".to_string(),
        environment: "dev".to_string(),
        jira: "DAKOTA".to_string(),
        report_format: format.to_string(),
        service: "Onboarding".to_string(),
        test_type: "E2E".to_string(),
        coverage: Some(81.5),
    }
}

static MIGRATIONS_RUN: OnceCell<()> = OnceCell::const_new();

/// Create a fresh DB pool. Migrations run only once.
///
/// Returns `None` when neither `DATABASE_URL` nor the `DB_*` variables are
/// set, so the PostgreSQL tests are skipped on machines without a database.
pub async fn create_test_pool() -> Option<DbPool> {
    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(ConfigError::MissingDatabase) => {
            eprintln!("skipping: no PostgreSQL configured");
            return None;
        }
        Err(e) => panic!("Failed to load config: {}", e),
    };
    config.database.max_connections = 2;
    config.database.min_connections = 1;

    let pool = DbPool::new(&config)
        .await
        .expect("Failed to connect to database");

    MIGRATIONS_RUN
        .get_or_init(|| async {
            pool.run_migrations()
                .await
                .expect("Failed to run migrations");
        })
        .await;

    Some(pool)
}

/// Generate a unique service name for test isolation.
pub fn unique_service(prefix: &str) -> String {
    format!(
        "{}-{}",
        prefix,
        Uuid::new_v4().to_string().split('-').next().unwrap()
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredScenario {
    pub id: Uuid,
    pub name: String,
    pub test_type: String,
    pub service: String,
}

/// Committed contents of the in-memory backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    pub scenarios: Vec<StoredScenario>,
    pub features: BTreeSet<String>,
    pub feature_links: BTreeSet<(String, Uuid)>,
    pub suite_results: Vec<(Uuid, SuiteResult)>,
    pub scenario_results: Vec<ScenarioResult>,
}

/// Storage keeping everything in memory. Each save works on a copy of the
/// state which replaces the committed state only when the save succeeds.
#[derive(Default)]
pub struct MemoryStorage {
    state: Mutex<MemoryState>,
    fail_suite_insert: bool,
    unreachable: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend whose suite result insert always fails, after scenarios were
    /// already upserted.
    pub fn failing() -> Self {
        MemoryStorage {
            fail_suite_insert: true,
            ..Self::default()
        }
    }

    /// Backend that fails its readiness ping.
    pub fn unreachable() -> Self {
        MemoryStorage {
            unreachable: true,
            ..Self::default()
        }
    }

    pub fn snapshot(&self) -> MemoryState {
        self.state.lock().unwrap().clone()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn ping(&self) -> Result<(), SaveError> {
        if self.unreachable {
            return Err(SaveError::Backend("connection refused".to_string()));
        }
        Ok(())
    }

    async fn save_atomically(
        &self,
        aggregate: &mut PersistableAggregate,
    ) -> Result<SaveReceipt, SaveError> {
        let staging = Staging {
            state: Mutex::new(self.snapshot()),
            fail_suite_insert: self.fail_suite_insert,
        };
        let receipt = result_builder::save(aggregate, &staging).await?;
        *self.state.lock().unwrap() = staging.state.into_inner().unwrap();
        Ok(receipt)
    }
}

/// Uncommitted copy of the state used during one save.
struct Staging {
    state: Mutex<MemoryState>,
    fail_suite_insert: bool,
}

#[async_trait]
impl ResultStore for Staging {
    async fn upsert_scenarios(&self, scenarios: &[Scenario]) -> Result<Vec<Uuid>, SaveError> {
        let mut state = self.state.lock().unwrap();
        let mut ids = Vec::with_capacity(scenarios.len());
        for scenario in scenarios {
            let existing = state.scenarios.iter().find(|s| {
                s.name == scenario.name
                    && s.test_type == scenario.test_type
                    && s.service == scenario.service
            });
            let id = match existing {
                Some(s) => s.id,
                None => {
                    let id = Uuid::now_v7();
                    state.scenarios.push(StoredScenario {
                        id,
                        name: scenario.name.clone(),
                        test_type: scenario.test_type.clone(),
                        service: scenario.service.clone(),
                    });
                    id
                }
            };
            for feature in &scenario.features {
                state.features.insert(feature.id.clone());
                state.feature_links.insert((feature.id.clone(), id));
            }
            ids.push(id);
        }
        Ok(ids)
    }

    async fn insert_suite_result(
        &self,
        suite: &SuiteResult,
        results: &[ScenarioResult],
    ) -> Result<Uuid, SaveError> {
        if self.fail_suite_insert {
            return Err(SaveError::Backend("disk full".to_string()));
        }
        let mut state = self.state.lock().unwrap();
        let id = Uuid::now_v7();
        state.suite_results.push((id, suite.clone()));
        for result in results {
            if result.scenario_id.is_none() {
                return Err(SaveError::MissingIdentity(result.name.clone()));
            }
            let mut stored = result.clone();
            stored.suite_result_id = Some(id);
            state.scenario_results.push(stored);
        }
        Ok(id)
    }
}
