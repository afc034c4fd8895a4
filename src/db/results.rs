//! sea-orm implementation of [`ResultStore`].

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ConnectionTrait, EntityTrait, Set};
use tracing::debug;
use uuid::Uuid;

use crate::entity::feature::{self, Entity as FeatureEntity};
use crate::entity::feature_scenario::{self, Entity as FeatureScenario};
use crate::entity::scenario::{self, Entity as ScenarioEntity};
use crate::entity::scenario_result::{self, Entity as ScenarioResultEntity};
use crate::entity::suite_result::{self, Entity as SuiteResultEntity};
use crate::error::SaveError;
use crate::models::{Feature, Scenario, ScenarioResult, SuiteResult};

use super::ResultStore;

/// Rows per multi-row insert, keeping well under the PostgreSQL bind limit.
const INSERT_CHUNK: usize = 1000;

/// Store backed by any sea-orm connection, usually a transaction.
pub struct SeaOrmStore<'c, C> {
    conn: &'c C,
}

impl<'c, C> SeaOrmStore<'c, C>
where
    C: ConnectionTrait,
{
    pub fn new(conn: &'c C) -> Self {
        SeaOrmStore { conn }
    }

    /// Insert the scenario or return the identity of the existing row with
    /// the same (name, test_type, service). The id comes back through
    /// `RETURNING`, so a conflicting row keeps its original identity.
    async fn upsert_scenario(&self, scenario: &Scenario) -> Result<Uuid, SaveError> {
        let now = Utc::now();
        let model = scenario::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(scenario.name.clone()),
            test_type: Set(scenario.test_type.clone()),
            service: Set(scenario.service.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let saved = ScenarioEntity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    scenario::Column::Name,
                    scenario::Column::TestType,
                    scenario::Column::Service,
                ])
                .update_column(scenario::Column::Name)
                .to_owned(),
            )
            .exec_with_returning(self.conn)
            .await?;

        Ok(saved.id)
    }

    /// Ensure each feature exists and is linked to the scenario.
    async fn link_features(&self, scenario_id: Uuid, features: &[Feature]) -> Result<(), SaveError> {
        if features.is_empty() {
            return Ok(());
        }

        let now = Utc::now();
        FeatureEntity::insert_many(features.iter().map(|f| feature::ActiveModel {
            id: Set(f.id.clone()),
            title: Set(f.title.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        }))
        .on_conflict(
            OnConflict::column(feature::Column::Id)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(self.conn)
        .await?;

        FeatureScenario::insert_many(features.iter().map(|f| feature_scenario::ActiveModel {
            feature_id: Set(f.id.clone()),
            scenario_id: Set(scenario_id),
        }))
        .on_conflict(
            OnConflict::columns([
                feature_scenario::Column::FeatureId,
                feature_scenario::Column::ScenarioId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(self.conn)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl<C> ResultStore for SeaOrmStore<'_, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn upsert_scenarios(&self, scenarios: &[Scenario]) -> Result<Vec<Uuid>, SaveError> {
        let mut ids = Vec::with_capacity(scenarios.len());
        for scenario in scenarios {
            let id = self.upsert_scenario(scenario).await?;
            self.link_features(id, &scenario.features).await?;
            ids.push(id);
        }
        debug!("Upserted {} scenarios", ids.len());
        Ok(ids)
    }

    async fn insert_suite_result(
        &self,
        suite: &SuiteResult,
        results: &[ScenarioResult],
    ) -> Result<Uuid, SaveError> {
        let suite_result_id = Uuid::now_v7();
        let model = suite_result::ActiveModel {
            id: Set(suite_result_id),
            build: Set(suite.build.clone()),
            environment: Set(suite.environment.clone()),
            service: Set(suite.service.clone()),
            test_type: Set(suite.test_type.clone()),
            coverage: Set(suite.coverage),
            executed: Set(i64::from(suite.totals.executed)),
            passed: Set(i64::from(suite.totals.passed)),
            failed: Set(i64::from(suite.totals.failed)),
            skipped: Set(i64::from(suite.totals.skipped)),
            time_taken: Set(suite.totals.time_taken),
            created_at: Set(suite.created_at),
            updated_at: Set(suite.updated_at),
        };
        SuiteResultEntity::insert(model)
            .exec_without_returning(self.conn)
            .await?;

        let now = Utc::now();
        let rows = results
            .iter()
            .map(|result| {
                let scenario_id = result
                    .scenario_id
                    .ok_or_else(|| SaveError::MissingIdentity(result.name.clone()))?;
                Ok(scenario_result::ActiveModel {
                    id: Set(Uuid::now_v7()),
                    suite_result_id: Set(suite_result_id),
                    scenario_id: Set(scenario_id),
                    name: Set(result.name.clone()),
                    classname: Set(result.classname.clone()),
                    status: Set(result.status.as_str().to_string()),
                    time_taken: Set(result.time_taken),
                    created_at: Set(now),
                    updated_at: Set(now),
                })
            })
            .collect::<Result<Vec<_>, SaveError>>()?;

        for chunk in rows.chunks(INSERT_CHUNK) {
            ScenarioResultEntity::insert_many(chunk.to_vec())
                .exec_without_returning(self.conn)
                .await?;
        }

        Ok(suite_result_id)
    }
}
