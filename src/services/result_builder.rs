//! Assembles the persistable aggregate of a run and saves it through a
//! [`ResultStore`].

use std::collections::HashSet;

use tracing::{debug, info};

use crate::db::ResultStore;
use crate::error::SaveError;
use crate::models::{
    Feature, PersistableAggregate, SaveReceipt, Scenario, ScenarioResult, SuiteResult,
};
use crate::services::features::FeatureMatcher;

/// Attach a scenario dimension record, with its features, to every scenario
/// result of the run.
pub fn build(
    suite: SuiteResult,
    scenario_results: Vec<ScenarioResult>,
    jira_prefix: &str,
) -> PersistableAggregate {
    let matcher = FeatureMatcher::new(jira_prefix);

    let scenarios = scenario_results
        .iter()
        .map(|result| Scenario {
            id: None,
            name: result.name.clone(),
            test_type: suite.test_type.clone(),
            service: suite.service.clone(),
            features: features_for(&matcher, result),
        })
        .collect();

    PersistableAggregate {
        suite,
        scenario_results,
        scenarios,
    }
}

/// Features of one scenario result: its explicit tags when it has any,
/// otherwise the tickets named in the scenario name. Repeated tickets are
/// kept once.
pub fn features_for(matcher: &FeatureMatcher, result: &ScenarioResult) -> Vec<Feature> {
    let ids = if result.features.is_empty() {
        matcher.from_text(&result.name)
    } else {
        matcher.from_tags(&result.features)
    };

    let mut seen = HashSet::new();
    ids.into_iter()
        .filter(|id| seen.insert(id.clone()))
        .map(Feature::new)
        .collect()
}

/// Persist an aggregate.
///
/// Scenarios are upserted first; their identities are stamped onto the
/// scenario results, which are then inserted together with the suite result.
/// The first storage error aborts the save and is returned unchanged.
pub async fn save<S>(
    aggregate: &mut PersistableAggregate,
    store: &S,
) -> Result<SaveReceipt, SaveError>
where
    S: ResultStore + ?Sized,
{
    info!(
        "Upserting {} scenarios for service {}",
        aggregate.scenarios.len(),
        aggregate.suite.service
    );
    let scenario_ids = store.upsert_scenarios(&aggregate.scenarios).await?;
    if scenario_ids.len() != aggregate.scenarios.len() {
        return Err(SaveError::IdentityMismatch {
            expected: aggregate.scenarios.len(),
            returned: scenario_ids.len(),
        });
    }

    for ((scenario, result), id) in aggregate
        .scenarios
        .iter_mut()
        .zip(aggregate.scenario_results.iter_mut())
        .zip(&scenario_ids)
    {
        scenario.id = Some(*id);
        result.scenario_id = Some(*id);
    }

    debug!("Inserting suite result for build {}", aggregate.suite.build);
    let suite_result_id = store
        .insert_suite_result(&aggregate.suite, &aggregate.scenario_results)
        .await?;

    aggregate.suite.id = Some(suite_result_id);
    for result in &mut aggregate.scenario_results {
        result.suite_result_id = Some(suite_result_id);
    }

    Ok(SaveReceipt {
        suite_result_id,
        scenario_ids,
    })
}
