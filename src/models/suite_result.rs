//! Suite-level aggregate of one ingestion run.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{RunParams, Scenario, ScenarioResult};

/// Totals folded over every suite of a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, ToSchema)]
pub struct SuiteTotals {
    pub executed: u32,
    pub passed: u32,
    pub failed: u32,
    pub skipped: u32,
    /// Sum of suite times in seconds.
    pub time_taken: f64,
}

/// Execution summary persisted once per ingestion run.
#[derive(Debug, Clone, PartialEq)]
pub struct SuiteResult {
    pub id: Option<Uuid>,
    pub build: String,
    pub environment: String,
    /// Lower-cased service name.
    pub service: String,
    /// Lower-cased test type.
    pub test_type: String,
    pub coverage: Option<f64>,
    pub totals: SuiteTotals,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SuiteResult {
    /// Create the suite result for a run from its parameters and computed totals.
    pub fn new(params: &RunParams, totals: SuiteTotals) -> Self {
        let now = Utc::now();
        SuiteResult {
            id: None,
            build: params.build.clone(),
            environment: params.environment.clone(),
            service: params.service.to_lowercase(),
            test_type: params.test_type.to_lowercase(),
            coverage: params.coverage,
            totals,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Everything one run persists. `scenarios[i]` is the dimension row for
/// `scenario_results[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistableAggregate {
    pub suite: SuiteResult,
    pub scenario_results: Vec<ScenarioResult>,
    pub scenarios: Vec<Scenario>,
}

impl PersistableAggregate {
    /// Distinct feature IDs referenced by this run, in first-seen order.
    pub fn feature_ids(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.scenarios
            .iter()
            .flat_map(|s| s.features.iter())
            .map(|f| f.id.as_str())
            .filter(|id| seen.insert(*id))
            .collect()
    }
}

/// Identities issued by the store for a saved aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReceipt {
    pub suite_result_id: Uuid,
    pub scenario_ids: Vec<Uuid>,
}
