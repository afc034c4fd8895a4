//! Storage capabilities the ingestion core depends on.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::SaveError;
use crate::models::{PersistableAggregate, SaveReceipt, Scenario, ScenarioResult, SuiteResult};

/// Row-level operations needed to persist one aggregate.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Insert-or-fetch each scenario keyed by (name, test type, service),
    /// together with its features and feature links. Returns one identity
    /// per input scenario, in input order.
    async fn upsert_scenarios(&self, scenarios: &[Scenario]) -> Result<Vec<Uuid>, SaveError>;

    /// Insert the suite result and its scenario results, which must already
    /// carry their scenario identity. Returns the new suite result identity.
    async fn insert_suite_result(
        &self,
        suite: &SuiteResult,
        results: &[ScenarioResult],
    ) -> Result<Uuid, SaveError>;
}

/// A storage backend able to save whole aggregates.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Check that the backend is reachable.
    async fn ping(&self) -> Result<(), SaveError>;

    /// Save the aggregate so that either all of it or none of it is visible.
    async fn save_atomically(
        &self,
        aggregate: &mut PersistableAggregate,
    ) -> Result<SaveReceipt, SaveError>;
}
