//! End-to-end ingestion of one report: decode, aggregate, build and save.

use std::io::Read;

use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::Storage;
use crate::error::IngestError;
use crate::models::{PersistableAggregate, RunParams, SuiteResult};
use crate::report;
use crate::services::{aggregator, result_builder};

/// Summary of a saved run.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct IngestOutcome {
    pub suite_result_id: Uuid,
    pub executed: u32,
    pub passed: u32,
    pub failed: u32,
    pub skipped: u32,
    /// Number of scenario results saved
    pub scenarios: usize,
    /// Number of distinct features linked by this run
    pub features: usize,
}

/// Decode the report and assemble everything the run will persist.
/// Nothing is written.
pub fn prepare<R: Read>(params: &RunParams, reader: R) -> Result<PersistableAggregate, IngestError> {
    let report = report::decode(reader, &params.report_format)?;
    let (totals, scenario_results) = aggregator::aggregate(&report);
    let suite = SuiteResult::new(params, totals);
    Ok(result_builder::build(suite, scenario_results, &params.jira))
}

/// Ingest one report into the given storage.
///
/// A decode failure returns before anything is written; a save failure leaves
/// the storage unchanged.
pub async fn ingest<S, R>(
    storage: &S,
    params: &RunParams,
    reader: R,
) -> Result<IngestOutcome, IngestError>
where
    S: Storage + ?Sized,
    R: Read,
{
    let mut aggregate = prepare(params, reader)?;
    let receipt = storage.save_atomically(&mut aggregate).await?;

    let totals = aggregate.suite.totals;
    let outcome = IngestOutcome {
        suite_result_id: receipt.suite_result_id,
        executed: totals.executed,
        passed: totals.passed,
        failed: totals.failed,
        skipped: totals.skipped,
        scenarios: aggregate.scenario_results.len(),
        features: aggregate.feature_ids().len(),
    };

    info!(
        "Saved suite result {} for {}/{}: executed={} passed={} failed={} skipped={}",
        outcome.suite_result_id,
        aggregate.suite.service,
        aggregate.suite.test_type,
        outcome.executed,
        outcome.passed,
        outcome.failed,
        outcome.skipped
    );

    Ok(outcome)
}
