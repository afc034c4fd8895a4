//! Folds decoded suites into run totals and per-case scenario results.

use crate::models::{RawReport, ScenarioResult, SuiteTotals};
use crate::services::classifier::classify;

/// Accumulate totals over all suites and emit one scenario result per test
/// case, in document order.
///
/// Totals come from the counts each suite declares, not from its cases. A
/// suite declaring more failures, errors and skips than tests contributes no
/// passed tests.
pub fn aggregate(report: &RawReport) -> (SuiteTotals, Vec<ScenarioResult>) {
    let mut totals = SuiteTotals::default();
    let mut results = Vec::with_capacity(report.case_count());

    for suite in &report.suites {
        let failed = suite.failures.saturating_add(suite.errors);
        totals.executed = totals.executed.saturating_add(suite.tests);
        totals.failed = totals.failed.saturating_add(failed);
        totals.skipped = totals.skipped.saturating_add(suite.skipped);
        totals.passed = totals
            .passed
            .saturating_add(suite.tests.saturating_sub(failed.saturating_add(suite.skipped)));
        totals.time_taken += suite.time;

        results.extend(suite.cases.iter().map(|case| ScenarioResult {
            scenario_id: None,
            suite_result_id: None,
            name: case.name.clone(),
            classname: case.classname.clone(),
            status: classify(case),
            time_taken: case.time,
            features: case.features.clone(),
        }));
    }

    (totals, results)
}
