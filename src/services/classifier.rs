//! Test case status classification.

use crate::models::{RawTestCase, ScenarioStatus};

/// Classify a test case. Failure or error takes precedence over skipped;
/// a case with no markers passed.
pub fn classify(case: &RawTestCase) -> ScenarioStatus {
    let markers = case.markers;
    if markers.failure || markers.error {
        ScenarioStatus::Failed
    } else if markers.skipped {
        ScenarioStatus::Skipped
    } else {
        ScenarioStatus::Passed
    }
}
