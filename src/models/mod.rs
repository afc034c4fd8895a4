//! Domain models for the test report collector.

pub mod raw_report;
pub mod run_params;
pub mod scenario;
pub mod suite_result;

// Re-export commonly used types
pub use raw_report::{OutcomeMarkers, RawReport, RawTestCase, RawTestSuite};
pub use run_params::{ParamError, RawRunParams, RunParams};
pub use scenario::{Feature, Scenario, ScenarioResult, ScenarioStatus};
pub use suite_result::{PersistableAggregate, SaveReceipt, SuiteResult, SuiteTotals};
