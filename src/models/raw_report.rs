//! Intermediate report structure produced by the report decoders.
//!
//! These types mirror the JUnit document closely and carry no persistence
//! concerns. The aggregator turns them into [`ScenarioResult`]s.
//!
//! [`ScenarioResult`]: super::ScenarioResult

/// A fully decoded report. Never empty after a successful decode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawReport {
    pub suites: Vec<RawTestSuite>,
}

/// One `<testsuite>` element with its declared totals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTestSuite {
    pub name: Option<String>,
    pub tests: u32,
    pub failures: u32,
    pub errors: u32,
    pub skipped: u32,
    /// Elapsed time in seconds.
    pub time: f64,
    pub cases: Vec<RawTestCase>,
}

/// One `<testcase>` element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTestCase {
    pub name: String,
    pub classname: Option<String>,
    /// Elapsed time in seconds.
    pub time: f64,
    /// Explicit ticket tags from the `features` attribute, whitespace separated.
    pub features: Vec<String>,
    pub markers: OutcomeMarkers,
}

/// Which outcome child elements were present on a test case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeMarkers {
    pub failure: bool,
    pub error: bool,
    pub skipped: bool,
}

impl RawTestCase {
    /// Create a passing test case with the given name.
    pub fn named(name: impl Into<String>) -> Self {
        RawTestCase {
            name: name.into(),
            ..Default::default()
        }
    }
}

impl RawReport {
    /// Total number of test cases across all suites.
    pub fn case_count(&self) -> usize {
        self.suites.iter().map(|s| s.cases.len()).sum()
    }
}
