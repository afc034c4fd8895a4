//! Scenario results and the dimension entities they point at.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Classified outcome of a single test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioStatus {
    Passed,
    Failed,
    Skipped,
}

impl ScenarioStatus {
    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }

    /// Parse from string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "passed" => Some(Self::Passed),
            "failed" => Some(Self::Failed),
            "skipped" => Some(Self::Skipped),
            _ => None,
        }
    }
}

impl std::fmt::Display for ScenarioStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-run execution record of one test case.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioResult {
    /// Identity of the owning scenario, set once the scenario is upserted.
    pub scenario_id: Option<Uuid>,
    /// Identity of the owning suite result, set once it is inserted.
    pub suite_result_id: Option<Uuid>,
    pub name: String,
    pub classname: Option<String>,
    pub status: ScenarioStatus,
    /// Elapsed time in seconds.
    pub time_taken: f64,
    /// Explicit feature tags captured by the decoder (empty when absent).
    pub features: Vec<String>,
}

/// Issue-tracker ticket linked to scenarios.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Feature {
    /// Uppercase ticket ID, e.g. `DAKOTA-123`.
    pub id: String,
    pub title: Option<String>,
}

impl Feature {
    pub fn new(id: impl Into<String>) -> Self {
        Feature {
            id: id.into(),
            title: None,
        }
    }
}

/// Test case identity shared across runs: unique on (name, test type, service).
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub id: Option<Uuid>,
    pub name: String,
    pub test_type: String,
    pub service: String,
    pub features: Vec<Feature>,
}
