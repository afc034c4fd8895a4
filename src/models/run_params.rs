//! Parameters of a single ingestion run, supplied by the CLI or the upload form.

use crate::report;

/// Environment variable names of the run parameters. The upload form uses the
/// same names in lower case.
pub mod names {
    pub const BUILD_ID: &str = "CI_JOB_ID";
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
    pub const JIRA: &str = "JIRA_PROJECT";
    pub const REPORT_FILE: &str = "REPORT_FILE";
    pub const REPORT_FORMAT: &str = "REPORT_FORMAT";
    pub const SERVICE: &str = "SERVICE_NAME";
    pub const TEST_TYPE: &str = "TEST_TYPE";
    pub const COVERAGE: &str = "COVERAGE";

    /// Parameters every run must provide, in reporting order.
    pub const REQUIRED: [&str; 6] = [BUILD_ID, ENVIRONMENT, JIRA, REPORT_FORMAT, SERVICE, TEST_TYPE];
}

/// Accepted test types.
pub const VALID_TEST_TYPES: [&str; 4] = ["unit", "contract", "integration", "e2e"];

/// Run parameter validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParamError {
    #[error("missing params: {}", .0.join(", "))]
    Missing(Vec<String>),

    #[error("test type {ty} is invalid, should be one of {valid}", ty = .0, valid = VALID_TEST_TYPES.join(", "))]
    InvalidTestType(String),

    #[error("report format {fmt} is invalid, should be one of {valid}", fmt = .0, valid = report::supported_formats().join(", "))]
    InvalidReportFormat(String),

    #[error("coverage value should be a floating number")]
    InvalidCoverage,
}

/// Unvalidated run parameters as they arrive from flags or form fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRunParams {
    pub build: Option<String>,
    pub environment: Option<String>,
    pub jira: Option<String>,
    pub report_format: Option<String>,
    pub service: Option<String>,
    pub test_type: Option<String>,
    pub coverage: Option<String>,
}

/// Validated run parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RunParams {
    pub build: String,
    pub environment: String,
    /// Issue-tracker project prefix, e.g. `DAKOTA`.
    pub jira: String,
    pub report_format: String,
    pub service: String,
    pub test_type: String,
    pub coverage: Option<f64>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl RawRunParams {
    /// Set a parameter by its form field name (lower-cased env name).
    /// Returns false for unknown names.
    pub fn set_field(&mut self, name: &str, value: String) -> bool {
        let slot = match name.to_uppercase().as_str() {
            names::BUILD_ID => &mut self.build,
            names::ENVIRONMENT => &mut self.environment,
            names::JIRA => &mut self.jira,
            names::REPORT_FORMAT => &mut self.report_format,
            names::SERVICE => &mut self.service,
            names::TEST_TYPE => &mut self.test_type,
            names::COVERAGE => &mut self.coverage,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// Names (lower case) of required parameters that are absent or blank.
    pub fn missing(&self) -> Vec<String> {
        let slots = [
            (names::BUILD_ID, &self.build),
            (names::ENVIRONMENT, &self.environment),
            (names::JIRA, &self.jira),
            (names::REPORT_FORMAT, &self.report_format),
            (names::SERVICE, &self.service),
            (names::TEST_TYPE, &self.test_type),
        ];
        slots
            .into_iter()
            .filter(|(_, value)| present(value).is_none())
            .map(|(name, _)| name.to_lowercase())
            .collect()
    }

    /// Check presence and values, producing validated parameters.
    pub fn validate(&self) -> Result<RunParams, ParamError> {
        let missing = self.missing();
        if !missing.is_empty() {
            return Err(ParamError::Missing(missing));
        }

        let value = |v: &Option<String>| present(v).unwrap_or_default().to_string();

        let test_type = value(&self.test_type);
        if !VALID_TEST_TYPES.contains(&test_type.to_lowercase().as_str()) {
            return Err(ParamError::InvalidTestType(test_type));
        }

        let report_format = value(&self.report_format);
        if !report::is_supported(&report_format) {
            return Err(ParamError::InvalidReportFormat(report_format));
        }

        let coverage = match present(&self.coverage) {
            Some(raw) => Some(raw.parse::<f64>().map_err(|_| ParamError::InvalidCoverage)?),
            None => None,
        };

        Ok(RunParams {
            build: value(&self.build),
            environment: value(&self.environment),
            jira: value(&self.jira),
            report_format,
            service: value(&self.service),
            test_type,
            coverage,
        })
    }
}
