//! Deploy types.

use serde::{Deserialize, Serialize};

use sfkit_client::xml::escape;
use sfkit_client::{DecodeFailure, OperationState};

use crate::types::TestLevel;

/// Options for deployment.
///
/// Every flag is sent as-is; combinations the server rejects come back as a
/// fault or a failed deploy.
#[derive(Debug, Clone)]
pub struct DeployOptions {
    /// Allow references to missing files in the zip.
    pub allow_missing_files: bool,
    /// Automatically update the package manifest.
    pub auto_update_package: bool,
    /// Validate only, don't actually deploy.
    pub check_only: bool,
    /// Ignore warnings during deployment.
    pub ignore_warnings: bool,
    /// Retrieve metadata after deploy.
    pub perform_retrieve: bool,
    /// Hard delete components (only in sandbox/DE orgs).
    pub purge_on_delete: bool,
    /// Rollback all changes if any component fails.
    pub rollback_on_error: bool,
    /// The zip holds a single package.
    pub single_package: bool,
    /// Test level for deployment.
    pub test_level: Option<TestLevel>,
    /// Specific tests to run (with `RunSpecifiedTests`).
    pub run_tests: Vec<String>,
}

impl Default for DeployOptions {
    fn default() -> Self {
        Self {
            allow_missing_files: false,
            auto_update_package: false,
            check_only: false,
            ignore_warnings: false,
            perform_retrieve: false,
            purge_on_delete: false,
            rollback_on_error: true,
            single_package: true,
            test_level: None,
            run_tests: vec![],
        }
    }
}

impl DeployOptions {
    /// Validate without committing.
    pub fn check_only() -> Self {
        Self {
            check_only: true,
            ..Self::default()
        }
    }

    pub fn with_test_level(mut self, level: TestLevel) -> Self {
        self.test_level = Some(level);
        self
    }

    pub fn with_run_tests<I, S>(mut self, tests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.run_tests = tests.into_iter().map(Into::into).collect();
        self
    }

    /// Render the `met:DeployOptions` element.
    pub(crate) fn to_xml(&self) -> String {
        let mut xml = String::from("<met:DeployOptions>");
        for (name, value) in [
            ("allowMissingFiles", self.allow_missing_files),
            ("autoUpdatePackage", self.auto_update_package),
            ("checkOnly", self.check_only),
            ("ignoreWarnings", self.ignore_warnings),
            ("performRetrieve", self.perform_retrieve),
            ("purgeOnDelete", self.purge_on_delete),
            ("rollbackOnError", self.rollback_on_error),
            ("singlePackage", self.single_package),
        ] {
            xml.push_str(&format!("<met:{name}>{value}</met:{name}>"));
        }
        if let Some(level) = self.test_level {
            xml.push_str(&format!("<met:testLevel>{level}</met:testLevel>"));
        }
        for test in &self.run_tests {
            xml.push_str(&format!("<met:runTests>{}</met:runTests>", escape(test)));
        }
        xml.push_str("</met:DeployOptions>");
        xml
    }
}

/// Deployment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeployStatus {
    Pending,
    InProgress,
    Succeeded,
    SucceededPartial,
    Failed,
    Canceling,
    Canceled,
}

impl DeployStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeployStatus::Pending => "Pending",
            DeployStatus::InProgress => "InProgress",
            DeployStatus::Succeeded => "Succeeded",
            DeployStatus::SucceededPartial => "SucceededPartial",
            DeployStatus::Failed => "Failed",
            DeployStatus::Canceling => "Canceling",
            DeployStatus::Canceled => "Canceled",
        }
    }
}

impl std::str::FromStr for DeployStatus {
    type Err = DecodeFailure;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(DeployStatus::Pending),
            "InProgress" => Ok(DeployStatus::InProgress),
            "Succeeded" => Ok(DeployStatus::Succeeded),
            "SucceededPartial" => Ok(DeployStatus::SucceededPartial),
            "Failed" => Ok(DeployStatus::Failed),
            "Canceling" => Ok(DeployStatus::Canceling),
            "Canceled" => Ok(DeployStatus::Canceled),
            _ => Err(DecodeFailure::UnknownValue(format!("deploy status {s}"))),
        }
    }
}

impl From<DeployStatus> for OperationState {
    fn from(status: DeployStatus) -> Self {
        match status {
            DeployStatus::Pending => OperationState::Queued,
            DeployStatus::InProgress | DeployStatus::Canceling => OperationState::InProgress,
            DeployStatus::Succeeded | DeployStatus::SucceededPartial => OperationState::Succeeded,
            DeployStatus::Failed => OperationState::Failed,
            DeployStatus::Canceled => OperationState::Aborted,
        }
    }
}

/// Terminal detail of a deployment, as returned by `checkDeployStatus`.
#[derive(Debug, Clone, PartialEq)]
pub struct DeployOutcome {
    /// Async process ID.
    pub id: String,
    pub done: bool,
    pub status: DeployStatus,
    pub success: bool,
    pub check_only: bool,
    pub ignore_warnings: bool,
    pub rollback_on_error: bool,
    pub run_tests_enabled: bool,
    pub created_date: Option<String>,
    pub start_date: Option<String>,
    pub completed_date: Option<String>,
    pub error_message: Option<String>,
    pub error_status_code: Option<String>,
    pub state_detail: Option<String>,
    pub number_component_errors: i64,
    pub number_components_deployed: i64,
    pub number_components_total: i64,
    pub number_test_errors: i64,
    pub number_tests_completed: i64,
    pub number_tests_total: i64,
    pub details: DeployDetails,
}

impl DeployOutcome {
    /// Returns true if any component failed.
    pub fn has_component_failures(&self) -> bool {
        !self.details.component_failures.is_empty()
    }

    /// Returns true if any Apex test failed.
    pub fn has_test_failures(&self) -> bool {
        self.details
            .run_test_result
            .as_ref()
            .is_some_and(|r| !r.failures.is_empty())
    }
}

/// Per-component and per-test detail of a deployment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeployDetails {
    pub component_successes: Vec<ComponentSuccess>,
    pub component_failures: Vec<ComponentFailure>,
    pub run_test_result: Option<RunTestResult>,
}

/// A component deployed without errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentSuccess {
    pub changed: bool,
    pub created: bool,
    pub deleted: bool,
    pub file_name: String,
    pub full_name: String,
    pub component_type: String,
    pub success: bool,
}

/// A component that failed to deploy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentFailure {
    pub changed: bool,
    pub created: bool,
    pub deleted: bool,
    pub file_name: String,
    pub full_name: String,
    pub component_type: String,
    pub success: bool,
    pub problem: String,
    pub problem_type: String,
    pub line_number: Option<i64>,
    pub column_number: Option<i64>,
}

/// Apex test run attached to a deployment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunTestResult {
    pub num_failures: i64,
    pub num_tests_run: i64,
    /// Milliseconds.
    pub total_time: f64,
    pub successes: Vec<TestSuccess>,
    pub failures: Vec<TestFailure>,
    pub code_coverage: Vec<CodeCoverageResult>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestSuccess {
    pub id: String,
    pub method_name: String,
    pub name: String,
    pub namespace: Option<String>,
    pub time: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestFailure {
    pub id: String,
    pub message: String,
    pub method_name: String,
    pub name: String,
    pub namespace: Option<String>,
    pub stack_trace: String,
    pub time: f64,
    /// `type` on the wire, e.g. "Class".
    pub failure_type: String,
}

/// Coverage for one Apex class or trigger.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CodeCoverageResult {
    pub id: String,
    pub name: String,
    pub namespace: Option<String>,
    pub num_locations: i64,
    pub num_locations_not_covered: i64,
    /// `type` on the wire, e.g. "Class" or "Trigger".
    pub coverage_type: String,
    pub locations_not_covered: Vec<CodeLocation>,
}

impl CodeCoverageResult {
    /// Covered share of locations in `0.0..=1.0`; `None` when there are none.
    pub fn coverage_ratio(&self) -> Option<f64> {
        (self.num_locations > 0).then(|| {
            (self.num_locations - self.num_locations_not_covered) as f64 / self.num_locations as f64
        })
    }
}

/// An uncovered source location.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CodeLocation {
    pub column: i64,
    pub line: i64,
    pub num_executions: i64,
    pub time: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deploy_options_default() {
        let opts = DeployOptions::default();
        assert!(!opts.allow_missing_files);
        assert!(!opts.check_only);
        assert!(opts.rollback_on_error);
        assert!(opts.single_package);
        assert!(opts.test_level.is_none());
    }

    #[test]
    fn test_deploy_options_xml() {
        let xml = DeployOptions::check_only()
            .with_test_level(TestLevel::RunSpecifiedTests)
            .with_run_tests(["FooTest", "Bar<Test>"])
            .to_xml();

        assert!(xml.starts_with("<met:DeployOptions><met:allowMissingFiles>false"));
        assert!(xml.contains("<met:checkOnly>true</met:checkOnly>"));
        assert!(xml.contains("<met:rollbackOnError>true</met:rollbackOnError>"));
        assert!(xml.contains("<met:testLevel>RunSpecifiedTests</met:testLevel>"));
        assert!(xml.contains("<met:runTests>FooTest</met:runTests>"));
        assert!(xml.contains("<met:runTests>Bar&lt;Test&gt;</met:runTests>"));
        assert!(xml.ends_with("</met:DeployOptions>"));

        let xml = DeployOptions::default().to_xml();
        assert!(!xml.contains("testLevel"));
        assert!(!xml.contains("runTests"));
    }

    #[test]
    fn test_deploy_status_parse() {
        for status in [
            DeployStatus::Pending,
            DeployStatus::InProgress,
            DeployStatus::Succeeded,
            DeployStatus::SucceededPartial,
            DeployStatus::Failed,
            DeployStatus::Canceling,
            DeployStatus::Canceled,
        ] {
            assert_eq!(status.as_str().parse::<DeployStatus>().unwrap(), status);
            assert_eq!(
                OperationState::from_metadata(status.as_str()),
                Some(OperationState::from(status))
            );
        }
        assert!(matches!(
            "Exploded".parse::<DeployStatus>(),
            Err(DecodeFailure::UnknownValue(_))
        ));
    }

    #[test]
    fn test_coverage_ratio() {
        let coverage = CodeCoverageResult {
            num_locations: 10,
            num_locations_not_covered: 3,
            ..Default::default()
        };
        assert_eq!(coverage.coverage_ratio(), Some(0.7));
        assert_eq!(CodeCoverageResult::default().coverage_ratio(), None);
    }
}
