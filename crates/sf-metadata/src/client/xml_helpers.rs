//! Assembly of typed results from `Body/<operation>Response/result` elements.

use sfkit_client::{DecodeFailure, XmlElement};

use crate::deploy::{
    CodeCoverageResult, CodeLocation, ComponentFailure, ComponentSuccess, DeployDetails,
    DeployOutcome, DeployStatus, RunTestResult, TestFailure, TestSuccess,
};
use crate::retrieve::{RetrieveOutcome, RetrieveStatus};
use crate::types::{FileProperties, RetrieveMessage};

/// Read the async process id from a submit/cancel result.
pub(crate) fn parse_async_id(result: &XmlElement) -> Result<String, DecodeFailure> {
    result
        .opt_string_of("id")
        .ok_or_else(|| DecodeFailure::MissingElement("result/id".to_string()))
}

fn opt_i64(el: &XmlElement, name: &str) -> Option<i64> {
    el.text_of(name).and_then(|s| s.parse().ok())
}

pub(crate) fn parse_deploy_outcome(result: &XmlElement) -> Result<DeployOutcome, DecodeFailure> {
    let id = parse_async_id(result)?;
    let status: DeployStatus = result
        .text_of("status")
        .ok_or_else(|| DecodeFailure::MissingElement("result/status".to_string()))?
        .parse()?;

    let details = result
        .child("details")
        .map(parse_deploy_details)
        .unwrap_or_default();

    Ok(DeployOutcome {
        id,
        done: result.bool_of("done"),
        status,
        success: result.bool_of("success"),
        check_only: result.bool_of("checkOnly"),
        ignore_warnings: result.bool_of("ignoreWarnings"),
        rollback_on_error: result.bool_of("rollbackOnError"),
        run_tests_enabled: result.bool_of("runTestsEnabled"),
        created_date: result.opt_string_of("createdDate"),
        start_date: result.opt_string_of("startDate"),
        completed_date: result.opt_string_of("completedDate"),
        error_message: result.opt_string_of("errorMessage"),
        error_status_code: result.opt_string_of("errorStatusCode"),
        state_detail: result.opt_string_of("stateDetail"),
        number_component_errors: result.i64_of("numberComponentErrors"),
        number_components_deployed: result.i64_of("numberComponentsDeployed"),
        number_components_total: result.i64_of("numberComponentsTotal"),
        number_test_errors: result.i64_of("numberTestErrors"),
        number_tests_completed: result.i64_of("numberTestsCompleted"),
        number_tests_total: result.i64_of("numberTestsTotal"),
        details,
    })
}

fn parse_deploy_details(details: &XmlElement) -> DeployDetails {
    DeployDetails {
        component_successes: details
            .children("componentSuccesses")
            .map(|c| ComponentSuccess {
                changed: c.bool_of("changed"),
                created: c.bool_of("created"),
                deleted: c.bool_of("deleted"),
                file_name: c.string_of("fileName"),
                full_name: c.string_of("fullName"),
                component_type: c.string_of("componentType"),
                success: c.bool_of("success"),
            })
            .collect(),
        component_failures: details
            .children("componentFailures")
            .map(|c| ComponentFailure {
                changed: c.bool_of("changed"),
                created: c.bool_of("created"),
                deleted: c.bool_of("deleted"),
                file_name: c.string_of("fileName"),
                full_name: c.string_of("fullName"),
                component_type: c.string_of("componentType"),
                success: c.bool_of("success"),
                problem: c.string_of("problem"),
                problem_type: c.string_of("problemType"),
                line_number: opt_i64(c, "lineNumber"),
                column_number: opt_i64(c, "columnNumber"),
            })
            .collect(),
        run_test_result: details.child("runTestResult").map(parse_run_test_result),
    }
}

fn parse_run_test_result(run: &XmlElement) -> RunTestResult {
    RunTestResult {
        num_failures: run.i64_of("numFailures"),
        num_tests_run: run.i64_of("numTestsRun"),
        total_time: run.f64_of("totalTime"),
        successes: run
            .children("successes")
            .map(|t| TestSuccess {
                id: t.string_of("id"),
                method_name: t.string_of("methodName"),
                name: t.string_of("name"),
                namespace: t.opt_string_of("namespace"),
                time: t.f64_of("time"),
            })
            .collect(),
        failures: run
            .children("failures")
            .map(|t| TestFailure {
                id: t.string_of("id"),
                message: t.string_of("message"),
                method_name: t.string_of("methodName"),
                name: t.string_of("name"),
                namespace: t.opt_string_of("namespace"),
                stack_trace: t.string_of("stackTrace"),
                time: t.f64_of("time"),
                failure_type: t.string_of("type"),
            })
            .collect(),
        code_coverage: run
            .children("codeCoverage")
            .map(|c| CodeCoverageResult {
                id: c.string_of("id"),
                name: c.string_of("name"),
                namespace: c.opt_string_of("namespace"),
                num_locations: c.i64_of("numLocations"),
                num_locations_not_covered: c.i64_of("numLocationsNotCovered"),
                coverage_type: c.string_of("type"),
                locations_not_covered: c
                    .children("locationsNotCovered")
                    .map(|l| CodeLocation {
                        column: l.i64_of("column"),
                        line: l.i64_of("line"),
                        num_executions: l.i64_of("numExecutions"),
                        time: l.f64_of("time"),
                    })
                    .collect(),
            })
            .collect(),
    }
}

pub(crate) fn parse_retrieve_outcome(
    result: &XmlElement,
) -> Result<RetrieveOutcome, DecodeFailure> {
    let id = parse_async_id(result)?;
    let status = match (result.opt_string_of("status"), result.opt_string_of("state")) {
        (Some(status), _) => status.parse()?,
        (None, Some(state)) => RetrieveStatus::from_async_state(&state)?,
        (None, None) => {
            return Err(DecodeFailure::MissingElement("result/status".to_string()));
        }
    };

    Ok(RetrieveOutcome {
        id,
        done: result.bool_of("done"),
        status,
        success: result.bool_of("success"),
        error_message: result.opt_string_of("errorMessage"),
        error_status_code: result.opt_string_of("errorStatusCode"),
        zip_file: result.opt_string_of("zipFile"),
        file_properties: result
            .children("fileProperties")
            .map(|f| FileProperties {
                created_by_id: f.string_of("createdById"),
                created_by_name: f.string_of("createdByName"),
                created_date: f.string_of("createdDate"),
                file_name: f.string_of("fileName"),
                full_name: f.string_of("fullName"),
                id: f.string_of("id"),
                last_modified_by_id: f.string_of("lastModifiedById"),
                last_modified_by_name: f.string_of("lastModifiedByName"),
                last_modified_date: f.string_of("lastModifiedDate"),
                manageable_state: f.opt_string_of("manageableState"),
                namespace_prefix: f.opt_string_of("namespacePrefix"),
                component_type: f.string_of("type"),
            })
            .collect(),
        messages: result
            .children("messages")
            .map(|m| RetrieveMessage {
                file_name: m.string_of("fileName"),
                problem: m.string_of("problem"),
            })
            .collect(),
    })
}
