//! Types for Bulk API 2.0 query jobs.

use serde::{Deserialize, Deserializer, Serialize};

use sfkit_client::{
    parse_csv, DecodeFailure, OperationKind, OperationState, OperationStatus, Progress,
    RemoteError, ResultPage, Row,
};

/// Deserialize API version that can be either a float (59.0) or string ("59.0").
pub(crate) fn deserialize_api_version<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ApiVersion {
        Float(f64),
        String(String),
    }

    Option::<ApiVersion>::deserialize(deserializer).map(|opt| {
        opt.map(|v| match v {
            ApiVersion::Float(f) => format!("{:.1}", f),
            ApiVersion::String(s) => s,
        })
    })
}

/// Bulk API 2.0 job states.
///
/// Any other label is `DecodeFailure::UnknownValue` rather than being guessed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum JobState {
    /// Job is open
    Open,
    /// Upload is complete, job is ready for processing
    UploadComplete,
    /// Job is processing
    InProgress,
    /// Job was aborted
    Aborted,
    /// Job completed successfully
    JobComplete,
    /// Job failed
    Failed,
}

impl JobState {
    /// The label the API uses for this state.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Open => "Open",
            JobState::UploadComplete => "UploadComplete",
            JobState::InProgress => "InProgress",
            JobState::Aborted => "Aborted",
            JobState::JobComplete => "JobComplete",
            JobState::Failed => "Failed",
        }
    }

    /// Check if job is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobState::Aborted | JobState::JobComplete | JobState::Failed
        )
    }

    /// Check if job completed successfully.
    pub fn is_success(&self) -> bool {
        matches!(self, JobState::JobComplete)
    }
}

impl std::str::FromStr for JobState {
    type Err = DecodeFailure;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Open" => Ok(JobState::Open),
            "UploadComplete" => Ok(JobState::UploadComplete),
            "InProgress" => Ok(JobState::InProgress),
            "Aborted" => Ok(JobState::Aborted),
            "JobComplete" => Ok(JobState::JobComplete),
            "Failed" => Ok(JobState::Failed),
            _ => Err(DecodeFailure::UnknownValue(format!("bulk job state {s}"))),
        }
    }
}

impl TryFrom<String> for JobState {
    type Error = DecodeFailure;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<JobState> for OperationState {
    fn from(state: JobState) -> Self {
        match state {
            JobState::Open | JobState::UploadComplete => OperationState::Queued,
            JobState::InProgress => OperationState::InProgress,
            JobState::JobComplete => OperationState::JobComplete,
            JobState::Failed => OperationState::Failed,
            JobState::Aborted => OperationState::Aborted,
        }
    }
}

/// Bulk API 2.0 query operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QueryOperation {
    /// Query live records
    #[default]
    #[serde(rename = "query")]
    Query,
    /// Query all records including deleted and archived
    #[serde(rename = "queryAll")]
    QueryAll,
}

/// Content type for Bulk API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ContentType {
    #[default]
    #[serde(rename = "CSV")]
    Csv,
}

// =============================================================================
// Request Types
// =============================================================================

/// Request to create a query job.
///
/// Serializes to `{"operation": "query", "query": ..., "contentType": "CSV"}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQueryJobRequest {
    /// Operation type (query or queryAll)
    pub operation: QueryOperation,
    /// SOQL query
    pub query: String,
    /// Content type of the results
    pub content_type: ContentType,
}

impl CreateQueryJobRequest {
    /// Create a new query job request.
    pub fn new(soql: impl Into<String>) -> Self {
        Self {
            operation: QueryOperation::Query,
            query: soql.into(),
            content_type: ContentType::Csv,
        }
    }

    /// Use queryAll instead of query (includes deleted records).
    pub fn with_query_all(mut self) -> Self {
        self.operation = QueryOperation::QueryAll;
        self
    }
}

/// Request body for a job state change.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct UpdateJobStateRequest {
    pub state: JobState,
}

impl UpdateJobStateRequest {
    pub fn abort() -> Self {
        Self {
            state: JobState::Aborted,
        }
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// Query job info as returned by create, status and abort calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryJob {
    /// Job ID
    pub id: String,
    /// Current state
    pub state: JobState,
    /// SObject the query targets
    #[serde(default)]
    pub object: Option<String>,
    /// Operation type
    #[serde(default)]
    pub operation: Option<String>,
    /// Job creation time
    #[serde(default)]
    pub created_date: Option<String>,
    /// Last modification time
    #[serde(default)]
    pub system_modstamp: Option<String>,
    /// Number of records processed
    #[serde(default)]
    pub number_records_processed: Option<i64>,
    /// Total processing time in milliseconds
    #[serde(default)]
    pub total_processing_time: Option<i64>,
    /// API version (can be float like 59.0 or string like "59.0")
    #[serde(default, deserialize_with = "deserialize_api_version")]
    pub api_version: Option<String>,
    /// Error message if failed
    #[serde(default)]
    pub error_message: Option<String>,
}

impl QueryJob {
    /// Snapshot this job as an operation status.
    ///
    /// `done` follows the job state alone; the job itself becomes the
    /// terminal detail once the state is terminal.
    pub fn into_status(self) -> OperationStatus<QueryJob> {
        let done = self.state.is_terminal();
        let error = self.error_message.clone().map(|message| RemoteError {
            code: None,
            message,
        });
        let progress = Progress {
            processed: self.number_records_processed,
            ..Progress::default()
        };

        OperationStatus::new(
            self.id.clone(),
            OperationKind::BulkQuery,
            self.state.into(),
            self.state.as_str(),
            done,
        )
        .with_success(self.state.is_success())
        .with_progress(progress)
        .with_error(error)
        .with_detail(self)
    }
}

/// One raw page of query results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResults {
    /// CSV data, header included
    pub csv_data: String,
    /// Locator for next page (None if no more pages)
    pub locator: Option<String>,
}

impl QueryResults {
    /// Parse the CSV into rows keyed by header, keeping the locator.
    pub fn parse(self) -> Result<ResultPage<Row>, DecodeFailure> {
        let rows = parse_csv(&self.csv_data)?;
        Ok(ResultPage {
            rows,
            locator: self.locator,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_state_terminal() {
        assert!(!JobState::Open.is_terminal());
        assert!(!JobState::InProgress.is_terminal());
        assert!(JobState::JobComplete.is_terminal());
        assert!(JobState::Failed.is_terminal());
        assert!(JobState::Aborted.is_terminal());
    }

    #[test]
    fn test_job_state_maps_onto_operation_state() {
        assert_eq!(OperationState::from(JobState::Open), OperationState::Queued);
        assert_eq!(
            OperationState::from(JobState::JobComplete),
            OperationState::JobComplete
        );
        for state in [
            JobState::Open,
            JobState::UploadComplete,
            JobState::InProgress,
            JobState::Aborted,
            JobState::JobComplete,
            JobState::Failed,
        ] {
            assert_eq!(
                OperationState::from_bulk(state.as_str()),
                Some(OperationState::from(state))
            );
        }
    }

    #[test]
    fn test_create_query_job_request_wire_shape() {
        let request = CreateQueryJobRequest::new("SELECT Id, Name FROM Account");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "operation": "query",
                "query": "SELECT Id, Name FROM Account",
                "contentType": "CSV"
            })
        );

        let request = request.with_query_all();
        assert_eq!(serde_json::to_value(&request).unwrap()["operation"], "queryAll");
    }

    #[test]
    fn test_unknown_state_is_rejected() {
        let err = "Sleeping".parse::<JobState>().unwrap_err();
        assert_eq!(
            err,
            DecodeFailure::UnknownValue("bulk job state Sleeping".to_string())
        );

        let err = serde_json::from_str::<QueryJob>(r#"{"id":"750x","state":"Sleeping"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("Sleeping"), "{err}");

        for state in ["Open", "UploadComplete", "InProgress", "Aborted", "JobComplete", "Failed"] {
            assert_eq!(state.parse::<JobState>().unwrap().as_str(), state);
        }
    }

    #[test]
    fn test_job_into_status() {
        let job: QueryJob = serde_json::from_str(
            r#"{"id":"750x","state":"InProgress","object":"Account","numberRecordsProcessed":10,"apiVersion":58.0}"#,
        )
        .unwrap();
        assert_eq!(job.api_version.as_deref(), Some("58.0"));

        let status = job.into_status();
        assert!(!status.done);
        assert!(!status.success);
        assert!(status.detail.is_none());
        assert_eq!(status.progress.processed, Some(10));

        let job: QueryJob = serde_json::from_str(
            r#"{"id":"750x","state":"Failed","object":"Account","errorMessage":"INVALID_FIELD"}"#,
        )
        .unwrap();
        let status = job.into_status();
        assert!(status.is_terminal_failure());
        assert_eq!(status.remote_state, "Failed");
        assert_eq!(status.error.as_ref().unwrap().message, "INVALID_FIELD");
        assert_eq!(status.detail.as_ref().unwrap().id, "750x");
    }

    #[test]
    fn test_query_results_parse() {
        let page = QueryResults {
            csv_data: "Id,Name\n001A,Acme\n".to_string(),
            locator: Some("L2".to_string()),
        }
        .parse()
        .unwrap();
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.rows[0]["Name"], "Acme");
        assert_eq!(page.locator.as_deref(), Some("L2"));

        let err = QueryResults {
            csv_data: String::new(),
            locator: None,
        }
        .parse()
        .unwrap_err();
        assert_eq!(err, DecodeFailure::EmptyPayload);
    }
}
