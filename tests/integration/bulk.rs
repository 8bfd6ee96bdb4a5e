//! Bulk API 2.0 query jobs from token grant to the last page.

use serde_json::json;
use sfkit::bulk::CreateQueryJobRequest;
use sfkit::{BulkApiClient, ErrorKind, OperationState};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::common::{authenticated_client, fast_policy};

const JOBS: &str = "/services/data/v58.0/jobs/query";

fn job(state: &str) -> serde_json::Value {
    json!({"id": "750R0000000001", "state": state, "object": "Contact", "operation": "queryAll"})
}

#[tokio::test]
async fn test_bulk_query_follows_locator_chain() {
    let server = MockServer::start().await;
    let client = BulkApiClient::from_client(authenticated_client(&server).await);

    Mock::given(method("POST"))
        .and(path(JOBS))
        .and(header("Authorization", "Bearer 00Dxx!mock-session"))
        .respond_with(ResponseTemplate::new(201).set_body_json(job("UploadComplete")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{JOBS}/750R0000000001")))
        .respond_with(ResponseTemplate::new(200).set_body_json(job("InProgress")))
        .up_to_n_times(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{JOBS}/750R0000000001")))
        .respond_with(ResponseTemplate::new(200).set_body_json(job("JobComplete")))
        .mount(&server)
        .await;

    // Mount order decides ties: the locator page must precede the first page
    Mock::given(method("GET"))
        .and(path(format!("{JOBS}/750R0000000001/results")))
        .and(query_param("locator", "MTAwMA"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Sforce-Locator", "null")
                .set_body_string("Id,LastName\n003C,\"Okafor, Jr.\"\n"),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{JOBS}/750R0000000001/results")))
        .and(query_param("maxRecords", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Sforce-Locator", "MTAwMA")
                .set_body_string("Id,LastName\n003A,Ng\n003B,Ruiz\n"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let request = CreateQueryJobRequest::new("SELECT Id, LastName FROM Contact").with_query_all();
    let handle = client.submit_query_job(request).await.unwrap();
    assert_eq!(handle.state, OperationState::Queued);

    let status = client
        .wait_for_query_job(&handle.id, &fast_policy())
        .await
        .unwrap()
        .into_outcome()
        .unwrap();
    assert_eq!(status.state, OperationState::JobComplete);

    let rows = client.get_all_results_parsed(&handle.id, 2).await.unwrap();
    let names: Vec<&str> = rows.iter().map(|row| row["LastName"].as_str()).collect();
    assert_eq!(names, ["Ng", "Ruiz", "Okafor, Jr."]);
}

#[tokio::test]
async fn test_failed_job_surfaces_remote_message() {
    let server = MockServer::start().await;
    let client = BulkApiClient::from_client(authenticated_client(&server).await);

    Mock::given(method("GET"))
        .and(path(format!("{JOBS}/750R0000000002")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "750R0000000002",
            "state": "Failed",
            "errorMessage": "INVALID_FIELD: No such column 'Nope' on entity 'Account'"
        })))
        .mount(&server)
        .await;

    let status = client
        .wait_for_query_job("750R0000000002", &fast_policy())
        .await
        .unwrap();
    assert!(status.done);
    assert!(status.is_terminal_failure());

    let err = status.into_outcome().unwrap_err();
    match err.kind {
        ErrorKind::RemoteOperationFailed { id, state, message } => {
            assert_eq!(id, "750R0000000002");
            assert_eq!(state, "Failed");
            assert!(message.contains("No such column"));
        }
        other => panic!("expected RemoteOperationFailed, got {other:?}"),
    }
}
