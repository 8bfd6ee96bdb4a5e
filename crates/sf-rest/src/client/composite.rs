use serde::Serialize;
use tracing::instrument;

use sfkit_client::decode::decode_json;
use sfkit_client::{Error, Result};

use super::sobject_path;
use crate::composite::{
    CollectionRequest, CompositeRequest, CompositeResponse, CompositeResult, CompositeSubrequest,
};

impl super::SalesforceRestClient {
    /// Create several records of one type in a single all-or-none request.
    ///
    /// `attributes.type` is filled in on every record. Success is 201.
    #[instrument(skip(self, records), fields(count = records.len()))]
    pub async fn create_records<T: Serialize>(
        &self,
        sobject: &str,
        records: &[T],
    ) -> Result<Vec<CompositeResult>> {
        sobject_path(sobject, None)?;
        let request = CollectionRequest::typed(sobject, records)?;
        self.client
            .post_json(&self.client.rest_url("composite/sobjects"), &request, &[201])
            .await
    }

    /// Update several records of one type; each record must carry its `Id`.
    ///
    /// Success is 204. A 200 carries per-record results; any entry with
    /// `success: false` means the batch was rolled back and is returned as
    /// `UnexpectedStatus` with the raw body.
    #[instrument(skip(self, records), fields(count = records.len()))]
    pub async fn update_records<T: Serialize>(&self, sobject: &str, records: &[T]) -> Result<()> {
        sobject_path(sobject, None)?;
        let request = CollectionRequest::typed(sobject, records)?;
        let url = self.client.rest_url("composite/sobjects");
        let response = self.client.send(self.client.patch(&url).json(&request)?).await?;
        if response.status() == 204 {
            return Ok(());
        }

        let results: Vec<CompositeResult> = decode_json(&response, &[200])?;
        if results.iter().any(|r| !r.success) {
            return Err(Error::unexpected_status(response.status(), response.text()));
        }
        Ok(())
    }

    /// Delete several records through one composite request.
    ///
    /// Each ID becomes a `DELETE` subrequest whose reference ID is the record
    /// ID itself. Per-record outcomes are in the returned response.
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn delete_records(&self, sobject: &str, ids: &[&str]) -> Result<CompositeResponse> {
        let subrequests = ids
            .iter()
            .map(|&id| {
                let path = sobject_path(sobject, Some(id))?;
                Ok(CompositeSubrequest {
                    method: "DELETE".to_string(),
                    url: format!("/services/data/v{}/{}", self.api_version(), path),
                    reference_id: id.to_string(),
                    body: None,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        self.composite(&CompositeRequest {
            all_or_none: true,
            subrequests,
        })
        .await
    }

    /// Execute a composite request with multiple subrequests.
    #[instrument(skip(self, request))]
    pub async fn composite(&self, request: &CompositeRequest) -> Result<CompositeResponse> {
        self.client
            .post_json(&self.client.rest_url("composite"), request, &[200])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::super::SalesforceRestClient;
    use serde_json::json;
    use sfkit_client::ErrorKind;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_create_records() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/services/data/v58.0/composite/sobjects"))
            .and(body_json(json!({
                "allOrNone": true,
                "records": [
                    {"attributes": {"type": "Contact"}, "LastName": "Ng"},
                    {"attributes": {"type": "Contact"}, "LastName": "Ruiz"}
                ]
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!([
                {"id": "003A00000000001", "success": true, "errors": []},
                {"id": "003A00000000002", "success": true, "errors": []}
            ])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = SalesforceRestClient::new(mock_server.uri(), "test-token").unwrap();
        let results = client
            .create_records(
                "Contact",
                &[json!({"LastName": "Ng"}), json!({"LastName": "Ruiz"})],
            )
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[1].id.as_deref(), Some("003A00000000002"));
    }

    #[tokio::test]
    async fn test_update_records() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/services/data/v58.0/composite/sobjects"))
            .and(body_json(json!({
                "allOrNone": true,
                "records": [{"attributes": {"type": "Contact"}, "Id": "003A00000000001", "LastName": "Ng"}]
            })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = SalesforceRestClient::new(mock_server.uri(), "test-token").unwrap();
        client
            .update_records(
                "Contact",
                &[json!({"Id": "003A00000000001", "LastName": "Ng"})],
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_records_rolled_back_is_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/services/data/v58.0/composite/sobjects"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "003A00000000001", "success": false, "errors": [
                    {"statusCode": "ALL_OR_NONE_OPERATION_ROLLED_BACK", "message": "Record rolled back because not all records were valid", "fields": []}
                ]},
                {"id": null, "success": false, "errors": [
                    {"statusCode": "REQUIRED_FIELD_MISSING", "message": "Required fields are missing: [LastName]", "fields": ["LastName"]}
                ]}
            ])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = SalesforceRestClient::new(mock_server.uri(), "test-token").unwrap();
        let err = client
            .update_records(
                "Contact",
                &[
                    json!({"Id": "003A00000000001", "LastName": "Ng"}),
                    json!({"Id": "003A00000000002", "LastName": null}),
                ],
            )
            .await
            .unwrap_err();

        assert!(
            matches!(
                err.kind,
                ErrorKind::UnexpectedStatus { status: 200, ref body }
                    if body.contains("REQUIRED_FIELD_MISSING")
            ),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn test_update_records_all_succeeded_with_results() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/services/data/v58.0/composite/sobjects"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "003A00000000001", "success": true, "errors": []}
            ])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = SalesforceRestClient::new(mock_server.uri(), "test-token").unwrap();
        client
            .update_records(
                "Contact",
                &[json!({"Id": "003A00000000001", "LastName": "Ng"})],
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_delete_records_builds_composite() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/services/data/v58.0/composite"))
            .and(body_json(json!({
                "allOrNone": true,
                "compositeRequest": [
                    {"method": "DELETE", "url": "/services/data/v58.0/sobjects/Account/001A00000000001", "referenceId": "001A00000000001"},
                    {"method": "DELETE", "url": "/services/data/v58.0/sobjects/Account/001A00000000002", "referenceId": "001A00000000002"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "compositeResponse": [
                    {"body": null, "httpHeaders": {}, "httpStatusCode": 204, "referenceId": "001A00000000001"},
                    {"body": null, "httpHeaders": {}, "httpStatusCode": 204, "referenceId": "001A00000000002"}
                ]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = SalesforceRestClient::new(mock_server.uri(), "test-token").unwrap();
        let response = client
            .delete_records("Account", &["001A00000000001", "001A00000000002"])
            .await
            .unwrap();

        assert_eq!(response.responses.len(), 2);
        assert_eq!(response.failures().count(), 0);
    }

    #[tokio::test]
    async fn test_delete_records_rejects_bad_id() {
        let client = SalesforceRestClient::new("https://na1.salesforce.com", "tok").unwrap();
        let err = client
            .delete_records("Account", &["001A00000000001", "nope"])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("nope"));
    }
}
