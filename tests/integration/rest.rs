//! REST and Tooling clients sharing one authenticated transport.

use serde_json::json;
use sfkit::tooling::CustomField;
use sfkit::{SalesforceRestClient, ToolingClient};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::common::authenticated_client;

#[tokio::test]
async fn test_custom_field_then_query_it() {
    let server = MockServer::start().await;
    let client = authenticated_client(&server).await;
    let tooling = ToolingClient::from_client(client.clone());
    let rest = SalesforceRestClient::from_client(client);

    Mock::given(method("POST"))
        .and(path("/services/data/v58.0/tooling/sobjects/CustomField"))
        .and(body_json(json!({
            "FullName": "Account.Region__c",
            "Metadata": {"label": "Region", "type": "Text", "length": 40}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "00NR0000000001AAA", "success": true, "errors": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/services/data/v58.0/query/"))
        .and(query_param("q", "SELECT Id, Region__c FROM Account"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalSize": 1,
            "done": true,
            "records": [{"attributes": {"type": "Account"}, "Id": "001R0000000001AAA", "Region__c": "EMEA"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let field = CustomField::new("Account.Region__c", "Region", "Text").with_length(40);
    let created = tooling.create_custom_field(&field).await.unwrap();
    assert!(created.success);

    let result = rest
        .query::<serde_json::Value>("SELECT Id, Region__c FROM Account")
        .await
        .unwrap();
    assert!(!result.has_more());
    assert_eq!(result.records[0]["Region__c"], "EMEA");
}
