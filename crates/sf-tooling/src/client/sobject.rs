use tracing::instrument;

use sfkit_client::Result;
use sfkit_rest::CreateResult;

use crate::types::CustomField;

impl super::ToolingClient {
    /// Create a custom field. Success is 201.
    #[instrument(skip(self, field), fields(full_name = %field.full_name))]
    pub async fn create_custom_field(&self, field: &CustomField) -> Result<CreateResult> {
        self.client
            .post_json(
                &self.client.tooling_url("sobjects/CustomField"),
                field,
                &[201],
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::super::ToolingClient;
    use crate::types::CustomField;
    use serde_json::json;
    use sfkit_client::ErrorKind;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_create_custom_field() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/services/data/v58.0/tooling/sobjects/CustomField"))
            .and(body_json(json!({
                "FullName": "Account.Region__c",
                "Metadata": {"label": "Region", "type": "Text", "length": 80}
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "00N000000000001AAA", "success": true, "errors": []
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = ToolingClient::new(mock_server.uri(), "test-token").unwrap();
        let field = CustomField::new("Account.Region__c", "Region", "Text").with_length(80);
        let result = client.create_custom_field(&field).await.unwrap();

        assert_eq!(result.id, "00N000000000001AAA");
        assert!(result.success);
    }

    #[tokio::test]
    async fn test_create_custom_field_requires_instance_url() {
        let client = ToolingClient::new("", "test-token").unwrap();
        let field = CustomField::new("Account.Region__c", "Region", "Text");
        let err = client.create_custom_field(&field).await.unwrap_err();

        assert!(matches!(err.kind, ErrorKind::MissingCredentials));
    }
}
