use serde::{de::DeserializeOwned, Serialize};
use tracing::instrument;

use sfkit_client::Result;

use super::sobject_path;
use crate::describe::DescribeSObjectResult;
use crate::sobject::CreateResult;

impl super::SalesforceRestClient {
    /// Create a new record. Success is 201.
    #[instrument(skip(self, record))]
    pub async fn create<T: Serialize>(&self, sobject: &str, record: &T) -> Result<CreateResult> {
        let path = format!("{}/", sobject_path(sobject, None)?);
        self.client
            .post_json(&self.client.rest_url(&path), record, &[201])
            .await
    }

    /// Get a record by ID as any deserializable shape, usually a JSON map.
    #[instrument(skip(self))]
    pub async fn get<T: DeserializeOwned>(&self, sobject: &str, id: &str) -> Result<T> {
        let path = sobject_path(sobject, Some(id))?;
        self.client.rest_get(&path).await
    }

    /// Update fields on a record. Success is 204.
    #[instrument(skip(self, fields))]
    pub async fn update<T: Serialize>(&self, sobject: &str, id: &str, fields: &T) -> Result<()> {
        let path = sobject_path(sobject, Some(id))?;
        self.client
            .patch_json(&self.client.rest_url(&path), fields, &[204])
            .await
    }

    /// Delete a record. Success is 204.
    #[instrument(skip(self))]
    pub async fn delete(&self, sobject: &str, id: &str) -> Result<()> {
        let path = sobject_path(sobject, Some(id))?;
        self.client
            .delete_request(&self.client.rest_url(&path), &[204])
            .await
    }

    /// Describe an sObject type.
    #[instrument(skip(self))]
    pub async fn describe(&self, sobject: &str) -> Result<DescribeSObjectResult> {
        let path = format!("{}/describe", sobject_path(sobject, None)?);
        self.client.rest_get(&path).await
    }
}
