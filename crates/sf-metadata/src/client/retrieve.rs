//! Retrieve and checkRetrieveStatus.

use tracing::{info, instrument};

use sfkit_client::xml::escape;
use sfkit_client::{
    poll_until_terminal, OperationHandle, OperationKind, OperationStatus, PollPolicy, RemoteError,
    Result,
};

use super::xml_helpers::{parse_async_id, parse_retrieve_outcome};
use super::MetadataClient;
use crate::retrieve::{normalize_manifest, RetrieveOutcome, RetrieveRequest};

impl MetadataClient {
    /// Submit a retrieve for the manifest in `request`.
    #[instrument(skip(self, request))]
    pub async fn retrieve(&self, request: &RetrieveRequest) -> Result<OperationHandle> {
        let api_version = request
            .api_version
            .as_deref()
            .unwrap_or_else(|| self.api_version());

        let body = format!(
            "<met:retrieve><met:retrieveRequest><met:apiVersion>{}</met:apiVersion><met:singlePackage>{}</met:singlePackage><met:unpackaged>{}</met:unpackaged></met:retrieveRequest></met:retrieve>",
            escape(api_version),
            request.single_package,
            normalize_manifest(&request.unpackaged)
        );

        let id = self
            .call("retrieve", api_version, &body, parse_async_id)
            .await?;

        info!(id = %id, api_version, "Retrieve submitted");
        Ok(OperationHandle::submitted(id, OperationKind::Retrieve))
    }

    /// Poll a retrieve. Once done, the detail carries the whole result,
    /// zip included.
    #[instrument(skip(self))]
    pub async fn check_retrieve_status(
        &self,
        async_process_id: &str,
    ) -> Result<OperationStatus<RetrieveOutcome>> {
        let body = format!(
            "<met:checkRetrieveStatus><met:asyncProcessId>{}</met:asyncProcessId><met:includeZip>true</met:includeZip></met:checkRetrieveStatus>",
            escape(async_process_id)
        );

        let outcome = self
            .call(
                "checkRetrieveStatus",
                self.api_version(),
                &body,
                parse_retrieve_outcome,
            )
            .await?;

        let error = outcome.error_message.clone().map(|message| RemoteError {
            code: outcome.error_status_code.clone(),
            message,
        });

        Ok(OperationStatus::new(
            outcome.id.clone(),
            OperationKind::Retrieve,
            outcome.status.into(),
            outcome.status.as_str(),
            outcome.done,
        )
        .with_success(outcome.success)
        .with_error(error)
        .with_detail(outcome))
    }

    /// Poll a retrieve until it is done.
    pub async fn wait_for_retrieve(
        &self,
        async_process_id: &str,
        policy: &PollPolicy,
    ) -> Result<OperationStatus<RetrieveOutcome>> {
        poll_until_terminal(|| self.check_retrieve_status(async_process_id), policy).await
    }
}
