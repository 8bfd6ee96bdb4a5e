//! Deploy, checkDeployStatus and cancelDeploy.

use base64::{engine::general_purpose, Engine as _};
use tracing::{info, instrument};

use sfkit_client::xml::escape;
use sfkit_client::{
    poll_until_terminal, OperationHandle, OperationKind, OperationState, OperationStatus,
    PollPolicy, Progress, RemoteError, Result,
};

use super::xml_helpers::{parse_async_id, parse_deploy_outcome};
use super::MetadataClient;
use crate::deploy::{DeployOptions, DeployOutcome};

impl MetadataClient {
    /// Submit a base64-encoded zip for deployment.
    ///
    /// The returned handle is `Queued`; completion is only ever observed
    /// through [`check_deploy_status`](Self::check_deploy_status).
    #[instrument(skip(self, zip_base64, options), fields(check_only = options.check_only))]
    pub async fn deploy(
        &self,
        zip_base64: &str,
        options: &DeployOptions,
    ) -> Result<OperationHandle> {
        let body = format!(
            "<met:deploy><met:ZipFile>{}</met:ZipFile>{}</met:deploy>",
            zip_base64,
            options.to_xml()
        );

        let id = self
            .call("deploy", self.api_version(), &body, parse_async_id)
            .await?;

        info!(id = %id, "Deploy submitted");
        Ok(OperationHandle::submitted(id, OperationKind::Deploy))
    }

    /// Submit raw zip bytes for deployment.
    pub async fn deploy_zip(&self, zip: &[u8], options: &DeployOptions) -> Result<OperationHandle> {
        let encoded = general_purpose::STANDARD.encode(zip);
        self.deploy(&encoded, options).await
    }

    /// Poll a deployment, including component and test details.
    #[instrument(skip(self))]
    pub async fn check_deploy_status(
        &self,
        async_process_id: &str,
    ) -> Result<OperationStatus<DeployOutcome>> {
        let body = format!(
            "<met:checkDeployStatus><met:asyncProcessId>{}</met:asyncProcessId><met:includeDetails>true</met:includeDetails></met:checkDeployStatus>",
            escape(async_process_id)
        );

        let outcome = self
            .call(
                "checkDeployStatus",
                self.api_version(),
                &body,
                parse_deploy_outcome,
            )
            .await?;

        Ok(deploy_status(outcome))
    }

    /// Request cancellation of an in-progress deployment.
    ///
    /// The handle reports `Aborted` only if the server says the cancel is
    /// already done; otherwise the deploy must still be polled until it ends.
    #[instrument(skip(self))]
    pub async fn cancel_deploy(&self, async_process_id: &str) -> Result<OperationHandle> {
        let body = format!(
            "<met:cancelDeploy><met:asyncProcessId>{}</met:asyncProcessId></met:cancelDeploy>",
            escape(async_process_id)
        );

        let (id, done) = self
            .call("cancelDeploy", self.api_version(), &body, |result| {
                Ok((parse_async_id(result)?, result.bool_of("done")))
            })
            .await?;

        info!(id = %id, done, "Deploy cancel requested");
        let state = if done {
            OperationState::Aborted
        } else {
            OperationState::InProgress
        };
        Ok(OperationHandle::submitted(id, OperationKind::Deploy).with_state(state, done))
    }

    /// Poll a deployment until it is done.
    pub async fn wait_for_deploy(
        &self,
        async_process_id: &str,
        policy: &PollPolicy,
    ) -> Result<OperationStatus<DeployOutcome>> {
        poll_until_terminal(|| self.check_deploy_status(async_process_id), policy).await
    }
}

fn deploy_status(outcome: DeployOutcome) -> OperationStatus<DeployOutcome> {
    let progress = Progress {
        processed: Some(outcome.number_components_deployed),
        total: Some(outcome.number_components_total),
        errors: Some(outcome.number_component_errors),
        tests_completed: Some(outcome.number_tests_completed),
        tests_total: Some(outcome.number_tests_total),
        test_errors: Some(outcome.number_test_errors),
    };
    let error = outcome.error_message.clone().map(|message| RemoteError {
        code: outcome.error_status_code.clone(),
        message,
    });

    OperationStatus::new(
        outcome.id.clone(),
        OperationKind::Deploy,
        outcome.status.into(),
        outcome.status.as_str(),
        outcome.done,
    )
    .with_success(outcome.success)
    .with_progress(progress)
    .with_error(error)
    .with_detail(outcome)
}
