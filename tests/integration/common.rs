use std::time::Duration;

use serde_json::json;
use sfkit::auth::{ClientCredentialsFlow, Credentials};
use sfkit::{PollPolicy, SalesforceClient};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Install a test subscriber honoring `RUST_LOG`; repeated calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Mount a client-credentials token endpoint whose instance URL is the mock
/// server itself, then authenticate through it.
pub async fn authenticated_client(server: &MockServer) -> SalesforceClient {
    init_tracing();

    Mock::given(method("POST"))
        .and(path("/services/oauth2/token"))
        .and(body_string_contains("grant_type=client_credentials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "00Dxx!mock-session",
            "instance_url": server.uri(),
            "token_type": "Bearer",
            "issued_at": "1700000000000"
        })))
        .expect(1)
        .mount(server)
        .await;

    let flow = ClientCredentialsFlow::new(
        "consumer-key",
        "consumer-secret",
        format!("{}/services/oauth2/token", server.uri()),
    );
    let token = flow.authenticate().await.expect("token grant should succeed");

    token
        .to_credentials("58.0")
        .to_client()
        .expect("client should build")
}

pub fn fast_policy() -> PollPolicy {
    PollPolicy::new(Duration::from_millis(10)).with_timeout(Some(Duration::from_secs(5)))
}
