//! Metadata deploy and retrieve through the shared polling driver.

use sfkit::metadata::{DeployOptions, PackageManifest, RetrieveRequest, TestLevel};
use sfkit::{ErrorKind, MetadataClient, OperationKind, OperationState};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::common::{authenticated_client, fast_policy};

const ENDPOINT: &str = "/services/Soap/m/58.0";

fn envelope(operation: &str, result: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns="http://soap.sforce.com/2006/04/metadata"><soapenv:Body><{operation}Response><result>{result}</result></{operation}Response></soapenv:Body></soapenv:Envelope>"#
    )
}

#[tokio::test]
async fn test_deploy_runs_specified_tests_to_success() {
    let server = MockServer::start().await;
    let client = MetadataClient::from_client(authenticated_client(&server).await);

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(header("SOAPAction", "\"\""))
        .and(body_string_contains("<met:sessionId>00Dxx!mock-session</met:sessionId>"))
        .and(body_string_contains("<met:runTests>AccountTest</met:runTests>"))
        .and(body_string_contains("<met:runTests>ContactTest</met:runTests>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(envelope(
            "deploy",
            "<done>false</done><id>0AfR00000000001</id><state>Queued</state>",
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_string_contains("<met:checkDeployStatus>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(envelope(
            "checkDeployStatus",
            "<done>false</done><id>0AfR00000000001</id><status>InProgress</status><success>false</success>\
             <numberComponentsTotal>3</numberComponentsTotal><numberComponentsDeployed>1</numberComponentsDeployed>",
        )))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_string_contains("<met:checkDeployStatus>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(envelope(
            "checkDeployStatus",
            "<done>true</done><id>0AfR00000000001</id><status>Succeeded</status><success>true</success>\
             <checkOnly>false</checkOnly>\
             <numberComponentsTotal>3</numberComponentsTotal><numberComponentsDeployed>3</numberComponentsDeployed>\
             <numberComponentErrors>0</numberComponentErrors>\
             <numberTestsTotal>2</numberTestsTotal><numberTestsCompleted>2</numberTestsCompleted>\
             <numberTestErrors>0</numberTestErrors>\
             <details><runTestResult><numTestsRun>2</numTestsRun><numFailures>0</numFailures>\
             <totalTime>812.0</totalTime></runTestResult></details>",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let options = DeployOptions::default()
        .with_test_level(TestLevel::RunSpecifiedTests)
        .with_run_tests(["AccountTest", "ContactTest"]);
    let handle = client.deploy_zip(b"PK\x03\x04", &options).await.unwrap();
    assert_eq!(handle.kind, OperationKind::Deploy);
    assert!(!handle.done);

    let status = client
        .wait_for_deploy(&handle.id, &fast_policy())
        .await
        .unwrap()
        .into_outcome()
        .unwrap();

    assert_eq!(status.state, OperationState::Succeeded);
    assert_eq!(status.progress.processed, Some(3));
    assert_eq!(status.progress.tests_completed, Some(2));
    let outcome = status.detail.unwrap();
    assert!(!outcome.has_test_failures());
    assert_eq!(outcome.number_tests_total, 2);
}

#[tokio::test]
async fn test_retrieve_manifest_and_unpack_zip() {
    let server = MockServer::start().await;
    let client = MetadataClient::from_client(authenticated_client(&server).await);

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(body_string_contains("<met:retrieve>"))
        .and(body_string_contains("<met:unpackaged><types>"))
        .and(body_string_contains("<members>Foo</members>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(envelope(
            "retrieve",
            "<done>false</done><id>09SR00000000001</id><state>Queued</state>",
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_string_contains("<met:checkRetrieveStatus>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(envelope(
            "checkRetrieveStatus",
            "<done>true</done><id>09SR00000000001</id><status>Succeeded</status>\
             <success>true</success><zipFile>UEsDBA==</zipFile>",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let manifest = PackageManifest::new("58.0").add_type("ApexClass", ["Foo"]);
    let handle = client
        .retrieve(&RetrieveRequest::from_manifest(&manifest))
        .await
        .unwrap();
    assert_eq!(handle.kind, OperationKind::Retrieve);

    let status = client
        .wait_for_retrieve(&handle.id, &fast_policy())
        .await
        .unwrap();
    assert!(status.success);
    assert_eq!(status.detail.unwrap().zip_bytes().unwrap(), b"PK\x03\x04");
}

#[tokio::test]
async fn test_expired_session_is_classified() {
    let server = MockServer::start().await;
    let client = MetadataClient::from_client(authenticated_client(&server).await);

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(500).set_body_string(
            r#"<?xml version="1.0" encoding="UTF-8"?><soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/"><soapenv:Body><soapenv:Fault><faultcode>sf:INVALID_SESSION_ID</faultcode><faultstring>INVALID_SESSION_ID: Session expired or invalid</faultstring></soapenv:Fault></soapenv:Body></soapenv:Envelope>"#,
        ))
        .mount(&server)
        .await;

    let err = client.check_deploy_status("0AfR00000000001").await.unwrap_err();
    assert!(err.is_invalid_session());
    assert!(matches!(err.kind, ErrorKind::SoapFault { .. }));
}
