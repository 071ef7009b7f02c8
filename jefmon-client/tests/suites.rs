use jefmon_client::{ClientError, InstanceClient};
use jefmon_core::domain::state::{JobState, StateBucket};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn serve(body: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/suites/json"))
        .respond_with(body)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn fetch_summary_decodes_counts() {
    let server = serve(ResponseTemplate::new(200).set_body_raw(
        r#"{"name":"A","total":3,"statuses":{"RUNNING":2,"COMPLETED":1}}"#,
        "application/json",
    ))
    .await;

    let client = InstanceClient::new(format!("{}/", server.uri()));
    let summary = client.fetch_summary().await.expect("fetch ok");

    assert_eq!(summary.name(), "A");
    assert_eq!(summary.url(), Some(server.uri().as_str()));
    assert_eq!(summary.total_roots(), 3);
    assert_eq!(summary.counts().get(JobState::Running), 2);
    assert_eq!(summary.counts().get(JobState::Completed), 1);
    assert!(!summary.has_error());
}

#[tokio::test]
async fn fetch_summary_keeps_unclassified_bucket() {
    let server = serve(ResponseTemplate::new(200).set_body_raw(
        r#"{"name":"A","total":2,"statuses":{"":1,"STOPPED":1}}"#,
        "application/json",
    ))
    .await;

    let summary = InstanceClient::new(server.uri())
        .fetch_summary()
        .await
        .expect("fetch ok");
    assert_eq!(summary.counts().get(StateBucket::Unclassified), 1);
    assert_eq!(summary.counts().get(JobState::Stopped), 1);
}

#[tokio::test]
async fn fetch_summary_rejects_unknown_state() {
    let server = serve(ResponseTemplate::new(200).set_body_raw(
        r#"{"name":"A","total":1,"statuses":{"NOT_A_STATE":1}}"#,
        "application/json",
    ))
    .await;

    let err = InstanceClient::new(server.uri())
        .fetch_summary()
        .await
        .unwrap_err();
    assert!(err.is_bad_format(), "unexpected error: {err}");
}

#[tokio::test]
async fn fetch_summary_rejects_overflowing_counts() {
    let server = serve(ResponseTemplate::new(200).set_body_raw(
        r#"{"name":"A","total":1,"statuses":{"":18446744073709551615," ":1}}"#,
        "application/json",
    ))
    .await;

    let err = InstanceClient::new(server.uri())
        .fetch_summary()
        .await
        .unwrap_err();
    assert!(err.is_bad_format(), "unexpected error: {err}");
}

#[tokio::test]
async fn fetch_summary_rejects_malformed_json() {
    let server = serve(ResponseTemplate::new(200).set_body_string("<html>not json</html>")).await;

    let err = InstanceClient::new(server.uri())
        .fetch_summary()
        .await
        .unwrap_err();
    assert!(err.is_bad_format(), "unexpected error: {err}");
}

#[tokio::test]
async fn fetch_summary_rejects_missing_fields() {
    let server = serve(ResponseTemplate::new(200).set_body_string(r#"{"name":"A"}"#)).await;

    let err = InstanceClient::new(server.uri())
        .fetch_summary()
        .await
        .unwrap_err();
    assert!(err.is_bad_format(), "unexpected error: {err}");
}

#[tokio::test]
async fn fetch_summary_reports_empty_body() {
    let server = serve(ResponseTemplate::new(200)).await;

    let err = InstanceClient::new(server.uri())
        .fetch_summary()
        .await
        .unwrap_err();
    assert!(err.is_no_content(), "unexpected error: {err}");
}

#[tokio::test]
async fn fetch_summary_reports_204_as_no_content() {
    let server = serve(ResponseTemplate::new(204)).await;

    let err = InstanceClient::new(server.uri())
        .fetch_summary()
        .await
        .unwrap_err();
    assert!(err.is_no_content(), "unexpected error: {err}");
}

#[tokio::test]
async fn fetch_summary_reports_error_status() {
    let server = serve(ResponseTemplate::new(503).set_body_string("down for maintenance")).await;

    let err = InstanceClient::new(server.uri())
        .fetch_summary()
        .await
        .unwrap_err();
    match err {
        ClientError::ApiError { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "down for maintenance");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn fetch_summary_reports_connection_refused() {
    // Grab a free port, then release it so nothing is listening there.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let err = InstanceClient::new(format!("http://127.0.0.1:{port}"))
        .fetch_summary()
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::RequestFailed(_)), "unexpected error: {err}");
}
