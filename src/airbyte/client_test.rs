use super::*;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> AirbyteClient {
    AirbyteClient::with_base_url(
        format!("{}/api/v1", server.uri()),
        "secret-token",
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn test_request_posts_json_with_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/sources/get"))
        .and(header("authorization", "Basic secret-token"))
        .and(body_json(json!({"sourceId": "s-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sourceId": "s-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let res = client_for(&server)
        .request("/sources/get", json!({"sourceId": "s-1"}))
        .await
        .unwrap();
    assert_eq!(res["sourceId"], "s-1");
}

#[tokio::test]
async fn test_non_json_success_yields_empty_object() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/sources/delete"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let res = client_for(&server)
        .request("sources/delete", json!({"sourceId": "s-1"}))
        .await
        .unwrap();
    assert_eq!(res, json!({}));
}

#[tokio::test]
async fn test_error_status_carries_remote_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"message": "invalid source config"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .request("sources/create", json!({}))
        .await
        .unwrap_err();
    match err {
        AirbyteError::Status { status, message } => {
            assert_eq!(status, 422);
            assert_eq!(message, "invalid source config");
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_server_is_connectivity_error() {
    let client = AirbyteClient::with_base_url(
        "http://127.0.0.1:1/api/v1",
        "t",
        Duration::from_secs(1),
    )
    .unwrap();

    let err = client.request("workspaces/list", json!({})).await.unwrap_err();
    assert!(matches!(err, AirbyteError::Connectivity(_)));
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = AirbyteClient::with_base_url(
        format!("{}/api/v1", server.uri()),
        "t",
        Duration::from_millis(200),
    )
    .unwrap();
    let err = client.request("jobs/get", json!({"id": 1})).await.unwrap_err();
    assert!(matches!(err, AirbyteError::Connectivity(_)));
}
