//! CardRequestor over ReqwestTransport against a wiremock server.

use cardstack_client::{CardRequestor, ReqwestTransport, RequestContext};
use cardstack_core::testing::card_with_test_values;
use cardstack_core::{Card, CardstackError};
use cardstack_resilience::RetryPolicy;
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn requestor(server: &MockServer, max_attempts: u32) -> CardRequestor {
    let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();
    let retry = RetryPolicy::new(max_attempts, Duration::from_millis(10)).unwrap();
    CardRequestor::new(Arc::new(transport), &server.uri(), retry)
}

#[tokio::test]
async fn test_read_decodes_card() {
    let server = MockServer::start().await;
    let card = card_with_test_values().with_id(7).with_description("mint");

    Mock::given(method("GET"))
        .and(path("/service/card/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&card))
        .expect(1)
        .mount(&server)
        .await;

    let read = requestor(&server, 3)
        .read(&RequestContext::new(), 7)
        .await
        .unwrap();

    assert_eq!(read, card);
    assert_eq!(read.id, Some(7));
}

#[tokio::test]
async fn test_read_retries_server_errors() {
    let server = MockServer::start().await;
    let card = card_with_test_values().with_id(7);

    Mock::given(method("GET"))
        .and(path("/service/card/7"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/service/card/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&card))
        .expect(1)
        .mount(&server)
        .await;

    let read = requestor(&server, 3)
        .read(&RequestContext::new(), 7)
        .await
        .unwrap();

    assert_eq!(read.id, Some(7));
}

#[tokio::test]
async fn test_create_sends_camel_case_json() {
    let server = MockServer::start().await;
    let card = Card::new("Ace", "1234", vec![1, 2, 3], "image/png", "spade");
    let created = card.clone().with_id(21);

    Mock::given(method("POST"))
        .and(path("/service/card"))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!({
            "id": null,
            "cardName": "Ace",
            "cardNumber": "1234",
            "cardImage": "AQID",
            "cardImageMimeType": "image/png",
            "cardType": "spade",
            "cardDescription": null
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(&created))
        .expect(1)
        .mount(&server)
        .await;

    let result = requestor(&server, 1)
        .create(&RequestContext::new(), &card)
        .await
        .unwrap();

    assert_eq!(result.id, Some(21));
}

#[tokio::test]
async fn test_update_failure_is_not_retried() {
    let server = MockServer::start().await;
    let card = card_with_test_values().with_id(5);

    Mock::given(method("PUT"))
        .and(path("/service/card"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let err = requestor(&server, 3)
        .update(&RequestContext::new(), &card)
        .await
        .unwrap_err();

    assert!(matches!(err, CardstackError::UnexpectedStatus { status: 500, .. }));
}

#[tokio::test]
async fn test_delete_forwards_headers_and_returns_status() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/service/card/9"))
        .and(header("x-request-id", "req-9"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = RequestContext::new().with_header(
        HeaderName::from_static("x-request-id"),
        HeaderValue::from_static("req-9"),
    );
    let status = requestor(&server, 3).delete(&ctx, 9).await.unwrap();

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() {
    let transport = ReqwestTransport::new(Duration::from_secs(1)).unwrap();
    let retry = RetryPolicy::new(2, Duration::from_millis(1)).unwrap();
    let requestor = CardRequestor::new(Arc::new(transport), "http://127.0.0.1:9", retry);

    let err = requestor.read(&RequestContext::new(), 1).await.unwrap_err();

    assert!(matches!(err, CardstackError::Transport(_)));
}
