use iai_chat::services::relay::{
    EndpointSource, RelayError, WebhookRelay, build_client,
};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn relay_for(server: &MockServer) -> WebhookRelay {
    WebhookRelay::new(
        build_client(),
        EndpointSource::fixed(format!("{}/webhook", server.uri())),
        Duration::from_secs(30),
    )
}

#[tokio::test]
async fn relays_message_and_returns_output() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhook"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"message": "What is IAI?", "sessionId": "abc-123"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"output": "IAI stands for ..."})))
        .expect(1)
        .mount(&server)
        .await;

    let reply = relay_for(&server).relay("What is IAI?", "abc-123").await.unwrap();
    assert_eq!(reply, "IAI stands for ...");
}

#[tokio::test]
async fn missing_endpoint_makes_no_call() {
    let relay = WebhookRelay::new(build_client(), EndpointSource::Fixed(None), Duration::from_secs(30));
    assert!(!relay.is_configured());

    let err = relay.relay("hello", "abc-123").await.unwrap_err();
    assert!(matches!(err, RelayError::ConfigurationMissing { key: "N8N_WEBHOOK_URL" }));
    assert!(err.to_string().contains("N8N_WEBHOOK_URL"));
}

#[tokio::test]
async fn unset_environment_key_is_configuration_missing() {
    let relay = WebhookRelay::new(
        build_client(),
        EndpointSource::Env("IAI_TEST_WEBHOOK_URL_NEVER_SET"),
        Duration::from_secs(30),
    );
    let err = relay.relay("hello", "abc-123").await.unwrap_err();
    assert!(err.to_string().contains("IAI_TEST_WEBHOOK_URL_NEVER_SET"));
}

#[tokio::test]
async fn missing_output_field_is_contract_violation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"foo": "bar"})))
        .mount(&server)
        .await;

    let err = relay_for(&server).relay("hello", "abc-123").await.unwrap_err();
    assert!(matches!(err, RelayError::ContractViolation { field: "output" }));
    assert!(err.to_string().contains("'output'"));
}

#[tokio::test]
async fn non_json_body_is_malformed_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = relay_for(&server).relay("hello", "abc-123").await.unwrap_err();
    assert!(matches!(err, RelayError::MalformedResponse(_)));
}

#[tokio::test]
async fn error_status_is_transport_failure_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"output": "ignored"})))
        .expect(1)
        .mount(&server)
        .await;

    let err = relay_for(&server).relay("hello", "abc-123").await.unwrap_err();
    match err {
        RelayError::Transport(e) => assert_eq!(e.status().map(|s| s.as_u16()), Some(500)),
        other => panic!("expected transport failure, got {other:?}"),
    }
}

#[tokio::test]
async fn slow_webhook_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"output": "too late"}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let relay = WebhookRelay::new(
        build_client(),
        EndpointSource::fixed(server.uri()),
        Duration::from_millis(50),
    );
    let err = relay.relay("hello", "abc-123").await.unwrap_err();
    match err {
        RelayError::Transport(e) => assert!(e.is_timeout()),
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_endpoint_is_transport_failure() {
    let relay = WebhookRelay::new(
        build_client(),
        EndpointSource::fixed("http://127.0.0.1:1/webhook"),
        Duration::from_secs(5),
    );
    let err = relay.relay("hello", "abc-123").await.unwrap_err();
    assert!(matches!(err, RelayError::Transport(_)));
    assert!(err.to_string().starts_with("webhook connection error"));
}

#[tokio::test]
async fn transport_messages_carry_the_cause_and_hide_the_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"output": "too late"}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let slow = WebhookRelay::new(
        build_client(),
        EndpointSource::fixed(format!("{}/webhook/SECRET-TOKEN", server.uri())),
        Duration::from_millis(50),
    );
    let refused = WebhookRelay::new(
        build_client(),
        EndpointSource::fixed("http://127.0.0.1:1/webhook/SECRET-TOKEN"),
        Duration::from_secs(5),
    );

    let timeout_text = slow.relay("hello", "abc-123").await.unwrap_err().to_string();
    let refused_text = refused.relay("hello", "abc-123").await.unwrap_err().to_string();

    assert!(timeout_text.contains("timed out"), "{timeout_text}");
    assert!(refused_text.to_lowercase().contains("connect"), "{refused_text}");
    assert_ne!(timeout_text, refused_text);
    for text in [&timeout_text, &refused_text] {
        assert!(!text.contains("SECRET-TOKEN"), "{text}");
        assert!(!text.contains("/webhook"), "{text}");
    }
}
