use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use worth_check::llm::{ChatModel, ChatOptions, ChatRequest, OpenRouterClient};
use worth_check::{Config, ModelError};

fn config_for(server: &MockServer) -> Config {
    Config {
        api_base_url: format!("{}/v1", server.uri()),
        api_key: Some("test-key".to_string()),
        request_timeout_seconds: 5,
        ..Config::default()
    }
}

fn request() -> ChatRequest {
    let mut options = ChatOptions::with_temperature(0.1);
    options.max_tokens = Some(5);

    ChatRequest {
        model: "test-model".to_string(),
        system_prompt: "Answer YES or NO.".to_string(),
        user_prompt: "Can I price a toaster?".to_string(),
        options,
    }
}

#[tokio::test]
async fn sends_openai_compatible_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(header("X-Title", "Is It Worth It?"))
        .and(body_partial_json(json!({
            "model": "test-model",
            "max_tokens": 5,
            "messages": [
                {"role": "system", "content": "Answer YES or NO."},
                {"role": "user", "content": "Can I price a toaster?"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "provider/test-model-v2",
            "choices": [{"message": {"role": "assistant", "content": "YES"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenRouterClient::new(&config_for(&server)).unwrap();
    let completion = assert_ok!(client.chat_complete(request()).await);

    assert_eq!(completion.text, "YES");
    assert_eq!(completion.model, "provider/test-model-v2");
}

#[tokio::test]
async fn missing_model_field_reports_requested_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "12"}}]
        })))
        .mount(&server)
        .await;

    let client = OpenRouterClient::new(&config_for(&server)).unwrap();
    let completion = assert_ok!(client.chat_complete(request()).await);
    assert_eq!(completion.model, "test-model");
}

#[tokio::test]
async fn server_error_is_a_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let client = OpenRouterClient::new(&config_for(&server)).unwrap();
    let err = assert_err!(client.chat_complete(request()).await);

    match err {
        ModelError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "upstream down");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn blank_content_is_an_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "test-model",
            "choices": [{"message": {"content": "   "}}]
        })))
        .mount(&server)
        .await;

    let client = OpenRouterClient::new(&config_for(&server)).unwrap();
    let err = assert_err!(client.chat_complete(request()).await);
    assert!(matches!(err, ModelError::EmptyResponse));
}

#[tokio::test]
async fn non_json_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let client = OpenRouterClient::new(&config_for(&server)).unwrap();
    let err = assert_err!(client.chat_complete(request()).await);
    assert!(matches!(err, ModelError::Decode(_)));
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error() {
    let config = Config {
        api_base_url: "http://127.0.0.1:1/v1".to_string(),
        request_timeout_seconds: 2,
        ..Config::default()
    };
    let client = OpenRouterClient::new(&config).unwrap();

    let err = assert_err!(client.chat_complete(request()).await);
    assert!(matches!(err, ModelError::Transport(_)));
}
