use std::time::Duration;

use clinrag::{ChatMessage, CompletionRequest, EngineError};
use clinrag_model::{GatewayConfig, OpenAiGateway, OPENAI_API_BASE, OPENROUTER_API_BASE};

#[tokio::test]
async fn test_gateway_creation() {
    let result = OpenAiGateway::new(GatewayConfig::new("test-api-key", "gpt-4o-mini"));
    assert!(result.is_ok());

    let gateway = result.unwrap();
    assert_eq!(gateway.model(), "gpt-4o-mini");
    assert_eq!(gateway.provider_name(), "OpenAI");
}

#[tokio::test]
async fn test_empty_api_key_is_rejected() {
    let result = OpenAiGateway::new(GatewayConfig::new("", "gpt-4o-mini"));
    assert!(matches!(result, Err(EngineError::Config(_))));
}

#[tokio::test]
async fn test_empty_model_is_rejected() {
    let result = OpenAiGateway::new(GatewayConfig::new("test-api-key", ""));
    assert!(matches!(result, Err(EngineError::Config(_))));
}

#[test]
fn test_default_config_targets_openai() {
    let config = GatewayConfig::openai("test-api-key");
    assert_eq!(config.base_url, OPENAI_API_BASE);
    assert_eq!(config.model, "gpt-4o-mini");
    assert_eq!(config.timeout, Duration::from_secs(60));
}

#[test]
fn test_openrouter_config_uses_openrouter_base() {
    let config = GatewayConfig::openrouter("test-api-key", "google/gemini-pro");
    assert_eq!(config.base_url, OPENROUTER_API_BASE);
    assert_eq!(config.model, "google/gemini-pro");
}

#[test]
fn test_timeout_override() {
    let config = GatewayConfig::openai("test-api-key").with_timeout(Duration::from_secs(5));
    assert_eq!(config.timeout, Duration::from_secs(5));
}

#[tokio::test]
async fn test_completion_request_creation() {
    let request = CompletionRequest {
        messages: vec![ChatMessage::system("Be brief."), ChatMessage::user("Hello")],
        max_tokens: 800,
        temperature: 0.2,
    };

    assert_eq!(request.messages.len(), 2);
    assert_eq!(request.messages[1].content, "Hello");
}
