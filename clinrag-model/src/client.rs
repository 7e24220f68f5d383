//! OpenAI-compatible chat completion gateway.

use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures::StreamExt;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use clinrag::{
    ChatMessage, CompletionGateway, CompletionRequest, EngineError, Result, TokenStream,
};

use crate::config::GatewayConfig;

/// A [`CompletionGateway`] speaking the OpenAI chat completions protocol.
///
/// Works against the OpenAI API and any compatible endpoint, including
/// OpenRouter. Streaming uses server-sent events terminated by the
/// `[DONE]` marker.
///
/// # Example
///
/// ```rust,ignore
/// use clinrag_model::{GatewayConfig, OpenAiGateway};
///
/// let gateway = OpenAiGateway::new(GatewayConfig::openai("sk-..."))?;
/// let answer = gateway.complete(request).await?;
/// ```
pub struct OpenAiGateway {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl OpenAiGateway {
    /// Create a gateway from the given configuration.
    ///
    /// Fails if the API key or model is empty, or if the HTTP client
    /// cannot be constructed.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(EngineError::Config("gateway API key must not be empty".into()));
        }
        if config.model.is_empty() {
            return Err(EngineError::Config("gateway model must not be empty".into()));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| EngineError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// The configured model identifier.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// The provider name used in log fields and error messages.
    pub fn provider_name(&self) -> &'static str {
        if self.config.base_url.contains("openrouter") { "OpenRouter" } else { "OpenAI" }
    }

    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn model_suggestions(&self) -> &'static str {
        if self.config.base_url.contains("openrouter") {
            "google/gemini-2.0-flash-exp:free, google/gemini-pro, openai/gpt-4o-mini"
        } else {
            "gpt-4o-mini, gpt-4o, gpt-4-turbo"
        }
    }

    fn api_error(&self, status: StatusCode, detail: String) -> EngineError {
        let message = if is_model_rejection(status, &detail) {
            format!(
                "model '{}' was rejected ({status}): {detail}; known models on {} include {}",
                self.config.model,
                self.provider_name(),
                self.model_suggestions(),
            )
        } else {
            format!("API returned {status}: {detail}")
        };

        EngineError::Completion { provider: self.provider_name().into(), message }
    }

    async fn send_chat(
        &self,
        request: &CompletionRequest,
        stream: bool,
    ) -> Result<reqwest::Response> {
        let body = ChatCompletionRequest {
            model: &self.config.model,
            messages: request.messages.iter().map(WireMessage::from).collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream,
        };

        debug!(
            provider = self.provider_name(),
            model = %self.config.model,
            message_count = request.messages.len(),
            stream,
            "sending chat completion request"
        );

        let response = self
            .client
            .post(self.chat_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = self.provider_name(), error = %e, "request failed");
                EngineError::Completion {
                    provider: self.provider_name().into(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            error!(provider = self.provider_name(), %status, "API error");
            return Err(self.api_error(status, detail));
        }

        Ok(response)
    }
}

/// Whether an API rejection points at the model identifier rather than
/// the request itself.
fn is_model_rejection(status: StatusCode, detail: &str) -> bool {
    if status == StatusCode::NOT_FOUND {
        return true;
    }
    let lower = detail.to_lowercase();
    lower.contains("model") && (lower.contains("not found") || lower.contains("does not exist"))
}

// ── OpenAI API request/response types ──────────────────────────────

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> From<&'a ChatMessage> for WireMessage<'a> {
    fn from(message: &'a ChatMessage) -> Self {
        Self { role: message.role.as_str(), content: &message.content }
    }
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ResponseChoice>,
}

#[derive(Deserialize)]
struct ResponseChoice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatCompletionChunk {
    choices: Vec<ChunkChoice>,
}

#[derive(Deserialize)]
struct ChunkChoice {
    delta: ChunkDelta,
}

#[derive(Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

// ── CompletionGateway implementation ───────────────────────────────

#[async_trait]
impl CompletionGateway for OpenAiGateway {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        let response = self.send_chat(&request, false).await?;

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            error!(provider = self.provider_name(), error = %e, "failed to parse response");
            EngineError::Completion {
                provider: self.provider_name().into(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        let text = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        debug!(provider = self.provider_name(), response_len = text.len(), "completion finished");
        Ok(text)
    }

    async fn complete_stream(&self, request: CompletionRequest) -> Result<TokenStream> {
        let response = self.send_chat(&request, true).await?;

        let provider = self.provider_name().to_string();
        let mut events = response.bytes_stream().eventsource();

        // A transport failure ends the stream; a malformed event is
        // reported and skipped.
        let stream = async_stream::stream! {
            while let Some(event) = events.next().await {
                match event {
                    Ok(event) => {
                        if event.data == "[DONE]" {
                            break;
                        }
                        match serde_json::from_str::<ChatCompletionChunk>(&event.data) {
                            Ok(chunk) => {
                                let content = chunk
                                    .choices
                                    .into_iter()
                                    .next()
                                    .and_then(|choice| choice.delta.content)
                                    .unwrap_or_default();
                                if !content.is_empty() {
                                    yield Ok(content);
                                }
                            }
                            Err(e) => {
                                yield Err(EngineError::Completion {
                                    provider: provider.clone(),
                                    message: format!("failed to parse stream event: {e}"),
                                });
                            }
                        }
                    }
                    Err(e) => {
                        yield Err(EngineError::Completion {
                            provider: provider.clone(),
                            message: format!("stream interrupted: {e}"),
                        });
                        break;
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }
}
