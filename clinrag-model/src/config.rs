//! Gateway configuration for OpenAI-compatible chat endpoints.

use std::time::Duration;

/// The OpenAI chat API base URL.
pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// The OpenRouter chat API base URL (OpenAI-compatible).
pub const OPENROUTER_API_BASE: &str = "https://openrouter.ai/api/v1";

/// The default chat model.
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// The default per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for [`OpenAiGateway`](crate::OpenAiGateway).
///
/// Defaults target the OpenAI API with `gpt-4o-mini` and a 60 second
/// timeout. Any OpenAI-compatible endpoint works through
/// [`with_base_url`](Self::with_base_url); [`openrouter`](Self::openrouter)
/// is a shortcut for the most common alternative.
///
/// # Example
///
/// ```rust,ignore
/// use clinrag_model::GatewayConfig;
///
/// let openai = GatewayConfig::openai(std::env::var("OPENAI_API_KEY")?);
///
/// let openrouter = GatewayConfig::openrouter(
///     std::env::var("OPENROUTER_API_KEY")?,
///     "google/gemini-2.0-flash-exp:free",
/// );
/// ```
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Bearer token sent with every request.
    pub api_key: String,
    /// Endpoint base, without the `/chat/completions` suffix.
    pub base_url: String,
    /// Model identifier passed through to the endpoint.
    pub model: String,
    /// Per-request timeout, covering connect and the full response body.
    pub timeout: Duration,
}

impl GatewayConfig {
    /// Create a configuration for the given model against the OpenAI API.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: OPENAI_API_BASE.to_string(),
            model: model.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create a configuration for the default OpenAI chat model.
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self::new(api_key, DEFAULT_MODEL)
    }

    /// Create a configuration for an OpenRouter-hosted model.
    pub fn openrouter(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::new(api_key, model).with_base_url(OPENROUTER_API_BASE)
    }

    /// Point the gateway at a custom OpenAI-compatible endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
