//! Completion gateway trait for language-model exchanges.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::error::Result;
use crate::message::CompletionRequest;

/// An incremental sequence of generated text fragments.
///
/// Fragments arrive in output order; concatenating every `Ok` item yields
/// the full completion text.
pub type TokenStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// A language-model request/response exchange.
///
/// Timeouts and retries are the gateway's responsibility; the engine calls
/// once and surfaces any error unchanged.
///
/// # Example
///
/// ```rust,ignore
/// use clinrag::{CompletionGateway, CompletionRequest};
/// use futures::StreamExt;
///
/// let text = gateway.complete(request.clone()).await?;
///
/// let mut stream = gateway.complete_stream(request).await?;
/// while let Some(fragment) = stream.next().await {
///     print!("{}", fragment?);
/// }
/// ```
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Execute a completion and return the full generated text.
    async fn complete(&self, request: CompletionRequest) -> Result<String>;

    /// Execute a completion, yielding text fragments as they are generated.
    ///
    /// Dropping the returned stream before exhaustion cancels the exchange;
    /// implementations must tolerate that without panicking.
    async fn complete_stream(&self, request: CompletionRequest) -> Result<TokenStream>;
}
