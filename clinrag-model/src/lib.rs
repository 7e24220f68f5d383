//! # clinrag-model
//!
//! LLM gateway for the [`clinrag`] engine (OpenAI, OpenRouter).
//!
//! ## Overview
//!
//! This crate implements [`clinrag::CompletionGateway`] over the OpenAI
//! chat completions protocol:
//!
//! - [`OpenAiGateway`] - blocking and streaming completions
//! - [`GatewayConfig`] - endpoint, model, and timeout settings
//!
//! OpenRouter and other OpenAI-compatible endpoints work through the same
//! gateway by pointing the base URL at them.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use clinrag_model::{GatewayConfig, OpenAiGateway};
//!
//! let api_key = std::env::var("OPENAI_API_KEY").unwrap();
//! let gateway = OpenAiGateway::new(GatewayConfig::openai(api_key)).unwrap();
//! ```
//!
//! ### OpenRouter
//!
//! ```rust,no_run
//! use clinrag_model::{GatewayConfig, OpenAiGateway};
//!
//! let api_key = std::env::var("OPENROUTER_API_KEY").unwrap();
//! let gateway = OpenAiGateway::new(GatewayConfig::openrouter(
//!     api_key,
//!     "google/gemini-2.0-flash-exp:free",
//! ))
//! .unwrap();
//! ```
//!
//! ## Known Models
//!
//! ### OpenAI
//! | Model | Description |
//! |-------|-------------|
//! | `gpt-4o-mini` | Fast, cost-effective (default) |
//! | `gpt-4o` | Most capable model |
//! | `gpt-4-turbo` | Previous generation flagship |
//!
//! ### OpenRouter
//! | Model | Description |
//! |-------|-------------|
//! | `google/gemini-2.0-flash-exp:free` | Free tier, fast |
//! | `google/gemini-pro` | Capable general model |
//! | `openai/gpt-4o-mini` | OpenAI routed through OpenRouter |
//!
//! ## Features
//!
//! - Streaming over server-sent events with `[DONE]` termination
//! - Model-rejection errors that name working alternatives
//! - Configurable base URL for any OpenAI-compatible endpoint

pub mod client;
pub mod config;

pub use client::OpenAiGateway;
pub use config::{GatewayConfig, OPENAI_API_BASE, OPENROUTER_API_BASE};
