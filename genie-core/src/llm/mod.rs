//! LLM provider abstraction for dish identification, recipe generation and chat.
//!
//! This module provides a trait-based abstraction over the generative model
//! backend, with a Gemini implementation for production and a fake one for
//! tests.

mod fake;
mod gemini;

pub use fake::{FakeProvider, FAKE_CHAT_REPLY, FAKE_DISH_REPLY, FAKE_RECIPE_REPLY};
pub use gemini::GeminiProvider;

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Error type for LLM operations.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("API request timed out")]
    Timeout,

    #[error("API returned error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },
}

/// Image bytes sent inline with a prompt.
#[derive(Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl fmt::Debug for InlineImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InlineImage")
            .field("mime_type", &self.mime_type)
            .field("len", &self.data.len())
            .finish()
    }
}

/// A single-turn request: prompt text plus an optional image.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub prompt: String,
    pub image: Option<InlineImage>,
}

impl LlmRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            image: None,
        }
    }

    pub fn with_image(prompt: impl Into<String>, image: InlineImage) -> Self {
        Self {
            prompt: prompt.into(),
            image: Some(image),
        }
    }
}

/// Trait for LLM providers.
///
/// Implementations should be stateless and thread-safe. A provider makes
/// exactly one API call per `complete` and returns the model's text reply.
#[async_trait]
pub trait LlmProvider: Send + Sync + fmt::Debug {
    /// Send a request to the model and get its text response.
    async fn complete(&self, request: &LlmRequest) -> Result<String, LlmError>;

    /// Get the provider name (e.g., "gemini", "fake").
    fn provider_name(&self) -> &'static str;

    /// Get the model name (e.g., "gemini-1.5-flash").
    fn model_name(&self) -> &str;
}
