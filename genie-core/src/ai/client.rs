//! The three model operations the web app needs.
//!
//! Every operation makes at most one model call. There is no retry, backoff
//! or response caching; identical uploads are analyzed again from scratch.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use super::config::AiConfig;
use super::prompts::{render_chef_chat_prompt, render_generate_recipe_prompt, IDENTIFY_DISH_PROMPT};
use super::types::{DishIdentification, GeneratedRecipe};
use crate::extract::{extract_json_object, ExtractError};
use crate::llm::{GeminiProvider, InlineImage, LlmError, LlmProvider, LlmRequest};

/// Chat reply when no API key is configured.
pub const CHAT_OFFLINE_REPLY: &str = "I'm offline right now!";

/// Chat reply when the model call fails for any reason.
pub const CHAT_FALLBACK_REPLY: &str =
    "I'm having trouble hearing you in the kitchen! Can you repeat that?";

#[derive(Error, Debug)]
pub enum AiError {
    #[error("AI service is not configured (offline mode)")]
    Offline,

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("No usable JSON in model reply: {0}")]
    Extract(#[from] ExtractError),

    #[error("Model reply did not match the expected shape: {0}")]
    Decode(String),
}

#[derive(Debug, Clone)]
struct Backend {
    vision: Arc<dyn LlmProvider>,
    text: Arc<dyn LlmProvider>,
}

/// Client for dish identification, recipe generation and chat.
///
/// Cheap to clone; providers are shared behind `Arc`.
#[derive(Clone)]
pub struct AiClient {
    backend: Option<Backend>,
}

impl fmt::Debug for AiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.backend {
            Some(b) => f
                .debug_struct("AiClient")
                .field("vision", &b.vision.model_name())
                .field("text", &b.text.model_name())
                .finish(),
            None => f.write_str("AiClient(offline)"),
        }
    }
}

impl AiClient {
    /// Build a Gemini-backed client, or an offline one when no key is set.
    pub fn from_config(config: &AiConfig) -> Result<Self, LlmError> {
        let Some(api_key) = &config.api_key else {
            tracing::warn!("GEMINI_API_KEY not set, AI features run in offline mode");
            return Ok(Self::offline());
        };

        let http = GeminiProvider::build_client(config.timeout)?;
        let vision = GeminiProvider::new(
            api_key.clone(),
            config.vision_model.clone(),
            config.base_url.clone(),
            http.clone(),
        );
        let text = GeminiProvider::new(
            api_key.clone(),
            config.text_model.clone(),
            config.base_url.clone(),
            http,
        );

        Ok(Self::with_providers(Arc::new(vision), Arc::new(text)))
    }

    /// A client that never reaches the network.
    pub fn offline() -> Self {
        Self { backend: None }
    }

    pub fn with_providers(vision: Arc<dyn LlmProvider>, text: Arc<dyn LlmProvider>) -> Self {
        Self {
            backend: Some(Backend { vision, text }),
        }
    }

    /// Use one provider for every call.
    pub fn with_provider(provider: Arc<dyn LlmProvider>) -> Self {
        Self::with_providers(provider.clone(), provider)
    }

    pub fn is_offline(&self) -> bool {
        self.backend.is_none()
    }

    /// Identify the dish in a photo.
    pub async fn analyze_image(&self, image: InlineImage) -> Result<DishIdentification, AiError> {
        let backend = self.backend.as_ref().ok_or(AiError::Offline)?;

        tracing::debug!(
            provider = backend.vision.provider_name(),
            model = backend.vision.model_name(),
            mime_type = %image.mime_type,
            "Identifying dish from image"
        );

        let request = LlmRequest::with_image(IDENTIFY_DISH_PROMPT, image);
        let reply = backend.vision.complete(&request).await?;
        let dish: DishIdentification = parse_reply(&reply)?;

        if dish.dish_name.trim().is_empty() {
            return Err(AiError::Decode("dish_name is empty".to_string()));
        }

        Ok(dish)
    }

    /// Generate the bilingual recipe, nutrition and extras for a dish.
    pub async fn generate_recipe(
        &self,
        dish_name: &str,
        cuisine: Option<&str>,
    ) -> Result<GeneratedRecipe, AiError> {
        let backend = self.backend.as_ref().ok_or(AiError::Offline)?;

        tracing::debug!(
            provider = backend.text.provider_name(),
            model = backend.text.model_name(),
            dish_name,
            "Generating recipe"
        );

        let request = LlmRequest::text(render_generate_recipe_prompt(dish_name, cuisine));
        let reply = backend.text.complete(&request).await?;
        let recipe: GeneratedRecipe = parse_reply(&reply)?;

        if recipe.english.ingredients.is_empty() || recipe.english.instructions.is_empty() {
            return Err(AiError::Decode(
                "english block has no ingredients or instructions".to_string(),
            ));
        }

        Ok(recipe)
    }

    /// Single best-effort chat turn. Never fails; falls back to a canned reply.
    pub async fn chat(&self, message: &str, context: Option<&Value>) -> String {
        let Some(backend) = &self.backend else {
            return CHAT_OFFLINE_REPLY.to_string();
        };

        let request = LlmRequest::text(render_chef_chat_prompt(message, context));
        match backend.text.complete(&request).await {
            Ok(reply) => reply.trim().to_string(),
            Err(e) => {
                tracing::warn!("Chef chat failed: {}", e);
                CHAT_FALLBACK_REPLY.to_string()
            }
        }
    }
}

fn parse_reply<T: DeserializeOwned>(reply: &str) -> Result<T, AiError> {
    let json = extract_json_object(reply)?;
    serde_json::from_str(json).map_err(|e| AiError::Decode(e.to_string()))
}
