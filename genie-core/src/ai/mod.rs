//! AI client for dish identification, recipe generation and chef chat.
//!
//! # Configuration
//!
//! Set these environment variables:
//!
//! - `GEMINI_API_KEY` (optional): API key. Without it the client runs offline
//!   and every structured operation fails immediately.
//! - `GENIE_VISION_MODEL` (optional): Model for dish identification
//! - `GENIE_TEXT_MODEL` (optional): Model for recipe generation and chat
//! - `GENIE_AI_BASE_URL` (optional): API base URL
//! - `GENIE_AI_TIMEOUT_SECS` (optional): Per-request timeout in seconds
//!
//! # Example
//!
//! ```ignore
//! use genie_core::ai::{AiClient, AiConfig};
//!
//! let client = AiClient::from_config(&AiConfig::from_env())?;
//! let dish = client.analyze_image(image).await?;
//! let recipe = client.generate_recipe(&dish.dish_name, dish.cuisine.as_deref()).await?;
//! ```

mod client;
mod config;
pub mod prompts;
mod types;

pub use client::{AiClient, AiError, CHAT_FALLBACK_REPLY, CHAT_OFFLINE_REPLY};
pub use config::{AiConfig, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
pub use types::{DishIdentification, GeneratedRecipe, LanguageBlock, NutritionFacts, VideoScript};
