//! Fake LLM provider for testing.
//!
//! This provider returns deterministic responses based on prompt matching,
//! allowing tests to run without network access or API costs.

use super::{LlmError, LlmProvider, LlmRequest};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

/// Canned reply to the dish identification prompt, fenced the way real models reply.
pub const FAKE_DISH_REPLY: &str = r#"```json
{
    "dish_name": "Masala Dosa",
    "cuisine": "South Indian",
    "category": "Veg"
}
```"#;

/// Canned reply to the recipe generation prompt.
pub const FAKE_RECIPE_REPLY: &str = r#"Here is your guide:
{
    "english": {
        "ingredients": ["2 cups dosa batter", "3 potatoes", "1 onion", "1 tsp mustard seeds"],
        "instructions": ["Boil the potatoes", "Temper the mustard seeds", "Spread the batter thin", "Fill and fold"],
        "cooking_time": "40 minutes",
        "difficulty": "Medium"
    },
    "tamil": {
        "ingredients": ["2 கப் தோசை மாவு", "3 உருளைக்கிழங்கு", "1 வெங்காயம்", "1 தேக்கரண்டி கடுகு"],
        "instructions": ["உருளைக்கிழங்கை வேகவைக்கவும்", "கடுகு தாளிக்கவும்", "மாவை மெல்லியதாக பரப்பவும்", "நிரப்பி மடிக்கவும்"],
        "cooking_time": "40 நிமிடங்கள்",
        "difficulty": "நடுத்தரம்"
    },
    "nutrition": {
        "calories": "350 kcal",
        "protein": "8g",
        "carbs": "55g",
        "fats": 10,
        "fiber": "4-5g"
    },
    "estimated_cost": "₹80-₹120",
    "image_prompts": ["Golden crispy dosa on a banana leaf", "Overhead shot with chutneys"],
    "video_script": {
        "scene_description": "Batter spread on a hot tawa",
        "camera_angle": "Top-down",
        "text_overlay": "Crispy in 40 minutes"
    }
}"#;

/// Canned reply to the chef chat prompt.
pub const FAKE_CHAT_REPLY: &str = "Add a pinch of fenugreek to the batter for extra crispiness!";

/// A fake LLM provider for testing.
///
/// Responses are matched by checking if the prompt contains a registered substring.
/// If no match is found, returns a default response or error.
#[derive(Debug)]
pub struct FakeProvider {
    /// Map of prompt substring -> response
    responses: RwLock<HashMap<String, String>>,
    /// Default response if no match found
    default_response: Option<String>,
    calls: AtomicUsize,
    image_calls: AtomicUsize,
}

impl Default for FakeProvider {
    fn default() -> Self {
        Self::new().with_default_response("{}")
    }
}

impl FakeProvider {
    /// Create a new FakeProvider with no registered responses.
    pub fn new() -> Self {
        Self {
            responses: RwLock::new(HashMap::new()),
            default_response: None,
            calls: AtomicUsize::new(0),
            image_calls: AtomicUsize::new(0),
        }
    }

    /// Create a FakeProvider that returns a specific response for prompts containing a substring.
    pub fn with_response(prompt_contains: &str, response: &str) -> Self {
        let provider = Self::new();
        provider.add_response(prompt_contains, response);
        provider
    }

    /// Add a response for prompts containing a specific substring.
    pub fn add_response(&self, prompt_contains: &str, response: &str) {
        self.responses
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(prompt_contains.to_string(), response.to_string());
    }

    /// Set the default response when no pattern matches.
    pub fn with_default_response(mut self, response: &str) -> Self {
        self.default_response = Some(response.to_string());
        self
    }

    /// Create a FakeProvider answering the identification, generation and chat prompts.
    pub fn with_recipe_responses() -> Self {
        let provider = Self::new();
        provider.add_response("Analyze this food image", FAKE_DISH_REPLY);
        provider.add_response("Generate a complete cooking guide", FAKE_RECIPE_REPLY);
        provider.add_response("You are a friendly and expert AI Chef", FAKE_CHAT_REPLY);
        provider
    }

    /// Number of `complete` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of calls that carried an image.
    pub fn image_call_count(&self) -> usize {
        self.image_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmProvider for FakeProvider {
    async fn complete(&self, request: &LlmRequest) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if request.image.is_some() {
            self.image_calls.fetch_add(1, Ordering::SeqCst);
        }

        let responses = self.responses.read().unwrap_or_else(|e| e.into_inner());

        // Find first matching pattern (case-insensitive)
        let prompt_lower = request.prompt.to_lowercase();
        for (pattern, response) in responses.iter() {
            if prompt_lower.contains(&pattern.to_lowercase()) {
                return Ok(response.clone());
            }
        }

        match &self.default_response {
            Some(response) => Ok(response.clone()),
            None => Err(LlmError::RequestFailed(format!(
                "FakeProvider: No response configured for prompt (first 100 chars): {}",
                request.prompt.chars().take(100).collect::<String>()
            ))),
        }
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }
}
