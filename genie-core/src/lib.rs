pub mod ai;
pub mod extract;
pub mod llm;

pub use ai::{
    AiClient, AiConfig, AiError, DishIdentification, GeneratedRecipe, LanguageBlock,
    NutritionFacts, VideoScript,
};
pub use extract::{extract_json_object, ExtractError};
pub use llm::{FakeProvider, GeminiProvider, InlineImage, LlmError, LlmProvider, LlmRequest};
