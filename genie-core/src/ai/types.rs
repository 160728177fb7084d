//! Structured shapes the models are asked to reply with.
//!
//! Decoding is lenient where models are known to drift: nutrition values may
//! come back as numbers, optional blocks may be missing, and lists default to
//! empty. Anything that is not a JSON object at all is rejected upstream.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Output of the vision model for an uploaded photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DishIdentification {
    pub dish_name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub cuisine: Option<String>,
    /// "Veg" or "Non-Veg" as reported by the model.
    #[serde(default, deserialize_with = "lenient_text")]
    pub category: Option<String>,
}

/// Ingredients and steps in one language, each an ordered list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageBlock {
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub cooking_time: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub difficulty: Option<String>,
}

/// Nutrition estimate. Values stay free text ("350 kcal", "4-5g").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutritionFacts {
    #[serde(default, deserialize_with = "lenient_text")]
    pub calories: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub protein: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub carbs: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub fats: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub fiber: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoScript {
    #[serde(default)]
    pub scene_description: String,
    #[serde(default)]
    pub camera_angle: String,
    #[serde(default)]
    pub text_overlay: String,
}

/// Full recipe generated for a named dish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedRecipe {
    pub english: LanguageBlock,
    /// Secondary-language translation; models sometimes omit it.
    #[serde(default)]
    pub tamil: Option<LanguageBlock>,
    #[serde(default)]
    pub nutrition: NutritionFacts,
    #[serde(default = "unknown_cost", deserialize_with = "lenient_cost")]
    pub estimated_cost: String,
    #[serde(default)]
    pub image_prompts: Vec<String>,
    #[serde(default)]
    pub video_script: VideoScript,
}

fn unknown_cost() -> String {
    "N/A".to_string()
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

fn lenient_cost<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(deserializer)?.unwrap_or_else(unknown_cost))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_nutrition_becomes_text() {
        let facts: NutritionFacts =
            serde_json::from_str(r#"{"calories": 250, "protein": "8g", "fiber": null}"#).unwrap();
        assert_eq!(facts.calories.as_deref(), Some("250"));
        assert_eq!(facts.protein.as_deref(), Some("8g"));
        assert_eq!(facts.fiber, None);
        assert_eq!(facts.fats, None);
    }

    #[test]
    fn test_minimal_recipe_defaults() {
        let recipe: GeneratedRecipe = serde_json::from_str(
            r#"{"english": {"ingredients": ["rice"], "instructions": ["cook"]}}"#,
        )
        .unwrap();
        assert_eq!(recipe.english.ingredients, vec!["rice"]);
        assert!(recipe.tamil.is_none());
        assert_eq!(recipe.estimated_cost, "N/A");
        assert!(recipe.image_prompts.is_empty());
        assert_eq!(recipe.video_script, VideoScript::default());
    }

    #[test]
    fn test_null_cost_is_unknown() {
        let recipe: GeneratedRecipe =
            serde_json::from_str(r#"{"english": {}, "estimated_cost": null}"#).unwrap();
        assert_eq!(recipe.estimated_cost, "N/A");
    }

    #[test]
    fn test_recipe_requires_english_block() {
        let result = serde_json::from_str::<GeneratedRecipe>(r#"{"tamil": {}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_identification_requires_dish_name() {
        let result = serde_json::from_str::<DishIdentification>(r#"{"cuisine": "Thai"}"#);
        assert!(result.is_err());
    }
}
