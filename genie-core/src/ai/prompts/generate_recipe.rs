//! Prompt for the full bilingual cooking guide of a named dish.

/// Render the recipe generation prompt.
///
/// `cuisine` is optional because the vision model does not always report one.
pub fn render_generate_recipe_prompt(dish_name: &str, cuisine: Option<&str>) -> String {
    let cuisine = cuisine
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or("unknown cuisine");

    format!(
        r#"Generate a complete cooking guide for "{dish_name}" ({cuisine}).

I need the output in strictly VALID JSON format with the following structure, and no other text:

{{
    "english": {{
        "ingredients": ["Item 1", "Item 2"],
        "instructions": ["Step 1", "Step 2"],
        "cooking_time": "Time",
        "difficulty": "Easy/Medium/Hard"
    }},
    "tamil": {{
        "ingredients": ["Tamil Item 1", "Tamil Item 2"],
        "instructions": ["Tamil Step 1", "Tamil Step 2"],
        "cooking_time": "Tamil Time",
        "difficulty": "Tamil Difficulty"
    }},
    "nutrition": {{
        "calories": "Value",
        "protein": "Value",
        "carbs": "Value",
        "fats": "Value",
        "fiber": "Value"
    }},
    "estimated_cost": "Approximate cost (e.g., $10-$15 or ₹X-₹Y)",
    "image_prompts": ["Prompt 1", "Prompt 2"],
    "video_script": {{
        "scene_description": "Description",
        "camera_angle": "Angle",
        "text_overlay": "Text"
    }}
}}"#,
        dish_name = dish_name,
        cuisine = cuisine
    )
}
