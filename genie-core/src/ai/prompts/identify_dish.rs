//! Vision prompt that names the dish in an uploaded photo.

/// Sent alongside the image bytes.
pub const IDENTIFY_DISH_PROMPT: &str = r#"Analyze this food image. Identify the dish name, cuisine type, and whether it is Vegetarian or Non-Vegetarian.
Return strictly valid JSON in this format, with no other text:
{
    "dish_name": "Name of dish",
    "cuisine": "Cuisine type (e.g., Indian, Italian)",
    "category": "Veg or Non-Veg"
}"#;
