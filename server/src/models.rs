use chrono::NaiveDateTime;
use diesel::prelude::*;
use genie_core::VideoScript;
use serde::{Deserialize, Serialize};

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

/// Recipe row as stored. List columns hold JSON arrays of strings.
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RecipeRow {
    pub id: i32,
    pub user_id: i32,
    pub image_path: String,
    pub dish_name: String,
    pub cuisine_type: Option<String>,
    pub category: Option<String>,
    pub ingredients_en: String,
    pub instructions_en: String,
    pub ingredients_ta: Option<String>,
    pub instructions_ta: Option<String>,
    pub cooking_time: Option<String>,
    pub difficulty: Option<String>,
    pub extras: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipes)]
pub struct NewRecipe<'a> {
    pub user_id: i32,
    pub image_path: &'a str,
    pub dish_name: &'a str,
    pub cuisine_type: Option<&'a str>,
    pub category: Option<&'a str>,
    pub ingredients_en: String,
    pub instructions_en: String,
    pub ingredients_ta: Option<String>,
    pub instructions_ta: Option<String>,
    pub cooking_time: Option<&'a str>,
    pub difficulty: Option<&'a str>,
    pub extras: String,
}

/// Fields a recipe owner may change from the edit form.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(treat_none_as_null = true)]
pub struct RecipeChanges<'a> {
    pub dish_name: &'a str,
    pub cuisine_type: Option<&'a str>,
    pub category: Option<&'a str>,
    pub cooking_time: Option<&'a str>,
    pub difficulty: Option<&'a str>,
    pub ingredients_en: String,
    pub instructions_en: String,
}

/// Card shown in history and favorites lists.
#[derive(Queryable, Selectable, Serialize, Debug, Clone)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RecipeSummary {
    pub id: i32,
    pub dish_name: String,
    pub cuisine_type: Option<String>,
    pub category: Option<String>,
    pub image_path: String,
    pub created_at: NaiveDateTime,
}

#[derive(Queryable, Selectable, Serialize, Debug, Clone)]
#[diesel(table_name = crate::schema::nutrition_data)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct NutritionRecord {
    pub id: i32,
    pub recipe_id: i32,
    pub calories: Option<String>,
    pub protein: Option<String>,
    pub carbs: Option<String>,
    pub fats: Option<String>,
    pub fiber: Option<String>,
    pub raw_json: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::nutrition_data)]
pub struct NewNutrition<'a> {
    pub recipe_id: i32,
    pub calories: Option<&'a str>,
    pub protein: Option<&'a str>,
    pub carbs: Option<&'a str>,
    pub fats: Option<&'a str>,
    pub fiber: Option<&'a str>,
    pub raw_json: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::favorites)]
pub struct NewFavorite {
    pub user_id: i32,
    pub recipe_id: i32,
}

#[derive(Queryable, Selectable, Serialize, Debug, Clone, utoipa::ToSchema)]
#[diesel(table_name = crate::schema::shopping_list)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ShoppingItem {
    pub id: i32,
    #[serde(skip)]
    pub user_id: i32,
    pub item: String,
    pub is_checked: bool,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::shopping_list)]
pub struct NewShoppingItem<'a> {
    pub user_id: i32,
    pub item: &'a str,
}

/// What a recipe carries beyond its ingredients and steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecipeExtras {
    Generated {
        image_prompts: Vec<String>,
        video_script: VideoScript,
        estimated_cost: String,
    },
    Manual,
}

impl RecipeExtras {
    pub fn estimated_cost(&self) -> &str {
        match self {
            RecipeExtras::Generated { estimated_cost, .. } => estimated_cost,
            RecipeExtras::Manual => "N/A",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LocalizedSteps {
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
}

/// A recipe with its JSON columns decoded.
#[derive(Debug, Clone, Serialize)]
pub struct Recipe {
    pub id: i32,
    pub user_id: i32,
    pub image_path: String,
    pub dish_name: String,
    pub cuisine_type: Option<String>,
    pub category: Option<String>,
    pub english: LocalizedSteps,
    pub tamil: Option<LocalizedSteps>,
    pub cooking_time: Option<String>,
    pub difficulty: Option<String>,
    pub extras: RecipeExtras,
    pub created_at: NaiveDateTime,
}

impl TryFrom<RecipeRow> for Recipe {
    type Error = serde_json::Error;

    fn try_from(row: RecipeRow) -> Result<Self, Self::Error> {
        let english = LocalizedSteps {
            ingredients: serde_json::from_str(&row.ingredients_en)?,
            instructions: serde_json::from_str(&row.instructions_en)?,
        };

        let tamil = match (&row.ingredients_ta, &row.instructions_ta) {
            (None, None) => None,
            (ingredients, instructions) => Some(LocalizedSteps {
                ingredients: decode_optional_list(ingredients.as_deref())?,
                instructions: decode_optional_list(instructions.as_deref())?,
            }),
        };

        Ok(Recipe {
            id: row.id,
            user_id: row.user_id,
            image_path: row.image_path,
            dish_name: row.dish_name,
            cuisine_type: row.cuisine_type,
            category: row.category,
            english,
            tamil,
            cooking_time: row.cooking_time,
            difficulty: row.difficulty,
            extras: serde_json::from_str(&row.extras)?,
            created_at: row.created_at,
        })
    }
}

fn decode_optional_list(raw: Option<&str>) -> Result<Vec<String>, serde_json::Error> {
    match raw {
        Some(json) => serde_json::from_str(json),
        None => Ok(Vec::new()),
    }
}

/// Recipe fields entered by hand on the add and edit forms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RecipeInput {
    pub dish_name: String,
    #[serde(default)]
    pub cuisine_type: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub cooking_time: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default, rename = "ingredients[]")]
    pub ingredients: Vec<String>,
    #[serde(default, rename = "instructions[]")]
    pub instructions: Vec<String>,
}

impl RecipeInput {
    /// Drop blank list entries left by empty form rows.
    pub fn normalized(mut self) -> Self {
        self.dish_name = self.dish_name.trim().to_string();
        self.ingredients.retain(|s| !s.trim().is_empty());
        self.instructions.retain(|s| !s.trim().is_empty());
        self
    }
}

/// Empty form fields are stored as NULL.
pub fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extras_are_tagged() {
        let json = serde_json::to_string(&RecipeExtras::Manual).unwrap();
        assert_eq!(json, r#"{"kind":"manual"}"#);

        let generated: RecipeExtras = serde_json::from_str(
            r#"{"kind":"generated","image_prompts":["a"],"video_script":{"scene_description":"s","camera_angle":"c","text_overlay":"t"},"estimated_cost":"$5"}"#,
        )
        .unwrap();
        assert_eq!(generated.estimated_cost(), "$5");
        assert_eq!(RecipeExtras::Manual.estimated_cost(), "N/A");
    }

    #[test]
    fn test_row_without_tamil_decodes_to_none() {
        let row = RecipeRow {
            id: 1,
            user_id: 1,
            image_path: "img/default_food.svg".to_string(),
            dish_name: "Toast".to_string(),
            cuisine_type: None,
            category: None,
            ingredients_en: r#"["bread","butter"]"#.to_string(),
            instructions_en: r#"["toast","spread"]"#.to_string(),
            ingredients_ta: None,
            instructions_ta: None,
            cooking_time: None,
            difficulty: None,
            extras: r#"{"kind":"manual"}"#.to_string(),
            created_at: chrono::DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
        };

        let recipe = Recipe::try_from(row).unwrap();
        assert_eq!(recipe.english.ingredients, vec!["bread", "butter"]);
        assert!(recipe.tamil.is_none());
        assert_eq!(recipe.extras, RecipeExtras::Manual);
    }

    #[test]
    fn test_normalized_input_drops_blank_rows() {
        let input = RecipeInput {
            dish_name: "  Upma ".to_string(),
            ingredients: vec!["rava".to_string(), " ".to_string()],
            instructions: vec![String::new(), "roast".to_string()],
            ..Default::default()
        }
        .normalized();

        assert_eq!(input.dish_name, "Upma");
        assert_eq!(input.ingredients, vec!["rava"]);
        assert_eq!(input.instructions, vec!["roast"]);
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty("  "), None);
        assert_eq!(non_empty(" Thai "), Some("Thai"));
    }
}
