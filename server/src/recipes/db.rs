use crate::models::{
    non_empty, NewNutrition, NewRecipe, NutritionRecord, Recipe, RecipeChanges, RecipeExtras,
    RecipeInput, RecipeRow, RecipeSummary,
};
use crate::schema::{favorites, nutrition_data, recipes};
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel::sqlite::SqliteConnection;
use genie_core::{DishIdentification, GeneratedRecipe};
use serde::Serialize;

/// Image shown for hand-entered recipes without a photo, relative to `/static`.
pub const DEFAULT_IMAGE_PATH: &str = "img/default_food.svg";

/// Nutrition placeholder stored for hand-entered recipes.
const UNKNOWN_NUTRITION: &str = "N/A";

fn to_json_text<T: Serialize + ?Sized>(value: &T) -> QueryResult<String> {
    serde_json::to_string(value).map_err(|e| DieselError::SerializationError(Box::new(e)))
}

fn decode(row: RecipeRow) -> QueryResult<Recipe> {
    Recipe::try_from(row).map_err(|e| DieselError::DeserializationError(Box::new(e)))
}

/// Store a model-generated recipe and its nutrition estimate atomically.
pub fn create_generated_recipe(
    conn: &mut SqliteConnection,
    user_id: i32,
    image_path: &str,
    dish: &DishIdentification,
    generated: &GeneratedRecipe,
) -> QueryResult<i32> {
    let extras = RecipeExtras::Generated {
        image_prompts: generated.image_prompts.clone(),
        video_script: generated.video_script.clone(),
        estimated_cost: generated.estimated_cost.clone(),
    };

    let new_recipe = NewRecipe {
        user_id,
        image_path,
        dish_name: dish.dish_name.trim(),
        cuisine_type: dish.cuisine.as_deref(),
        category: dish.category.as_deref(),
        ingredients_en: to_json_text(&generated.english.ingredients)?,
        instructions_en: to_json_text(&generated.english.instructions)?,
        ingredients_ta: generated
            .tamil
            .as_ref()
            .map(|t| to_json_text(&t.ingredients))
            .transpose()?,
        instructions_ta: generated
            .tamil
            .as_ref()
            .map(|t| to_json_text(&t.instructions))
            .transpose()?,
        cooking_time: generated.english.cooking_time.as_deref(),
        difficulty: generated.english.difficulty.as_deref(),
        extras: to_json_text(&extras)?,
    };

    let facts = &generated.nutrition;
    let raw_json = to_json_text(facts)?;

    conn.transaction(|conn| {
        let recipe_id: i32 = diesel::insert_into(recipes::table)
            .values(&new_recipe)
            .returning(recipes::id)
            .get_result(conn)?;

        let nutrition = NewNutrition {
            recipe_id,
            calories: facts.calories.as_deref(),
            protein: facts.protein.as_deref(),
            carbs: facts.carbs.as_deref(),
            fats: facts.fats.as_deref(),
            fiber: facts.fiber.as_deref(),
            raw_json: Some(raw_json),
        };

        diesel::insert_into(nutrition_data::table)
            .values(&nutrition)
            .execute(conn)?;

        Ok(recipe_id)
    })
}

/// Store a hand-entered recipe with placeholder nutrition.
pub fn create_manual_recipe(
    conn: &mut SqliteConnection,
    user_id: i32,
    input: &RecipeInput,
    image_path: &str,
) -> QueryResult<i32> {
    let new_recipe = NewRecipe {
        user_id,
        image_path,
        dish_name: input.dish_name.trim(),
        cuisine_type: non_empty(&input.cuisine_type),
        category: non_empty(&input.category),
        ingredients_en: to_json_text(&input.ingredients)?,
        instructions_en: to_json_text(&input.instructions)?,
        ingredients_ta: None,
        instructions_ta: None,
        cooking_time: non_empty(&input.cooking_time),
        difficulty: non_empty(&input.difficulty),
        extras: to_json_text(&RecipeExtras::Manual)?,
    };

    conn.transaction(|conn| {
        let recipe_id: i32 = diesel::insert_into(recipes::table)
            .values(&new_recipe)
            .returning(recipes::id)
            .get_result(conn)?;

        let placeholder = NewNutrition {
            recipe_id,
            calories: Some(UNKNOWN_NUTRITION),
            protein: None,
            carbs: None,
            fats: None,
            fiber: None,
            raw_json: None,
        };

        diesel::insert_into(nutrition_data::table)
            .values(&placeholder)
            .execute(conn)?;

        Ok(recipe_id)
    })
}

pub fn find_recipe(conn: &mut SqliteConnection, recipe_id: i32) -> QueryResult<Option<Recipe>> {
    recipes::table
        .find(recipe_id)
        .select(RecipeRow::as_select())
        .first(conn)
        .optional()?
        .map(decode)
        .transpose()
}

/// Look up a recipe only if `user_id` owns it.
pub fn find_owned_recipe(
    conn: &mut SqliteConnection,
    recipe_id: i32,
    user_id: i32,
) -> QueryResult<Option<Recipe>> {
    recipes::table
        .filter(recipes::id.eq(recipe_id))
        .filter(recipes::user_id.eq(user_id))
        .select(RecipeRow::as_select())
        .first(conn)
        .optional()?
        .map(decode)
        .transpose()
}

pub fn find_nutrition(
    conn: &mut SqliteConnection,
    recipe_id: i32,
) -> QueryResult<Option<NutritionRecord>> {
    nutrition_data::table
        .filter(nutrition_data::recipe_id.eq(recipe_id))
        .select(NutritionRecord::as_select())
        .first(conn)
        .optional()
}

/// Apply an edit. Returns false when the recipe is missing or owned by someone else.
pub fn update_owned_recipe(
    conn: &mut SqliteConnection,
    recipe_id: i32,
    user_id: i32,
    input: &RecipeInput,
) -> QueryResult<bool> {
    let changes = RecipeChanges {
        dish_name: input.dish_name.trim(),
        cuisine_type: non_empty(&input.cuisine_type),
        category: non_empty(&input.category),
        cooking_time: non_empty(&input.cooking_time),
        difficulty: non_empty(&input.difficulty),
        ingredients_en: to_json_text(&input.ingredients)?,
        instructions_en: to_json_text(&input.instructions)?,
    };

    let updated = diesel::update(
        recipes::table
            .filter(recipes::id.eq(recipe_id))
            .filter(recipes::user_id.eq(user_id)),
    )
    .set(&changes)
    .execute(conn)?;

    Ok(updated > 0)
}

/// Recipes owned by a user, newest first.
pub fn list_user_recipes(
    conn: &mut SqliteConnection,
    user_id: i32,
) -> QueryResult<Vec<RecipeSummary>> {
    recipes::table
        .filter(recipes::user_id.eq(user_id))
        .order((recipes::created_at.desc(), recipes::id.desc()))
        .select(RecipeSummary::as_select())
        .load(conn)
}

/// Recipes a user has favorited, newest recipe first.
pub fn list_favorite_recipes(
    conn: &mut SqliteConnection,
    user_id: i32,
) -> QueryResult<Vec<RecipeSummary>> {
    recipes::table
        .inner_join(favorites::table)
        .filter(favorites::user_id.eq(user_id))
        .order((recipes::created_at.desc(), recipes::id.desc()))
        .select(RecipeSummary::as_select())
        .load(conn)
}

pub fn is_favorite(conn: &mut SqliteConnection, user_id: i32, recipe_id: i32) -> QueryResult<bool> {
    diesel::select(diesel::dsl::exists(
        favorites::table
            .filter(favorites::user_id.eq(user_id))
            .filter(favorites::recipe_id.eq(recipe_id)),
    ))
    .get_result(conn)
}

pub fn count_recipes(conn: &mut SqliteConnection, user_id: i32) -> QueryResult<i64> {
    recipes::table
        .filter(recipes::user_id.eq(user_id))
        .count()
        .get_result(conn)
}

pub fn count_favorites(conn: &mut SqliteConnection, user_id: i32) -> QueryResult<i64> {
    favorites::table
        .filter(favorites::user_id.eq(user_id))
        .count()
        .get_result(conn)
}
