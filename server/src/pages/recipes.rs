use crate::auth::{CurrentUser, MaybeUser};
use crate::get_conn;
use crate::recipes::{find_nutrition, find_recipe, is_favorite, list_favorite_recipes, list_user_recipes};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::SignedCookieJar;
use serde_json::json;
use tera::Context;

pub const RECIPE_NOT_FOUND: &str = "Recipe not found";

pub async fn view_recipe(
    MaybeUser(session): MaybeUser,
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Path(id): Path<i32>,
) -> Response {
    let mut conn = get_conn!(state.pool);

    let recipe = match find_recipe(&mut conn, id) {
        Ok(Some(recipe)) => recipe,
        Ok(None) => return (StatusCode::NOT_FOUND, RECIPE_NOT_FOUND).into_response(),
        Err(e) => {
            tracing::error!("Failed to load recipe {}: {}", id, e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to load recipe").into_response();
        }
    };

    let nutrition = match find_nutrition(&mut conn, id) {
        Ok(nutrition) => nutrition,
        Err(e) => {
            tracing::warn!("Failed to load nutrition for recipe {}: {}", id, e);
            None
        }
    };

    let favorite = match &session {
        Some(s) => is_favorite(&mut conn, s.user_id, id).unwrap_or_else(|e| {
            tracing::warn!("Failed to check favorite: {}", e);
            false
        }),
        None => false,
    };
    drop(conn);

    let chat_context = json!({
        "dish_name": recipe.dish_name,
        "cuisine": recipe.cuisine_type,
        "ingredients": recipe.english.ingredients,
        "instructions": recipe.english.instructions,
    });

    let mut context = Context::new();
    context.insert("estimated_cost", recipe.extras.estimated_cost());
    context.insert(
        "is_owner",
        &session.as_ref().is_some_and(|s| s.user_id == recipe.user_id),
    );
    context.insert("recipe", &recipe);
    context.insert("nutrition", &nutrition);
    context.insert("is_favorite", &favorite);
    context.insert("chat_context", &chat_context.to_string());

    state
        .views
        .page(jar, session.as_ref(), "recipe.html", context)
}

pub async fn history(
    CurrentUser(session): CurrentUser,
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Response {
    let mut conn = get_conn!(state.pool);

    let recipes = match list_user_recipes(&mut conn, session.user_id) {
        Ok(recipes) => recipes,
        Err(e) => {
            tracing::error!("Failed to list recipes: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to load recipes").into_response();
        }
    };

    let mut context = Context::new();
    context.insert("heading", "History");
    context.insert("recipes", &recipes);
    context.insert(
        "empty_message",
        "No recipes yet. Upload a photo to get started.",
    );
    state
        .views
        .page(jar, Some(&session), "recipe_list.html", context)
}

pub async fn favorites(
    CurrentUser(session): CurrentUser,
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Response {
    let mut conn = get_conn!(state.pool);

    let recipes = match list_favorite_recipes(&mut conn, session.user_id) {
        Ok(recipes) => recipes,
        Err(e) => {
            tracing::error!("Failed to list favorites: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to load favorites")
                .into_response();
        }
    };

    let mut context = Context::new();
    context.insert("heading", "Favorites");
    context.insert("recipes", &recipes);
    context.insert("empty_message", "No favorites yet.");
    state
        .views
        .page(jar, Some(&session), "recipe_list.html", context)
}
