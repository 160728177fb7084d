//! Recipe persistence shared by the upload, manual entry and browsing pages.

mod db;

pub use db::{
    count_favorites, count_recipes, create_generated_recipe, create_manual_recipe,
    find_nutrition, find_owned_recipe, find_recipe, is_favorite, list_favorite_recipes,
    list_user_recipes, update_owned_recipe, DEFAULT_IMAGE_PATH,
};
