//! AI prompt templates.

pub mod chef_chat;
pub mod generate_recipe;
pub mod identify_dish;

pub use chef_chat::render_chef_chat_prompt;
pub use generate_recipe::render_generate_recipe_prompt;
pub use identify_dish::IDENTIFY_DISH_PROMPT;
