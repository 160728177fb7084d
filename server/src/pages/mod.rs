//! Server-rendered pages.

/// Like `get_conn!`, but flashes and redirects instead of answering with JSON.
macro_rules! page_conn {
    ($pool:expr, $jar:expr, $back_to:expr) => {
        match $pool.get() {
            Ok(conn) => conn,
            Err(e) => {
                tracing::error!("Failed to get DB connection: {}", e);
                return $crate::pages::flash::Flash::danger($crate::pages::SERVER_ERROR_MESSAGE)
                    .redirect($jar, $back_to);
            }
        }
    };
}

pub mod account;
pub mod flash;
pub mod home;
pub mod profile;
pub mod recipe_form;
pub mod recipes;
pub mod shopping_list;
pub mod upload;

#[cfg(test)]
mod tests;

use crate::uploads::MAX_UPLOAD_BYTES;
use crate::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

pub const SERVER_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Returns the router for every HTML page
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .route("/dashboard", get(home::dashboard))
        .route(
            "/upload",
            post(upload::upload).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/recipe/{id}", get(recipes::view_recipe))
        .route(
            "/recipe/add",
            get(recipe_form::add_form)
                .post(recipe_form::add_recipe)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route(
            "/recipe/edit/{id}",
            get(recipe_form::edit_form).post(recipe_form::edit_recipe),
        )
        .route("/history", get(recipes::history))
        .route("/favorites", get(recipes::favorites))
        .route("/shopping-list", get(shopping_list::shopping_list_page))
        .route(
            "/profile",
            get(profile::profile).post(profile::update_profile),
        )
        .route(
            "/register",
            get(account::register_form).post(account::register),
        )
        .route("/login", get(account::login_form).post(account::login))
        .route("/logout", get(account::logout))
}
