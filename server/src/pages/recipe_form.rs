//! Hand-written recipes: create and edit.

use crate::auth::CurrentUser;
use crate::models::RecipeInput;
use crate::pages::flash::Flash;
use crate::pages::SERVER_ERROR_MESSAGE;
use crate::recipes::{create_manual_recipe, find_owned_recipe, update_owned_recipe, DEFAULT_IMAGE_PATH};
use crate::uploads::{remove_upload, save_upload, StoredUpload};
use crate::AppState;
use anyhow::Context as _;
use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{cookie::SignedCookieJar, Form};
use std::path::Path as FsPath;
use tera::Context;

pub const ACCESS_DENIED: &str = "Recipe not found or access denied.";

pub async fn add_form(
    CurrentUser(session): CurrentUser,
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Response {
    let mut context = Context::new();
    context.insert("recipe", &None::<()>);
    state
        .views
        .page(jar, Some(&session), "recipe_form.html", context)
}

/// Split the add form into its text fields and the optional photo.
async fn read_recipe_multipart(
    multipart: &mut Multipart,
) -> Result<(RecipeInput, Option<(String, Vec<u8>)>), MultipartError> {
    let mut input = RecipeInput::default();
    let mut image = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await?;
                if !filename.is_empty() && !data.is_empty() {
                    image = Some((filename, data.to_vec()));
                }
            }
            "dish_name" => input.dish_name = field.text().await?,
            "cuisine_type" => input.cuisine_type = field.text().await?,
            "category" => input.category = field.text().await?,
            "cooking_time" => input.cooking_time = field.text().await?,
            "difficulty" => input.difficulty = field.text().await?,
            "ingredients[]" => input.ingredients.push(field.text().await?),
            "instructions[]" => input.instructions.push(field.text().await?),
            _ => {}
        }
    }

    Ok((input.normalized(), image))
}

/// Store the optional photo. Invalid photos fall back to the default image.
async fn store_optional_image(
    upload_dir: &FsPath,
    image: Option<(String, Vec<u8>)>,
) -> Option<StoredUpload> {
    let (filename, data) = image?;
    match save_upload(upload_dir, &filename, &data).await {
        Ok(stored) => Some(stored),
        Err(e) => {
            tracing::info!("Ignoring recipe photo {:?}: {}", filename, e);
            None
        }
    }
}

pub async fn add_recipe(
    CurrentUser(session): CurrentUser,
    State(state): State<AppState>,
    jar: SignedCookieJar,
    mut multipart: Multipart,
) -> Response {
    let (input, image) = match read_recipe_multipart(&mut multipart).await {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!("Malformed recipe form: {}", e);
            return Flash::danger("Invalid form submission.").redirect(jar, "/recipe/add");
        }
    };

    if input.dish_name.is_empty() {
        return Flash::danger("Dish name is required.").redirect(jar, "/recipe/add");
    }

    let stored = store_optional_image(&state.config.upload_dir(), image).await;
    let image_path = stored
        .as_ref()
        .map_or(DEFAULT_IMAGE_PATH, |s| s.image_path.as_str());

    let saved = state
        .pool
        .get()
        .context("Failed to get DB connection")
        .and_then(|mut conn| {
            create_manual_recipe(&mut conn, session.user_id, &input, image_path)
                .context("Failed to insert recipe")
        });

    match saved {
        Ok(recipe_id) => {
            tracing::info!(recipe_id, "Created manual recipe");
            Redirect::to(&format!("/recipe/{}", recipe_id)).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to create manual recipe: {:#}", e);
            if let Some(stored) = &stored {
                remove_upload(stored).await;
            }
            Flash::danger(SERVER_ERROR_MESSAGE).redirect(jar, "/recipe/add")
        }
    }
}

pub async fn edit_form(
    CurrentUser(session): CurrentUser,
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Path(id): Path<i32>,
) -> Response {
    let mut conn = page_conn!(state.pool, jar, "/dashboard");

    let recipe = match find_owned_recipe(&mut conn, id, session.user_id) {
        Ok(Some(recipe)) => recipe,
        Ok(None) => return Flash::danger(ACCESS_DENIED).redirect(jar, "/dashboard"),
        Err(e) => {
            tracing::error!("Failed to load recipe {} for edit: {}", id, e);
            return Flash::danger(SERVER_ERROR_MESSAGE).redirect(jar, "/dashboard");
        }
    };
    drop(conn);

    let mut context = Context::new();
    context.insert("recipe", &recipe);
    state
        .views
        .page(jar, Some(&session), "recipe_form.html", context)
}

pub async fn edit_recipe(
    CurrentUser(session): CurrentUser,
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Path(id): Path<i32>,
    Form(input): Form<RecipeInput>,
) -> Response {
    let mut conn = page_conn!(state.pool, jar, "/dashboard");

    match find_owned_recipe(&mut conn, id, session.user_id) {
        Ok(Some(_)) => {}
        Ok(None) => {
            tracing::info!(recipe_id = id, user_id = session.user_id, "Edit denied");
            return Flash::danger(ACCESS_DENIED).redirect(jar, "/dashboard");
        }
        Err(e) => {
            tracing::error!("Failed to load recipe {} for edit: {}", id, e);
            return Flash::danger(SERVER_ERROR_MESSAGE).redirect(jar, "/dashboard");
        }
    }

    let input = input.normalized();
    let edit_url = format!("/recipe/edit/{}", id);
    if input.dish_name.is_empty() {
        return Flash::danger("Dish name is required.").redirect(jar, &edit_url);
    }

    match update_owned_recipe(&mut conn, id, session.user_id, &input) {
        Ok(true) => {
            Flash::success("Recipe updated successfully!").redirect(jar, &format!("/recipe/{}", id))
        }
        Ok(false) => Flash::danger(ACCESS_DENIED).redirect(jar, "/dashboard"),
        Err(e) => {
            tracing::error!("Failed to update recipe {}: {}", id, e);
            Flash::danger(SERVER_ERROR_MESSAGE).redirect(jar, &edit_url)
        }
    }
}
