//! Photo upload: identify the dish, generate the recipe, store both.

use crate::auth::CurrentUser;
use crate::pages::flash::Flash;
use crate::recipes::create_generated_recipe;
use crate::uploads::{remove_upload, save_upload, UploadError};
use crate::AppState;
use anyhow::Context as _;
use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::SignedCookieJar;

/// First file part named `field`, as (client filename, bytes).
pub(crate) async fn read_file_field(
    multipart: &mut Multipart,
    field: &str,
) -> Result<Option<(String, Vec<u8>)>, MultipartError> {
    while let Some(part) = multipart.next_field().await? {
        if part.name() != Some(field) {
            continue;
        }
        let filename = part.file_name().unwrap_or_default().to_string();
        let data = part.bytes().await?;
        return Ok(Some((filename, data.to_vec())));
    }
    Ok(None)
}

pub async fn upload(
    CurrentUser(session): CurrentUser,
    State(state): State<AppState>,
    jar: SignedCookieJar,
    mut multipart: Multipart,
) -> Response {
    let (filename, data) = match read_file_field(&mut multipart, "file").await {
        Ok(Some(file)) => file,
        Ok(None) => return Flash::danger("No file part").redirect(jar, "/dashboard"),
        Err(e) => {
            tracing::warn!("Malformed upload: {}", e);
            return Flash::danger("Invalid file").redirect(jar, "/dashboard");
        }
    };

    let stored = match save_upload(&state.config.upload_dir(), &filename, &data).await {
        Ok(stored) => stored,
        Err(UploadError::Io(e)) => {
            tracing::error!("Failed to store upload: {}", e);
            return Flash::danger("Could not save the photo.").redirect(jar, "/dashboard");
        }
        Err(e) => {
            tracing::info!("Rejected upload {:?}: {}", filename, e);
            return Flash::danger("Invalid file").redirect(jar, "/dashboard");
        }
    };

    let dish = match state.ai.analyze_image(stored.inline_image(data)).await {
        Ok(dish) => dish,
        Err(e) => {
            tracing::warn!(user_id = session.user_id, "Dish identification failed: {}", e);
            remove_upload(&stored).await;
            return Flash::danger("Could not identify food.").redirect(jar, "/dashboard");
        }
    };

    let generated = match state
        .ai
        .generate_recipe(&dish.dish_name, dish.cuisine.as_deref())
        .await
    {
        Ok(generated) => generated,
        Err(e) => {
            tracing::warn!(dish_name = %dish.dish_name, "Recipe generation failed: {}", e);
            remove_upload(&stored).await;
            return Flash::danger("Error generating recipe.").redirect(jar, "/dashboard");
        }
    };

    let saved = state
        .pool
        .get()
        .context("Failed to get DB connection")
        .and_then(|mut conn| {
            create_generated_recipe(
                &mut conn,
                session.user_id,
                &stored.image_path,
                &dish,
                &generated,
            )
            .context("Failed to insert recipe")
        });

    match saved {
        Ok(recipe_id) => {
            tracing::info!(recipe_id, dish_name = %dish.dish_name, "Created recipe from photo");
            Redirect::to(&format!("/recipe/{}", recipe_id)).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to save generated recipe: {:#}", e);
            remove_upload(&stored).await;
            Flash::danger("Error generating recipe.").redirect(jar, "/dashboard")
        }
    }
}
