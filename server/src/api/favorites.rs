use crate::api::ErrorResponse;
use crate::auth::ApiUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::NewFavorite;
use crate::schema::{favorites, recipes};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FavoriteStatus {
    Added,
    Removed,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FavoriteResponse {
    pub status: FavoriteStatus,
}

/// Flip the (user, recipe) favorite. `None` when the recipe does not exist.
pub fn toggle_favorite(
    conn: &mut SqliteConnection,
    user_id: i32,
    recipe_id: i32,
) -> QueryResult<Option<FavoriteStatus>> {
    conn.transaction(|conn| {
        let recipe_exists = recipes::table
            .find(recipe_id)
            .select(recipes::id)
            .first::<i32>(conn)
            .optional()?
            .is_some();
        if !recipe_exists {
            return Ok(None);
        }

        let removed = diesel::delete(
            favorites::table
                .filter(favorites::user_id.eq(user_id))
                .filter(favorites::recipe_id.eq(recipe_id)),
        )
        .execute(conn)?;

        if removed > 0 {
            return Ok(Some(FavoriteStatus::Removed));
        }

        diesel::insert_into(favorites::table)
            .values(&NewFavorite { user_id, recipe_id })
            .execute(conn)?;

        Ok(Some(FavoriteStatus::Added))
    })
}

#[utoipa::path(
    post,
    path = "/api/favorite/{recipe_id}",
    tag = "favorites",
    params(
        ("recipe_id" = i32, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Favorite toggled", body = FavoriteResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("session_cookie" = []))
)]
pub async fn toggle_favorite_handler(
    ApiUser(session): ApiUser,
    State(pool): State<Arc<DbPool>>,
    Path(recipe_id): Path<i32>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    match toggle_favorite(&mut conn, session.user_id, recipe_id) {
        Ok(Some(status)) => Json(FavoriteResponse { status }).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Recipe not found".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to toggle favorite: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to toggle favorite".to_string(),
                }),
            )
                .into_response()
        }
    }
}
