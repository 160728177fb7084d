use crate::api::ErrorResponse;
use crate::auth::ApiUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::schema::shopping_list;
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

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ToggleItemResponse {
    pub status: String,
    pub is_checked: bool,
}

/// Flip the checked flag of one of the user's items. `None` if it is not theirs.
pub fn toggle_checked(
    conn: &mut SqliteConnection,
    user_id: i32,
    item_id: i32,
) -> QueryResult<Option<bool>> {
    diesel::update(
        shopping_list::table
            .filter(shopping_list::id.eq(item_id))
            .filter(shopping_list::user_id.eq(user_id)),
    )
    .set(shopping_list::is_checked.eq(diesel::dsl::not(shopping_list::is_checked)))
    .returning(shopping_list::is_checked)
    .get_result(conn)
    .optional()
}

#[utoipa::path(
    post,
    path = "/api/shopping-list/toggle/{id}",
    tag = "shopping_list",
    params(
        ("id" = i32, Path, description = "Shopping list item ID")
    ),
    responses(
        (status = 200, description = "Item toggled", body = ToggleItemResponse),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("session_cookie" = []))
)]
pub async fn toggle_item(
    ApiUser(session): ApiUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    match toggle_checked(&mut conn, session.user_id, id) {
        Ok(Some(is_checked)) => Json(ToggleItemResponse {
            status: "toggled".to_string(),
            is_checked,
        })
        .into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Item not found".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to toggle shopping list item: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to toggle item".to_string(),
                }),
            )
                .into_response()
        }
    }
}
