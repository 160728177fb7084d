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
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DeleteItemResponse {
    pub status: String,
}

#[utoipa::path(
    post,
    path = "/api/shopping-list/delete/{id}",
    tag = "shopping_list",
    params(
        ("id" = i32, Path, description = "Shopping list item ID")
    ),
    responses(
        (status = 200, description = "Item deleted", body = DeleteItemResponse),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("session_cookie" = []))
)]
pub async fn delete_item(
    ApiUser(session): ApiUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let deleted = match diesel::delete(
        shopping_list::table
            .filter(shopping_list::id.eq(id))
            .filter(shopping_list::user_id.eq(session.user_id)),
    )
    .execute(&mut conn)
    {
        Ok(count) => count,
        Err(e) => {
            tracing::error!("Failed to delete shopping list item: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to delete item".to_string(),
                }),
            )
                .into_response();
        }
    };

    if deleted == 0 {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Item not found".to_string(),
            }),
        )
            .into_response();
    }

    Json(DeleteItemResponse {
        status: "deleted".to_string(),
    })
    .into_response()
}
