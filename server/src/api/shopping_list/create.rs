use crate::api::ErrorResponse;
use crate::auth::ApiUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::NewShoppingItem;
use crate::schema::shopping_list;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AddItemRequest {
    pub item: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AddItemResponse {
    /// "added" or "error"
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
}

#[utoipa::path(
    post,
    path = "/api/shopping-list/add",
    tag = "shopping_list",
    request_body = AddItemRequest,
    responses(
        (status = 200, description = "Item added", body = AddItemResponse),
        (status = 400, description = "Blank item", body = AddItemResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("session_cookie" = []))
)]
pub async fn add_item(
    ApiUser(session): ApiUser,
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<AddItemRequest>,
) -> impl IntoResponse {
    let item = request.item.as_deref().map(str::trim).unwrap_or_default();
    if item.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(AddItemResponse {
                status: "error".to_string(),
                id: None,
            }),
        )
            .into_response();
    }

    let mut conn = get_conn!(pool);

    let new_item = NewShoppingItem {
        user_id: session.user_id,
        item,
    };

    match diesel::insert_into(shopping_list::table)
        .values(&new_item)
        .returning(shopping_list::id)
        .get_result::<i32>(&mut conn)
    {
        Ok(id) => Json(AddItemResponse {
            status: "added".to_string(),
            id: Some(id),
        })
        .into_response(),
        Err(e) => {
            tracing::error!("Failed to add shopping list item: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to add item".to_string(),
                }),
            )
                .into_response()
        }
    }
}
