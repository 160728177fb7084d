pub mod create;
pub mod delete;
pub mod toggle;

use crate::AppState;
use axum::routing::post;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/shopping-list endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/add", post(create::add_item))
        .route("/toggle/{id}", post(toggle::toggle_item))
        .route("/delete/{id}", post(delete::delete_item))
}

#[derive(OpenApi)]
#[openapi(
    paths(create::add_item, toggle::toggle_item, delete::delete_item),
    components(schemas(
        create::AddItemRequest,
        create::AddItemResponse,
        toggle::ToggleItemResponse,
        delete::DeleteItemResponse,
    ))
)]
pub struct ApiDoc;
