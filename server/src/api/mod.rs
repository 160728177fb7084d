pub mod chat;
pub mod favorites;
pub mod shopping_list;

use crate::AppState;
use axum::routing::post;
use axum::Router;
use serde::Serialize;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{OpenApi, ToSchema};

use crate::auth::SESSION_COOKIE;

/// Shared error response used by all endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// JSON routes used by the page scripts. All require a session.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/favorite/{recipe_id}",
            post(favorites::toggle_favorite_handler),
        )
        .nest("/api/shopping-list", shopping_list::router())
        .route("/chat", post(chat::chat))
}

#[derive(OpenApi)]
#[openapi(
    paths(favorites::toggle_favorite_handler),
    components(schemas(favorites::FavoriteResponse, favorites::FavoriteStatus))
)]
struct FavoritesApi;

#[derive(OpenApi)]
#[openapi(
    paths(chat::chat),
    components(schemas(chat::ChatRequest, chat::ChatResponse))
)]
struct ChatApi;

/// Generate the complete OpenAPI spec by merging all module specs
pub fn openapi() -> utoipa::openapi::OpenApi {
    // Base spec with shared components and security
    #[derive(OpenApi)]
    #[openapi(
        info(title = "Food Genie", description = "JSON endpoints behind the Food Genie pages"),
        components(schemas(ErrorResponse))
    )]
    struct BaseApi;

    let mut spec = BaseApi::openapi();

    if let Some(components) = spec.components.as_mut() {
        components.add_security_scheme(
            "session_cookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE))),
        );
    }

    let modules: Vec<utoipa::openapi::OpenApi> = vec![
        FavoritesApi::openapi(),
        shopping_list::ApiDoc::openapi(),
        ChatApi::openapi(),
    ];

    for module_spec in modules {
        spec.paths.paths.extend(module_spec.paths.paths);

        if let Some(module_components) = module_spec.components {
            if let Some(spec_components) = spec.components.as_mut() {
                spec_components.schemas.extend(module_components.schemas);
            }
        }
    }

    spec
}
