use crate::api::ErrorResponse;
use crate::auth::ApiUser;
use crate::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Reply for an empty message; the model is not called.
pub const EMPTY_MESSAGE_REPLY: &str = "I didn't catch that.";

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    /// Recipe the question is about, as shown on the recipe page.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub context: Option<Value>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChatResponse {
    pub response: String,
}

#[utoipa::path(
    post,
    path = "/chat",
    tag = "chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Chef reply", body = ChatResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("session_cookie" = []))
)]
pub async fn chat(
    ApiUser(session): ApiUser,
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> impl IntoResponse {
    let message = request.message.as_deref().map(str::trim).unwrap_or_default();
    if message.is_empty() {
        return Json(ChatResponse {
            response: EMPTY_MESSAGE_REPLY.to_string(),
        });
    }

    tracing::debug!(user_id = session.user_id, "Chef chat message");

    let response = state.ai.chat(message, request.context.as_ref()).await;
    Json(ChatResponse { response })
}
