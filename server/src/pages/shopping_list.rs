use crate::auth::CurrentUser;
use crate::get_conn;
use crate::models::ShoppingItem;
use crate::schema::shopping_list;
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::SignedCookieJar;
use diesel::prelude::*;
use tera::Context;

pub async fn shopping_list_page(
    CurrentUser(session): CurrentUser,
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Response {
    let mut conn = get_conn!(state.pool);

    let items: Vec<ShoppingItem> = match shopping_list::table
        .filter(shopping_list::user_id.eq(session.user_id))
        .order(shopping_list::id.desc())
        .select(ShoppingItem::as_select())
        .load(&mut conn)
    {
        Ok(items) => items,
        Err(e) => {
            tracing::error!("Failed to load shopping list: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to load shopping list")
                .into_response();
        }
    };
    drop(conn);

    let mut context = Context::new();
    context.insert("items", &items);
    state
        .views
        .page(jar, Some(&session), "shopping_list.html", context)
}
