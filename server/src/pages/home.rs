use crate::auth::{CurrentUser, MaybeUser};
use crate::AppState;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::SignedCookieJar;
use tera::Context;

/// Landing page. Signed-in users go straight to the dashboard.
pub async fn index(
    MaybeUser(session): MaybeUser,
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Response {
    if session.is_some() {
        return Redirect::to("/dashboard").into_response();
    }
    state.views.page(jar, None, "index.html", Context::new())
}

pub async fn dashboard(
    CurrentUser(session): CurrentUser,
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Response {
    state
        .views
        .page(jar, Some(&session), "dashboard.html", Context::new())
}
