use crate::auth::{find_user, update_user_name, CurrentUser, Session};
use crate::pages::flash::Flash;
use crate::pages::SERVER_ERROR_MESSAGE;
use crate::recipes::{count_favorites, count_recipes};
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::SignedCookieJar;
use serde::{Deserialize, Serialize};
use tera::Context;

#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    pub name: String,
}

#[derive(Serialize)]
struct ProfileView<'a> {
    name: &'a str,
    email: &'a str,
}

pub async fn profile(
    CurrentUser(session): CurrentUser,
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Response {
    let mut conn = page_conn!(state.pool, jar, "/dashboard");

    let user = match find_user(&mut conn, session.user_id) {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::warn!(user_id = session.user_id, "Session refers to a missing user");
            return (Session::clear(jar), Redirect::to("/login")).into_response();
        }
        Err(e) => {
            tracing::error!("Failed to load profile: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to load profile").into_response();
        }
    };

    let counts = count_recipes(&mut conn, user.id)
        .and_then(|recipes| count_favorites(&mut conn, user.id).map(|favs| (recipes, favs)));
    let (recipes_count, favorites_count) = match counts {
        Ok(counts) => counts,
        Err(e) => {
            tracing::error!("Failed to count recipes: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to load profile").into_response();
        }
    };
    drop(conn);

    let mut context = Context::new();
    context.insert(
        "user",
        &ProfileView {
            name: &user.name,
            email: &user.email,
        },
    );
    context.insert("recipes_count", &recipes_count);
    context.insert("favorites_count", &favorites_count);
    state
        .views
        .page(jar, Some(&session), "profile.html", context)
}

pub async fn update_profile(
    CurrentUser(session): CurrentUser,
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<ProfileForm>,
) -> Response {
    let name = form.name.trim();
    if name.is_empty() {
        return Flash::danger("Name cannot be empty.").redirect(jar, "/profile");
    }

    let mut conn = page_conn!(state.pool, jar, "/profile");

    match update_user_name(&mut conn, session.user_id, name) {
        Ok(true) => {
            let jar = Session::new(session.user_id, name).store(jar);
            Flash::success("Profile updated!").redirect(jar, "/profile")
        }
        Ok(false) => (Session::clear(jar), Redirect::to("/login")).into_response(),
        Err(e) => {
            tracing::error!("Failed to update profile: {}", e);
            Flash::danger(SERVER_ERROR_MESSAGE).redirect(jar, "/profile")
        }
    }
}
