//! Registration, login and logout.

use crate::auth::{authenticate_user, register_user, MaybeUser, RegisterOutcome, Session};
use crate::pages::flash::Flash;
use crate::pages::SERVER_ERROR_MESSAGE;
use crate::AppState;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::SignedCookieJar;
use serde::Deserialize;
use tera::Context;

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

pub async fn register_form(
    MaybeUser(session): MaybeUser,
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Response {
    state
        .views
        .page(jar, session.as_ref(), "register.html", Context::new())
}

pub async fn register(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<RegisterForm>,
) -> Response {
    if form.name.trim().is_empty() || form.email.trim().is_empty() || form.password.is_empty() {
        return Flash::danger("All fields are required.").redirect(jar, "/register");
    }

    let mut conn = page_conn!(state.pool, jar, "/register");

    match register_user(&mut conn, &form.name, &form.email, &form.password) {
        Ok(RegisterOutcome::Created(user)) => {
            tracing::info!(user_id = user.id, "Registered new user");
            Flash::success("Registered!").redirect(jar, "/login")
        }
        Ok(RegisterOutcome::EmailTaken) => Flash::danger("Email taken.").redirect(jar, "/register"),
        Err(e) => {
            tracing::error!("Failed to register user: {}", e);
            Flash::danger(SERVER_ERROR_MESSAGE).redirect(jar, "/register")
        }
    }
}

pub async fn login_form(
    MaybeUser(session): MaybeUser,
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Response {
    state
        .views
        .page(jar, session.as_ref(), "login.html", Context::new())
}

pub async fn login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let mut conn = page_conn!(state.pool, jar, "/login");

    match authenticate_user(&mut conn, &form.email, &form.password) {
        Ok(Some(user)) => {
            let jar = Session::new(user.id, user.name).store(jar);
            (jar, Redirect::to("/dashboard")).into_response()
        }
        Ok(None) => Flash::danger("Invalid credentials.").redirect(jar, "/login"),
        Err(e) => {
            tracing::error!("Failed to authenticate user: {}", e);
            Flash::danger(SERVER_ERROR_MESSAGE).redirect(jar, "/login")
        }
    }
}

pub async fn logout(jar: SignedCookieJar) -> Response {
    (Session::clear(jar), Redirect::to("/")).into_response()
}
