use crate::api::ErrorResponse;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::cookie::{Key, SignedCookieJar};
use std::convert::Infallible;

use super::session::{Session, SessionError};

/// Signed-in user for page routes. Anonymous visitors are sent to `/login`.
///
/// ```ignore
/// async fn dashboard(CurrentUser(session): CurrentUser) -> impl IntoResponse {
///     // session.user_id is the signed-in user
/// }
/// ```
pub struct CurrentUser(pub Session);

/// Signed-in user for JSON routes. Anonymous callers get a 401.
pub struct ApiUser(pub Session);

/// Session if there is one.
pub struct MaybeUser(pub Option<Session>);

pub enum AuthError {
    MissingSession,
    InvalidSession,
}

impl From<SessionError> for AuthError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Missing => AuthError::MissingSession,
            SessionError::Malformed => AuthError::InvalidSession,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingSession => "Not logged in",
            AuthError::InvalidSession => "Invalid session",
        };

        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}

async fn read_session<S>(parts: &mut Parts, state: &S) -> Result<Session, SessionError>
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    let jar: SignedCookieJar = match SignedCookieJar::from_request_parts(parts, state).await {
        Ok(jar) => jar,
        Err(never) => match never {},
    };
    Session::from_jar(&jar)
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        read_session(parts, state)
            .await
            .map(CurrentUser)
            .map_err(|_| Redirect::to("/login"))
    }
}

impl<S> FromRequestParts<S> for ApiUser
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(ApiUser(read_session(parts, state).await?))
    }
}

impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(read_session(parts, state).await.ok()))
    }
}
