use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use serde::{Deserialize, Serialize};

use super::crypto::derive_key_material;

pub const SESSION_COOKIE: &str = "genie_session";

/// Signed-in user carried in the signed session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: i32,
    pub user_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    Missing,
    Malformed,
}

/// Cookie signing key derived from the configured secret.
pub fn session_key(secret: &str) -> Key {
    Key::from(&derive_key_material(secret)[..])
}

impl Session {
    pub fn new(user_id: i32, user_name: impl Into<String>) -> Self {
        Self {
            user_id,
            user_name: user_name.into(),
        }
    }

    /// Read the session from a jar. Cookies with a bad signature never reach here.
    pub fn from_jar(jar: &SignedCookieJar) -> Result<Self, SessionError> {
        let cookie = jar.get(SESSION_COOKIE).ok_or(SessionError::Missing)?;
        serde_json::from_str(cookie.value()).map_err(|_| SessionError::Malformed)
    }

    pub fn store(&self, jar: SignedCookieJar) -> SignedCookieJar {
        let value = match serde_json::to_string(self) {
            Ok(v) => v,
            Err(e) => {
                tracing::error!("Failed to encode session: {}", e);
                return jar;
            }
        };

        jar.add(
            Cookie::build((SESSION_COOKIE, value))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax),
        )
    }

    pub fn clear(jar: SignedCookieJar) -> SignedCookieJar {
        jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
    }
}
