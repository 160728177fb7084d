//! One-shot messages shown on the next rendered page.

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};
use serde::{Deserialize, Serialize};

pub const FLASH_COOKIE: &str = "genie_flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Danger,
            message: message.into(),
        }
    }

    pub fn set(&self, jar: SignedCookieJar) -> SignedCookieJar {
        match serde_json::to_string(self) {
            Ok(value) => jar.add(
                Cookie::build((FLASH_COOKIE, value))
                    .path("/")
                    .http_only(true)
                    .same_site(SameSite::Lax),
            ),
            Err(e) => {
                tracing::error!("Failed to encode flash message: {}", e);
                jar
            }
        }
    }

    /// Remove the pending flash, if any, from the jar.
    pub fn take(jar: SignedCookieJar) -> (SignedCookieJar, Option<Flash>) {
        let Some(cookie) = jar.get(FLASH_COOKIE) else {
            return (jar, None);
        };
        let flash = serde_json::from_str(cookie.value()).ok();
        (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), flash)
    }

    /// Redirect (303) carrying this message.
    pub fn redirect(self, jar: SignedCookieJar, to: &str) -> Response {
        (self.set(jar), Redirect::to(to)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session_key;

    #[test]
    fn test_flash_is_read_once() {
        let jar = SignedCookieJar::new(session_key("flash-test"));
        let jar = Flash::danger("Email taken.").set(jar);

        let (jar, flash) = Flash::take(jar);
        assert_eq!(flash, Some(Flash::danger("Email taken.")));

        let (_, again) = Flash::take(jar);
        assert_eq!(again, None);
    }

    #[test]
    fn test_level_serializes_lowercase() {
        let json = serde_json::to_string(&Flash::success("Registered!")).unwrap();
        assert_eq!(json, r#"{"level":"success","message":"Registered!"}"#);
    }
}
