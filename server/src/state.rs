use crate::auth::session_key;
use crate::config::AppConfig;
use crate::db::DbPool;
use crate::views::Views;
use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use genie_core::AiClient;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<DbPool>,
    pub ai: AiClient,
    pub views: Arc<Views>,
    pub cookie_key: Key,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig, pool: DbPool, ai: AiClient) -> Result<Self, tera::Error> {
        Ok(Self {
            pool: Arc::new(pool),
            ai,
            views: Arc::new(Views::new()?),
            cookie_key: session_key(&config.secret_key),
            config: Arc::new(config),
        })
    }
}

impl FromRef<AppState> for Arc<DbPool> {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}
