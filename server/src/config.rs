//! Server configuration from environment variables.

use genie_core::AiConfig;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// Signing secret used when `SECRET_KEY` is unset. Development only.
pub const DEV_SECRET_KEY: &str = "dev_secret_key_change_me";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Secret the session and flash cookies are signed with.
    pub secret_key: String,
    /// SQLite database file.
    pub database_url: String,
    /// Root of the `/static` tree. Uploads land in `<static_dir>/uploads`.
    pub static_dir: PathBuf,
    pub bind_addr: SocketAddr,
    pub ai: AiConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// - `SECRET_KEY`: cookie signing secret (default: development secret)
    /// - `DATABASE_URL`: SQLite file path (default: "database.db")
    /// - `STATIC_DIR`: static assets root (default: "static")
    /// - `BIND_ADDR`: listen address (default: "0.0.0.0:3000")
    /// - AI settings, see [`AiConfig::from_env`]
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret_key = match env::var("SECRET_KEY") {
            Ok(key) if !key.trim().is_empty() => key,
            _ => {
                tracing::warn!("SECRET_KEY not set, using the development secret");
                DEV_SECRET_KEY.to_string()
            }
        };

        let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| "database.db".to_string());

        let static_dir = env::var("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("static"));

        let bind_raw = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_addr = bind_raw
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                name: "BIND_ADDR",
                value: bind_raw.clone(),
            })?;

        Ok(Self {
            secret_key,
            database_url,
            static_dir,
            bind_addr,
            ai: AiConfig::from_env(),
        })
    }

    /// Directory uploaded photos are written to.
    pub fn upload_dir(&self) -> PathBuf {
        self.static_dir.join(crate::uploads::UPLOAD_SUBDIR)
    }
}
