use anyhow::Context;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

/// Per-connection SQLite settings. Foreign keys are off by default in SQLite
/// and the setting does not persist, so every pooled connection turns it on.
#[derive(Debug, Clone, Copy)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        diesel::sql_query("PRAGMA foreign_keys = ON")
            .execute(conn)
            .and_then(|_| diesel::sql_query("PRAGMA busy_timeout = 5000").execute(conn))
            .map(|_| ())
            .map_err(r2d2::Error::QueryError)
    }
}

pub fn create_pool(database_url: &str) -> anyhow::Result<DbPool> {
    build_pool(database_url, None)
}

/// Pool capped at `max_size` connections. An in-memory database needs a cap
/// of one, since each SQLite `:memory:` connection is its own database.
pub fn create_pool_with_max_size(database_url: &str, max_size: u32) -> anyhow::Result<DbPool> {
    build_pool(database_url, Some(max_size))
}

fn build_pool(database_url: &str, max_size: Option<u32>) -> anyhow::Result<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let mut builder = r2d2::Pool::builder().connection_customizer(Box::new(SqlitePragmas));
    if let Some(max_size) = max_size {
        builder = builder.max_size(max_size);
    }
    let pool = builder
        .build(manager)
        .with_context(|| format!("Failed to create database pool for {}", database_url))?;

    // Run pending migrations on startup
    let mut conn = pool
        .get()
        .context("Failed to get DB connection for migrations")?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow::anyhow!("Failed to run database migrations: {}", e))?;

    Ok(pool)
}

/// Check out a pooled connection or return a 500 from the enclosing handler.
#[macro_export]
macro_rules! get_conn {
    ($pool:expr) => {
        match $pool.get() {
            Ok(conn) => conn,
            Err(e) => {
                tracing::error!("Failed to get DB connection: {}", e);
                return (
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    axum::Json($crate::api::ErrorResponse {
                        error: "Database connection failed".to_string(),
                    }),
                )
                    .into_response();
            }
        }
    };
}
