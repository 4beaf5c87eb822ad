use std::env;

use crate::config::must_var;
use crate::error::AppError;

/// Which database backend to connect to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbKind {
    /// PostgreSQL from POSTGRES_* / APP_DB_* variables
    Postgres,
    /// Private in-memory SQLite, used by tests and demos
    SqliteMemory,
    /// SQLite file at TURING_SQLITE_PATH
    SqliteFile,
}

impl DbKind {
    /// Read `TURING_DB_KIND` (`postgres`, `sqlite-memory`, `sqlite-file`); defaults to Postgres.
    pub fn from_env() -> Result<Self, AppError> {
        match env::var("TURING_DB_KIND") {
            Err(_) => Ok(DbKind::Postgres),
            Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "postgres" | "pg" => Ok(DbKind::Postgres),
                "sqlite-memory" | "memory" => Ok(DbKind::SqliteMemory),
                "sqlite-file" | "sqlite" => Ok(DbKind::SqliteFile),
                other => Err(AppError::config(format!(
                    "Unknown TURING_DB_KIND '{other}'; expected postgres, sqlite-memory or sqlite-file"
                ))),
            },
        }
    }
}

/// Builds a database URL from environment variables for `kind`
pub fn db_url(kind: &DbKind) -> Result<String, AppError> {
    match kind {
        DbKind::Postgres => {
            let host = host();
            let port = port();
            let db_name = must_var("TURING_DB")?;
            let username = must_var("APP_DB_USER")?;
            let password = must_var("APP_DB_PASSWORD")?;
            Ok(format!(
                "postgresql://{username}:{password}@{host}:{port}/{db_name}"
            ))
        }
        DbKind::SqliteMemory => Ok("sqlite::memory:".to_string()),
        DbKind::SqliteFile => {
            let path = must_var("TURING_SQLITE_PATH")?;
            Ok(format!("sqlite://{path}?mode=rwc"))
        }
    }
}

/// Get database host from environment (defaults to localhost)
fn host() -> String {
    env::var("POSTGRES_HOST").unwrap_or_else(|_| "localhost".to_string())
}

/// Get database port from environment (defaults to 5432)
fn port() -> String {
    env::var("POSTGRES_PORT").unwrap_or_else(|_| "5432".to_string())
}
