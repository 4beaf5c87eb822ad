use std::time::Duration;

use migration::{migrate, MigrationCommand};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::config::db::{db_url, DbKind};
use crate::error::AppError;

/// In-memory SQLite lives and dies with its only connection.
const SQLITE_MEMORY_LIFETIME: Duration = Duration::from_secs(60 * 60 * 24 * 365);

/// Connect to the database of `kind`. Does NOT run migrations.
pub async fn connect_db(kind: &DbKind) -> Result<DatabaseConnection, AppError> {
    let database_url = db_url(kind)?;
    let mut options = ConnectOptions::new(database_url);
    options.sqlx_logging(false);

    match kind {
        DbKind::SqliteMemory => {
            options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(SQLITE_MEMORY_LIFETIME)
                .max_lifetime(SQLITE_MEMORY_LIFETIME);
        }
        DbKind::SqliteFile => {
            options.max_connections(1);
        }
        DbKind::Postgres => {
            options.max_connections(16).min_connections(1);
        }
    }

    let conn = Database::connect(options).await?;
    Ok(conn)
}

/// Connect and bring the schema up to date.
pub async fn bootstrap_db(kind: &DbKind) -> Result<DatabaseConnection, AppError> {
    let conn = connect_db(kind).await?;
    migrate(&conn, MigrationCommand::Up).await?;
    info!(kind = ?kind, "database ready");
    Ok(conn)
}
