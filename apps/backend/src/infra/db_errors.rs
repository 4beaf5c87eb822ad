//! SeaORM -> DomainError translation helpers.
//!
//! Adapters convert `sea_orm::DbErr` into `crate::errors::domain::DomainError`
//! here, and higher layers map `DomainError` to `AppError` via `From`.

use tracing::{error, warn};

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};

fn mentions_sqlstate(msg: &str, code: &str) -> bool {
    msg.contains(code) || msg.contains(&format!("SQLSTATE({code})"))
}

/// Extract the first `table.column` from SQLite "UNIQUE constraint failed: ..." messages.
fn extract_sqlite_table_column(error_msg: &str) -> Option<&str> {
    let prefix = error_msg.find("UNIQUE constraint failed: ")?;
    let rest = &error_msg[prefix + "UNIQUE constraint failed: ".len()..];
    rest.split(|c: char| c.is_whitespace() || c == ',' || c == '"')
        .find(|s| !s.is_empty())
}

fn map_unique_to_conflict(error_msg: &str) -> Option<(ConflictKind, &'static str)> {
    let seat_clash = error_msg.contains("ux_bots_game_seat")
        || extract_sqlite_table_column(error_msg) == Some("bots.game_id");
    if seat_clash {
        return Some((
            ConflictKind::Other("Unique".into()),
            "Seat already exists in this game",
        ));
    }
    None
}

/// Translate a `DbErr` into a `DomainError` with sanitized detail.
pub fn map_db_err(e: sea_orm::DbErr) -> DomainError {
    let error_msg = e.to_string();

    match &e {
        sea_orm::DbErr::Custom(msg) if msg.starts_with("GAME_NOT_FOUND:") => {
            if let Some(Ok(game_id)) = msg.strip_prefix("GAME_NOT_FOUND:").map(str::parse::<i64>) {
                return DomainError::not_found(NotFoundKind::Game, format!("Game {game_id} not found"));
            }
            return DomainError::not_found(NotFoundKind::Game, "Game not found");
        }
        sea_orm::DbErr::Custom(msg) if msg.starts_with("STATE_MISMATCH:") => {
            #[derive(serde::Deserialize)]
            struct MismatchInfo {
                game_id: i64,
                expected: String,
                actual: String,
            }

            if let Some(Ok(info)) = msg
                .strip_prefix("STATE_MISMATCH:")
                .map(serde_json::from_str::<MismatchInfo>)
            {
                warn!(
                    game_id = info.game_id,
                    expected = %info.expected,
                    actual = %info.actual,
                    "Conditional game write lost the race"
                );
                return DomainError::conflict(
                    ConflictKind::StateMismatch,
                    format!(
                        "Game {} is in {} but {} was expected",
                        info.game_id, info.actual, info.expected
                    ),
                );
            }
            return DomainError::conflict(ConflictKind::StateMismatch, "Game state changed");
        }
        sea_orm::DbErr::Custom(msg) if msg.starts_with("INVARIANT_VIOLATION:") => {
            error!(raw_error = %msg, "Storage invariant violated");
            return DomainError::infra(
                InfraErrorKind::InvariantViolation,
                msg.trim_start_matches("INVARIANT_VIOLATION:").to_string(),
            );
        }
        sea_orm::DbErr::Custom(msg) if msg.starts_with("BOT_NOT_AI:") => {
            return DomainError::conflict(ConflictKind::NoFreeSeat, "Bot was already claimed");
        }
        sea_orm::DbErr::Custom(msg) if msg.starts_with("HELP_EXHAUSTED:") => {
            return DomainError::conflict(ConflictKind::HelpExhausted, "No help left");
        }
        sea_orm::DbErr::RecordNotFound(_) => {
            return DomainError::not_found(
                NotFoundKind::Other("Record".into()),
                "Record not found",
            );
        }
        sea_orm::DbErr::ConnectionAcquire(_) | sea_orm::DbErr::Conn(_) => {
            warn!(raw_error = %error_msg, "Database unavailable");
            return DomainError::infra(InfraErrorKind::DbUnavailable, "Database unavailable");
        }
        sea_orm::DbErr::Type(_) | sea_orm::DbErr::TryIntoErr { .. } | sea_orm::DbErr::Json(_) => {
            error!(raw_error = %error_msg, "Stored row failed to decode");
            return DomainError::infra(
                InfraErrorKind::DataCorruption,
                "Stored data failed to decode",
            );
        }
        _ => {}
    }

    if mentions_sqlstate(&error_msg, "23505")
        || error_msg.contains("duplicate key value violates unique constraint")
        || error_msg.contains("UNIQUE constraint failed")
    {
        warn!(raw_error = %error_msg, "Unique constraint violation");
        if let Some((kind, detail)) = map_unique_to_conflict(&error_msg) {
            return DomainError::conflict(kind, detail);
        }
        return DomainError::conflict(
            ConflictKind::Other("Unique".into()),
            "Unique constraint violation",
        );
    }

    if mentions_sqlstate(&error_msg, "23503") || error_msg.contains("FOREIGN KEY constraint failed")
    {
        warn!(raw_error = %error_msg, "Foreign key constraint violation");
        return DomainError::validation_other("Foreign key constraint violation");
    }

    if mentions_sqlstate(&error_msg, "23514") {
        warn!(raw_error = %error_msg, "Check constraint violation");
        return DomainError::validation_other("Check constraint violation");
    }

    if error_msg.contains("timeout") || error_msg.contains("timed out") {
        warn!(raw_error = %error_msg, "Database timeout");
        return DomainError::infra(InfraErrorKind::Timeout, "Database timeout");
    }

    error!(raw_error = %error_msg, "Unhandled database error");
    DomainError::infra(
        InfraErrorKind::Other("DbErr".into()),
        "Database operation failed",
    )
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        map_db_err(e)
    }
}
