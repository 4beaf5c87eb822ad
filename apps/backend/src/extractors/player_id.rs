use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};

use crate::domain::PlayerId;
use crate::error::AppError;
use crate::errors::ErrorCode;

pub const PLAYER_ID_HEADER: &str = "X-Player-Id";

/// The calling player, identified by the `X-Player-Id` header.
///
/// Use [`OptionalCallerPlayerId`] where anonymous callers are allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerPlayerId(pub PlayerId);

fn parse_player_id(req: &HttpRequest) -> Result<CallerPlayerId, AppError> {
    let header = req.headers().get(PLAYER_ID_HEADER).ok_or_else(|| {
        AppError::bad_request(
            ErrorCode::InvalidPlayerId,
            format!("Missing {PLAYER_ID_HEADER} header"),
        )
    })?;

    let player_id = header
        .to_str()
        .ok()
        .and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|id| *id > 0)
        .ok_or_else(|| {
            AppError::bad_request(
                ErrorCode::InvalidPlayerId,
                format!("{PLAYER_ID_HEADER} must be a positive integer"),
            )
        })?;

    Ok(CallerPlayerId(player_id))
}

impl FromRequest for CallerPlayerId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(parse_player_id(req))
    }
}

/// Caller for routes open to spectators: `None` only when the header is
/// absent. A present but malformed header is still rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionalCallerPlayerId(pub Option<PlayerId>);

fn parse_optional_player_id(req: &HttpRequest) -> Result<OptionalCallerPlayerId, AppError> {
    if !req.headers().contains_key(PLAYER_ID_HEADER) {
        return Ok(OptionalCallerPlayerId(None));
    }
    let CallerPlayerId(id) = parse_player_id(req)?;
    Ok(OptionalCallerPlayerId(Some(id)))
}

impl FromRequest for OptionalCallerPlayerId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(parse_optional_player_id(req))
    }
}
