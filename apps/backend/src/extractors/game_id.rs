use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};

use crate::domain::GameId;
use crate::error::AppError;
use crate::errors::ErrorCode;

/// Game ID extracted from the `{game_id}` route parameter.
///
/// Only the format is checked; handlers report unknown games.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameIdPath(pub GameId);

fn parse_game_id(req: &HttpRequest) -> Result<GameIdPath, AppError> {
    let raw = req.match_info().get("game_id").ok_or_else(|| {
        AppError::bad_request(ErrorCode::InvalidGameId, "Missing game_id parameter")
    })?;

    let game_id = raw.parse::<i64>().map_err(|_| {
        AppError::bad_request(ErrorCode::InvalidGameId, format!("Invalid game id: {raw}"))
    })?;

    if game_id <= 0 {
        return Err(AppError::bad_request(
            ErrorCode::InvalidGameId,
            format!("Game id must be positive, got: {game_id}"),
        ));
    }
    Ok(GameIdPath(game_id))
}

impl FromRequest for GameIdPath {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(parse_game_id(req))
    }
}
