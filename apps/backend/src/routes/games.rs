//! Game HTTP routes. The caller's player id comes from `X-Player-Id`.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::domain::player_view::MessageView;
use crate::domain::{BotId, GameView, MessageKind};
use crate::error::AppError;
use crate::extractors::{CallerPlayerId, GameIdPath, OptionalCallerPlayerId, ValidatedJson};
use crate::services::games::JoinOutcome;
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
pub struct JoinResponse {
    pub bot_id: BotId,
    pub already_joined: bool,
}

#[derive(Debug, Deserialize)]
pub struct TagRequest {
    pub accused_bot_id: BotId,
}

#[derive(Debug, Serialize)]
pub struct TagResponse {
    pub winning_bot_id: BotId,
    pub tagger_won: bool,
    pub result: String,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
    #[serde(default)]
    pub target_bot_id: Option<BotId>,
}

#[derive(Debug, Serialize)]
pub struct HelpResponse {
    pub kind: &'static str,
    pub text: String,
    pub help_remaining: i32,
}

/// POST /api/games
///
/// Creates a game with five AI bots. The creator joins separately.
async fn create_game(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let game = app_state.games.create_game().await?;
    Ok(HttpResponse::Created().json(GameView::build(&game, &[], None)))
}

/// GET /api/games/{game_id}
///
/// Callers without `X-Player-Id` get the spectator view; a malformed header
/// is a 400.
async fn get_game(
    game_id: GameIdPath,
    caller: OptionalCallerPlayerId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let view = app_state
        .games
        .get_game_view(game_id.0, caller.0)
        .await?;
    Ok(HttpResponse::Ok().json(view))
}

/// POST /api/games/{game_id}/join
async fn join_game(
    game_id: GameIdPath,
    caller: CallerPlayerId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let outcome = app_state.games.join_game(game_id.0, caller.0).await?;
    let body = JoinResponse {
        bot_id: outcome.bot_id(),
        already_joined: matches!(outcome, JoinOutcome::AlreadyJoined { .. }),
    };
    Ok(HttpResponse::Ok().json(body))
}

/// POST /api/games/{game_id}/tag
async fn tag(
    game_id: GameIdPath,
    caller: CallerPlayerId,
    body: ValidatedJson<TagRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let outcome = app_state
        .games
        .tag(game_id.0, caller.0, body.accused_bot_id)
        .await?;
    Ok(HttpResponse::Ok().json(TagResponse {
        winning_bot_id: outcome.winning_bot_id,
        tagger_won: outcome.tagger_won,
        result: outcome.narrative,
    }))
}

/// POST /api/games/{game_id}/messages
async fn send_message(
    game_id: GameIdPath,
    caller: CallerPlayerId,
    body: ValidatedJson<SendMessageRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let message = app_state
        .games
        .send_message(game_id.0, caller.0, &body.text, body.target_bot_id)
        .await?;
    Ok(HttpResponse::Created().json(MessageView::from(&message)))
}

/// POST /api/games/{game_id}/help
async fn request_help(
    game_id: GameIdPath,
    caller: CallerPlayerId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let help = app_state.games.request_help(game_id.0, caller.0).await?;
    Ok(HttpResponse::Ok().json(HelpResponse {
        kind: match help.kind {
            MessageKind::Question => "QUESTION",
            MessageKind::Answer => "ANSWER",
        },
        text: help.text,
        help_remaining: help.help_remaining,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::post().to(create_game))
        .route("/{game_id}", web::get().to(get_game))
        .route("/{game_id}/join", web::post().to(join_game))
        .route("/{game_id}/tag", web::post().to(tag))
        .route("/{game_id}/messages", web::post().to(send_message))
        .route("/{game_id}/help", web::post().to(request_help));
}
