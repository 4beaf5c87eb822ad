use actix_web::http::StatusCode;
use actix_web::test;
use backend::domain::{BotId, GameId, GameState, PlayerId};
use backend::AppError;
use backend_test_support::problem_details::assert_problem_details_from_service_response;
use serde_json::{json, Value};

use crate::support::factory::{force_game, load_game, ForceGame};
use crate::support::test_state::build_test_state;

const HEADER: &str = "X-Player-Id";

#[actix_web::test]
async fn create_game_returns_a_spectator_view() -> Result<(), AppError> {
    let app = test_app!(build_test_state().await?);

    let req = test::TestRequest::post().uri("/api/games").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["game_id"].as_i64().unwrap() > 0);
    assert_eq!(body["phase"], "STARTED");
    assert_eq!(body["bots"].as_array().unwrap().len(), 5);
    assert!(body["my_bot_id"].is_null());
    assert!(!body.to_string().contains("bot_type"));
    Ok(())
}

#[actix_web::test]
async fn players_join_talk_and_tag_over_http() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = state.db.clone();
    let app = test_app!(state);

    let mut players: Vec<PlayerId> = Vec::new();
    for name in ["Ada", "Brook"] {
        let req = test::TestRequest::post()
            .uri("/api/players")
            .set_json(json!({ "display_name": name }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        players.push(body["id"].as_i64().unwrap());
    }
    let (ada, brook) = (players[0], players[1]);

    let req = test::TestRequest::post().uri("/api/games").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let game_id: GameId = body["game_id"].as_i64().unwrap();
    let seats: Vec<BotId> = body["bots"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_i64().unwrap())
        .collect();

    let mut joined = Vec::new();
    for player in [ada, brook, ada] {
        let req = test::TestRequest::post()
            .uri(&format!("/api/games/{game_id}/join"))
            .insert_header((HEADER, player.to_string()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        joined.push((body["bot_id"].as_i64().unwrap(), body["already_joined"] == true));
    }
    assert_eq!(joined, vec![(seats[0], false), (seats[1], false), (seats[0], true)]);
    assert_eq!(load_game(&db, game_id).await?.state, GameState::PlayersJoined);

    force_game(
        &db,
        game_id,
        ForceGame::state(GameState::WaitingForPlayerQuestion, true).turns(seats.clone(), 0),
    )
    .await?;

    let req = test::TestRequest::get()
        .uri(&format!("/api/games/{game_id}"))
        .insert_header((HEADER, ada.to_string()))
        .to_request();
    let view: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(view["my_bot_id"], seats[0]);
    assert_eq!(view["my_help_count"], 3);
    assert_eq!(view["phase"], "WAITING_FOR_QUESTION");

    let req = test::TestRequest::post()
        .uri(&format!("/api/games/{game_id}/help"))
        .insert_header((HEADER, ada.to_string()))
        .to_request();
    let help: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(help["kind"], "QUESTION");
    assert_eq!(help["help_remaining"], 2);

    let req = test::TestRequest::post()
        .uri(&format!("/api/games/{game_id}/messages"))
        .insert_header((HEADER, ada.to_string()))
        .set_json(json!({ "text": "Brook, coffee or tea?", "target_bot_id": seats[1] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let message: Value = test::read_body_json(resp).await;
    assert_eq!(message["kind"], "QUESTION");
    assert_eq!(message["source_bot_id"], seats[0]);
    assert_eq!(message["target_bot_id"], seats[1]);

    // Only Brook may act now.
    let req = test::TestRequest::post()
        .uri(&format!("/api/games/{game_id}/tag"))
        .insert_header((HEADER, ada.to_string()))
        .set_json(json!({ "accused_bot_id": seats[3] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(resp, "OUT_OF_TURN", StatusCode::CONFLICT, None)
        .await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/games/{game_id}/tag"))
        .insert_header((HEADER, brook.to_string()))
        .set_json(json!({ "accused_bot_id": seats[3] }))
        .to_request();
    let tag: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(tag["winning_bot_id"], seats[1]);
    assert_eq!(tag["tagger_won"], true);
    assert!(tag["result"].as_str().unwrap().contains("won"));

    let req = test::TestRequest::get()
        .uri(&format!("/api/games/{game_id}"))
        .to_request();
    let view: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(view["phase"], "FINISHED");
    assert!(view["my_bot_id"].is_null());
    assert_eq!(view["messages"].as_array().unwrap().len(), 1);
    Ok(())
}

#[actix_web::test]
async fn empty_message_is_unprocessable() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let player = state.players.create_player("Cass").await?;
    let game = state.games.create_game().await?;
    state.games.join_game(game.id, player.id).await?;
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri(&format!("/api/games/{}/messages", game.id))
        .insert_header((HEADER, player.id.to_string()))
        .set_json(json!({ "text": "   " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "EMPTY_TEXT",
        StatusCode::UNPROCESSABLE_ENTITY,
        None,
    )
    .await;
    Ok(())
}

#[actix_web::test]
async fn messages_before_turns_start_conflict() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let player = state.players.create_player("Dev").await?;
    let game = state.games.create_game().await?;
    state.games.join_game(game.id, player.id).await?;
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri(&format!("/api/games/{}/messages", game.id))
        .insert_header((HEADER, player.id.to_string()))
        .set_json(json!({ "text": "hello?", "target_bot_id": game.bots[2].id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "STATE_MISMATCH",
        StatusCode::CONFLICT,
        None,
    )
    .await;
    Ok(())
}
