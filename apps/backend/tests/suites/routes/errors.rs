use actix_web::http::StatusCode;
use actix_web::test;
use backend::AppError;
use backend_test_support::problem_details::assert_problem_details_from_service_response;
use serde_json::json;

use crate::support::test_state::build_test_state;

#[actix_web::test]
async fn bad_game_ids_are_rejected() -> Result<(), AppError> {
    let app = test_app!(build_test_state().await?);

    for uri in ["/api/games/abc", "/api/games/0", "/api/games/-4"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_problem_details_from_service_response(
            resp,
            "INVALID_GAME_ID",
            StatusCode::BAD_REQUEST,
            None,
        )
        .await;
    }
    Ok(())
}

#[actix_web::test]
async fn unknown_game_is_not_found() -> Result<(), AppError> {
    let app = test_app!(build_test_state().await?);

    let req = test::TestRequest::get().uri("/api/games/9999").to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "GAME_NOT_FOUND",
        StatusCode::NOT_FOUND,
        Some("9999"),
    )
    .await;
    Ok(())
}

#[actix_web::test]
async fn player_header_is_required_to_act() -> Result<(), AppError> {
    let app = test_app!(build_test_state().await?);

    let req = test::TestRequest::post().uri("/api/games/1/join").to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "INVALID_PLAYER_ID",
        StatusCode::BAD_REQUEST,
        Some("X-Player-Id"),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/games/1/join")
        .insert_header(("X-Player-Id", "not-a-number"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "INVALID_PLAYER_ID",
        StatusCode::BAD_REQUEST,
        None,
    )
    .await;
    Ok(())
}

#[actix_web::test]
async fn malformed_json_is_a_bad_request() -> Result<(), AppError> {
    let app = test_app!(build_test_state().await?);

    let req = test::TestRequest::post()
        .uri("/api/players")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"display_name\":")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "BAD_REQUEST",
        StatusCode::BAD_REQUEST,
        None,
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/players")
        .set_json(json!({ "name": "wrong field" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "BAD_REQUEST",
        StatusCode::BAD_REQUEST,
        None,
    )
    .await;
    Ok(())
}

#[actix_web::test]
async fn malformed_player_header_is_rejected_on_the_view() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let game = state.games.create_game().await?;
    let app = test_app!(state);

    for bad in ["not-a-number", "0", "-1"] {
        let req = test::TestRequest::get()
            .uri(&format!("/api/games/{}", game.id))
            .insert_header(("X-Player-Id", bad))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_problem_details_from_service_response(
            resp,
            "INVALID_PLAYER_ID",
            StatusCode::BAD_REQUEST,
            None,
        )
        .await;
    }

    let req = test::TestRequest::get()
        .uri(&format!("/api/games/{}", game.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    Ok(())
}
