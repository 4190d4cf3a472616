//! 対局APIの統合テストモジュール
//! 実際のHTTPリクエストをシミュレートしてAPIの動作を確認し、
//! エンドポイント間の連携やエラーハンドリングをテストする。

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::Barrier;
use tower::ServiceExt;
use uuid::Uuid;

use othello::{
    api::{create_router, GameService},
    session::GameSessionManager,
};

fn create_test_app() -> Router {
    create_router(Arc::new(GameService::default()), true)
}

fn create_limited_app(max_sessions: usize) -> Router {
    let sessions = Arc::new(GameSessionManager::new(max_sessions));
    create_router(Arc::new(GameService::new(sessions, true)), true)
}

async fn parse_response_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send_request(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");

    let request = match body {
        Some(body) => request.body(Body::from(serde_json::to_vec(&body).unwrap())).unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

async fn create_game(app: &Router, body: Value) -> String {
    let response = send_request(app, Method::POST, "/api/games", Some(body)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let game = parse_response_json(response).await;
    game["game_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_full_game_workflow() {
    let app = create_test_app();

    let create_response = send_request(&app, Method::POST, "/api/games", Some(json!({}))).await;
    assert_eq!(create_response.status(), StatusCode::CREATED);
    assert_eq!(
        create_response.headers().get("Access-Control-Allow-Origin").unwrap(),
        "*"
    );
    let game = parse_response_json(create_response).await;
    let game_id = game["game_id"].as_str().unwrap().to_string();

    assert_eq!(game["current_player"], "Black");
    assert_eq!(game["active"], true);
    assert_eq!(game["black_count"], 2);
    assert_eq!(game["white_count"], 2);
    assert_eq!(game["board"][3][3], "White");
    assert_eq!(game["board"][3][4], "Black");
    assert!(game["board"][0][0].is_null());
    assert_eq!(game["last_outcome"]["kind"], "normal");

    let legal_moves = game["legal_moves"].as_array().unwrap();
    assert_eq!(legal_moves.len(), 4);
    assert_eq!(legal_moves[0]["position"], json!({"row": 2, "col": 3}));
    assert_eq!(legal_moves[0]["captured"], json!([{"row": 3, "col": 3}]));

    let move_response = send_request(
        &app,
        Method::POST,
        &format!("/api/games/{}/move", game_id),
        Some(json!({"row": 2, "col": 3})),
    )
    .await;
    assert_eq!(move_response.status(), StatusCode::OK);
    let move_result = parse_response_json(move_response).await;
    assert_eq!(move_result["success"], true);
    assert_eq!(move_result["player_move"]["player"], "Black");
    assert_eq!(move_result["player_move"]["flipped"], json!([{"row": 3, "col": 3}]));
    assert_eq!(move_result["outcome"]["kind"], "normal");
    assert_eq!(move_result["game_state"]["current_player"], "White");
    assert_eq!(move_result["game_state"]["last_move"], json!({"row": 2, "col": 3}));
    assert_eq!(move_result["game_state"]["black_count"], 4);
    assert_eq!(move_result["game_state"]["white_count"], 1);

    let history_response = send_request(
        &app,
        Method::GET,
        &format!("/api/games/{}/history", game_id),
        None,
    )
    .await;
    assert_eq!(history_response.status(), StatusCode::OK);
    let history = parse_response_json(history_response).await;
    assert_eq!(history["total_moves"], 1);
    assert_eq!(history["moves"][0]["position"], json!({"row": 2, "col": 3}));

    let delete_response = send_request(&app, Method::DELETE, &format!("/api/games/{}", game_id), None).await;
    assert_eq!(delete_response.status(), StatusCode::NO_CONTENT);

    let get_deleted_response = send_request(&app, Method::GET, &format!("/api/games/{}", game_id), None).await;
    assert_eq!(get_deleted_response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_game_without_body_uses_defaults() {
    let app = create_test_app();

    let response = send_request(&app, Method::POST, "/api/games", None).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let game = parse_response_json(response).await;
    assert_eq!(game["show_hints"], true);
    assert_eq!(game["hints"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_hint_toggle_does_not_affect_moves() {
    let app = create_test_app();
    let game_id = create_game(&app, json!({"show_hints": false})).await;

    let game = parse_response_json(
        send_request(&app, Method::GET, &format!("/api/games/{}", game_id), None).await,
    )
    .await;
    assert_eq!(game["show_hints"], false);
    assert!(game["hints"].as_array().unwrap().is_empty());
    assert_eq!(game["legal_moves"].as_array().unwrap().len(), 4);

    // ヒント非表示でも合法手は打てる
    let move_response = send_request(
        &app,
        Method::POST,
        &format!("/api/games/{}/move", game_id),
        Some(json!({"row": 5, "col": 4})),
    )
    .await;
    assert_eq!(move_response.status(), StatusCode::OK);

    let hints_response = send_request(
        &app,
        Method::PUT,
        &format!("/api/games/{}/hints", game_id),
        Some(json!({"show_hints": true})),
    )
    .await;
    assert_eq!(hints_response.status(), StatusCode::OK);
    let game = parse_response_json(hints_response).await;
    assert_eq!(game["show_hints"], true);
    assert_eq!(game["hints"].as_array().unwrap().len(), game["legal_moves"].as_array().unwrap().len());
    assert_eq!(game["move_count"], 1);
}

#[tokio::test]
async fn test_restart_resets_board() {
    let app = create_test_app();
    let game_id = create_game(&app, json!({})).await;

    send_request(
        &app,
        Method::POST,
        &format!("/api/games/{}/move", game_id),
        Some(json!({"row": 3, "col": 2})),
    )
    .await;

    let restart_response = send_request(&app, Method::POST, &format!("/api/games/{}/restart", game_id), None).await;
    assert_eq!(restart_response.status(), StatusCode::OK);
    let game = parse_response_json(restart_response).await;

    assert_eq!(game["game_id"], game_id.as_str());
    assert_eq!(game["move_count"], 0);
    assert_eq!(game["current_player"], "Black");
    assert!(game["last_move"].is_null());
    assert_eq!(game["black_count"], 2);
    assert_eq!(game["white_count"], 2);
}

#[tokio::test]
async fn test_game_over_through_api() {
    let app = create_test_app();
    let game_id = create_game(&app, json!({})).await;

    let sequence = [(5, 4), (3, 5), (2, 4), (5, 5), (4, 6), (5, 3), (6, 4), (4, 5), (4, 2)];
    let mut last = Value::Null;
    for (row, col) in sequence {
        let response = send_request(
            &app,
            Method::POST,
            &format!("/api/games/{}/move", game_id),
            Some(json!({"row": row, "col": col})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        last = parse_response_json(response).await;
    }

    assert_eq!(last["outcome"]["kind"], "game_over");
    assert_eq!(last["outcome"]["result"]["winner"], "Black");
    assert_eq!(last["game_state"]["active"], false);
    assert_eq!(last["game_state"]["result"]["black_count"], 13);
    assert_eq!(last["game_state"]["result"]["white_count"], 0);
    assert!(last["game_state"]["legal_moves"].as_array().unwrap().is_empty());

    // 終局後の着手は拒否される
    let after = send_request(
        &app,
        Method::POST,
        &format!("/api/games/{}/move", game_id),
        Some(json!({"row": 0, "col": 0})),
    )
    .await;
    assert_eq!(after.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_response_json(after).await["error"], "ILLEGAL_MOVE");

    let stats = parse_response_json(send_request(&app, Method::GET, "/api/games/stats", None).await).await;
    assert_eq!(stats["finished_games"], 1);
}

#[tokio::test]
async fn test_error_responses() {
    let app = create_test_app();

    let fake_id = Uuid::new_v4();
    let error_response = send_request(&app, Method::GET, &format!("/api/games/{}", fake_id), None).await;
    assert_eq!(error_response.status(), StatusCode::NOT_FOUND);
    let error_data = parse_response_json(error_response).await;
    assert_eq!(error_data["error"], "GAME_NOT_FOUND");

    let game_id = create_game(&app, json!({})).await;

    let out_of_range = send_request(
        &app,
        Method::POST,
        &format!("/api/games/{}/move", game_id),
        Some(json!({"row": 10, "col": 10})),
    )
    .await;
    assert_eq!(out_of_range.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_response_json(out_of_range).await["error"], "BAD_REQUEST");

    let occupied = send_request(
        &app,
        Method::POST,
        &format!("/api/games/{}/move", game_id),
        Some(json!({"row": 3, "col": 3})),
    )
    .await;
    assert_eq!(occupied.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_response_json(occupied).await["error"], "ILLEGAL_MOVE");

    // 拒否された着手で状態は変わらない
    let game = parse_response_json(
        send_request(&app, Method::GET, &format!("/api/games/{}", game_id), None).await,
    )
    .await;
    assert_eq!(game["move_count"], 0);
    assert_eq!(game["current_player"], "Black");
}

#[tokio::test]
async fn test_list_sessions_and_health() {
    let app = create_test_app();

    let sessions = parse_response_json(send_request(&app, Method::GET, "/api/games", None).await).await;
    assert_eq!(sessions["total_count"], 0);

    create_game(&app, json!({})).await;
    create_game(&app, json!({})).await;

    let sessions = parse_response_json(send_request(&app, Method::GET, "/api/games", None).await).await;
    assert_eq!(sessions["total_count"], 2);
    assert_eq!(sessions["sessions"][0]["active"], true);

    let health_response = send_request(&app, Method::GET, "/health", None).await;
    assert_eq!(health_response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_session_limit() {
    let app = create_limited_app(2);

    create_game(&app, json!({})).await;
    create_game(&app, json!({})).await;

    let response = send_request(&app, Method::POST, "/api/games", Some(json!({}))).await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(parse_response_json(response).await["error"], "MAX_SESSIONS_REACHED");
}

#[tokio::test]
async fn test_cors_disabled() {
    let app = create_router(Arc::new(GameService::default()), false);

    let response = send_request(&app, Method::GET, "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("Access-Control-Allow-Origin").is_none());
}

#[tokio::test]
async fn test_concurrent_moves_on_separate_games() {
    let app = create_test_app();
    let barrier = Arc::new(Barrier::new(5));
    let mut handles = Vec::new();

    for _ in 0..5 {
        let app = app.clone();
        let barrier = Arc::clone(&barrier);

        handles.push(tokio::spawn(async move {
            let game_id = create_game(&app, json!({})).await;
            barrier.wait().await;

            let response = send_request(
                &app,
                Method::POST,
                &format!("/api/games/{}/move", game_id),
                Some(json!({"row": 4, "col": 5})),
            )
            .await;
            response.status()
        }));
    }

    for result in futures::future::join_all(handles).await {
        assert_eq!(result.unwrap(), StatusCode::OK);
    }

    let stats = parse_response_json(send_request(&app, Method::GET, "/api/games/stats", None).await).await;
    assert_eq!(stats["total_sessions"], 5);
    assert_eq!(stats["active_games"], 5);
}
