//! 対局APIハンドラー

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use uuid::Uuid;

use super::dto::{
    CreateGameRequest, ErrorResponse, GameResponse, HintsRequest, MoveHistoryResponse,
    MoveRequest, MoveResponse, SessionListResponse,
};
use super::service::GameService;
use crate::session::SessionStats;

type HandlerError = (StatusCode, Json<ErrorResponse>);

pub async fn create_game(
    State(service): State<Arc<GameService>>,
    request: Option<Json<CreateGameRequest>>,
) -> Result<(StatusCode, Json<GameResponse>), HandlerError> {
    let show_hints = request.and_then(|Json(request)| request.show_hints);
    match service.create_game(show_hints) {
        Ok(response) => Ok((StatusCode::CREATED, Json(response))),
        Err(err) => Err(err.into()),
    }
}

pub async fn get_game(
    State(service): State<Arc<GameService>>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<GameResponse>, HandlerError> {
    service.get_game(game_id).map(Json).map_err(Into::into)
}

pub async fn make_move(
    State(service): State<Arc<GameService>>,
    Path(game_id): Path<Uuid>,
    Json(request): Json<MoveRequest>,
) -> Result<Json<MoveResponse>, HandlerError> {
    service
        .make_move(game_id, request.row, request.col)
        .map(Json)
        .map_err(Into::into)
}

pub async fn restart_game(
    State(service): State<Arc<GameService>>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<GameResponse>, HandlerError> {
    service.restart_game(game_id).map(Json).map_err(Into::into)
}

pub async fn set_hints(
    State(service): State<Arc<GameService>>,
    Path(game_id): Path<Uuid>,
    Json(request): Json<HintsRequest>,
) -> Result<Json<GameResponse>, HandlerError> {
    service
        .set_hints(game_id, request.show_hints)
        .map(Json)
        .map_err(Into::into)
}

pub async fn get_history(
    State(service): State<Arc<GameService>>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<MoveHistoryResponse>, HandlerError> {
    service.get_history(game_id).map(Json).map_err(Into::into)
}

pub async fn delete_game(
    State(service): State<Arc<GameService>>,
    Path(game_id): Path<Uuid>,
) -> Result<StatusCode, HandlerError> {
    match service.delete_game(game_id) {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(err) => Err(err.into()),
    }
}

pub async fn list_sessions(State(service): State<Arc<GameService>>) -> Json<SessionListResponse> {
    let sessions = service.list_sessions();
    let total_count = sessions.len();

    Json(SessionListResponse {
        sessions,
        total_count,
    })
}

pub async fn get_stats(State(service): State<Arc<GameService>>) -> Json<SessionStats> {
    Json(service.get_stats())
}

pub async fn health_check() -> &'static str {
    "Othello API Server is running"
}
