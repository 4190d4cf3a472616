//! 対局API データ転送オブジェクト (DTO)
//! リクエスト/レスポンスの型と、HTTPステータスに対応付けたAPIエラーを定義する。

use axum::{http::StatusCode, response::Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::GameError;
use crate::game::{GameResult, LegalMove, Move, Player, Position, TurnOutcome};
use crate::session::GameSession;

pub fn validate_position(row: usize, col: usize) -> Result<Position, String> {
    Position::new(row, col)
        .ok_or_else(|| format!("座標が範囲外です: ({}, {}). 有効範囲: 0-7", row, col))
}

#[derive(Debug, Deserialize)]
pub struct CreateGameRequest {
    #[serde(default)]
    pub show_hints: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Deserialize)]
pub struct HintsRequest {
    pub show_hints: bool,
}

/// 描画側に渡す局面全体
#[derive(Debug, Serialize)]
pub struct GameResponse {
    pub game_id: Uuid,
    pub board: Vec<Vec<Option<Player>>>,
    pub current_player: Player,
    pub active: bool,
    pub last_move: Option<Position>,
    pub black_count: u8,
    pub white_count: u8,
    /// 手番側の合法手。終局後は空
    pub legal_moves: Vec<LegalMove>,
    pub show_hints: bool,
    /// ヒント表示がオンのときだけ合法手の位置を入れる
    pub hints: Vec<Position>,
    pub last_outcome: TurnOutcome,
    pub message: Option<String>,
    pub result: Option<GameResult>,
    pub move_count: u32,
}

impl GameResponse {
    pub fn from_session(session: &GameSession) -> Self {
        let game = &session.game;

        let board: Vec<Vec<Option<Player>>> = game
            .board
            .rows()
            .iter()
            .map(|row| row.iter().map(|cell| cell.owner()).collect())
            .collect();

        let legal_moves = session.legal_moves();
        let hints = if session.show_hints {
            legal_moves.iter().map(|legal| legal.position).collect()
        } else {
            Vec::new()
        };

        let score = game.score();

        Self {
            game_id: session.id,
            board,
            current_player: game.current_player,
            active: game.active,
            last_move: game.last_move,
            black_count: score.black,
            white_count: score.white,
            legal_moves,
            show_hints: session.show_hints,
            hints,
            last_outcome: session.last_outcome,
            message: session.last_outcome.message(),
            result: game.result(),
            move_count: game.get_move_count() as u32,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MoveResponse {
    pub success: bool,
    pub player_move: Move,
    pub outcome: TurnOutcome,
    pub message: Option<String>,
    pub game_state: GameResponse,
}

#[derive(Debug, Serialize)]
pub struct SessionSummary {
    pub game_id: Uuid,
    pub active: bool,
    pub current_player: Player,
    pub black_count: u8,
    pub white_count: u8,
    pub move_count: u32,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
}

impl SessionSummary {
    pub fn from_session(session: &GameSession) -> Self {
        let score = session.game.score();
        Self {
            game_id: session.id,
            active: session.game.active,
            current_player: session.game.current_player,
            black_count: score.black,
            white_count: score.white,
            move_count: session.game.get_move_count() as u32,
            created_at: session.created_at,
            last_activity_at: session.last_activity_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionListResponse {
    pub sessions: Vec<SessionSummary>,
    pub total_count: usize,
}

#[derive(Debug, Serialize)]
pub struct MoveHistoryResponse {
    pub game_id: Uuid,
    pub moves: Vec<Move>,
    pub total_moves: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub error_code: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            timestamp: Utc::now(),
            error_code: None,
        }
    }

    pub fn with_code(error: impl Into<String>, message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            timestamp: Utc::now(),
            error_code: Some(code.into()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("ゲームセッションが見つかりません: {game_id}")]
    GameNotFound { game_id: Uuid },

    #[error("無効な着手です: {0}")]
    IllegalMove(#[from] GameError),

    #[error("セッション制限に達しています (最大: {max})")]
    MaxSessionsReached { max: usize },

    #[error("無効なリクエストです: {details}")]
    BadRequest { details: String },
}

impl ApiError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::GameNotFound { .. } => "GAME_NOT_FOUND",
            ApiError::IllegalMove(_) => "ILLEGAL_MOVE",
            ApiError::MaxSessionsReached { .. } => "MAX_SESSIONS_REACHED",
            ApiError::BadRequest { .. } => "BAD_REQUEST",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::GameNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::IllegalMove(_) => StatusCode::BAD_REQUEST,
            ApiError::MaxSessionsReached { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<ApiError> for (StatusCode, Json<ErrorResponse>) {
    fn from(err: ApiError) -> Self {
        let status_code = err.status_code();
        let error_response = ErrorResponse::with_code(
            err.error_code(),
            err.to_string(),
            err.error_code(),
        );

        (status_code, Json(error_response))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
