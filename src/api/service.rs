//! 対局サービス
//! セッション管理とエンジンを結び、HTTPハンドラーから呼ばれる操作を提供する。

use std::sync::Arc;
use uuid::Uuid;

use super::dto::{
    validate_position, ApiError, ApiResult, GameResponse, MoveHistoryResponse, MoveResponse,
    SessionSummary,
};
use crate::config::Config;
use crate::game::{ReversiRules, TurnOutcome};
use crate::session::{GameSessionManager, SessionStats};

#[derive(Debug, Clone)]
pub struct GameService {
    sessions: Arc<GameSessionManager>,
    default_show_hints: bool,
}

impl GameService {
    pub fn new(sessions: Arc<GameSessionManager>, default_show_hints: bool) -> Self {
        Self {
            sessions,
            default_show_hints,
        }
    }

    /// 設定からセッション管理ごと組み立てる
    pub fn from_config(config: &Config) -> Self {
        let sessions = Arc::new(GameSessionManager::with_timeout(
            config.sessions.max_sessions,
            config.sessions.session_timeout_minutes,
        ));
        Self::new(sessions, config.display.show_hints)
    }

    pub fn sessions(&self) -> &Arc<GameSessionManager> {
        &self.sessions
    }

    pub fn create_game(&self, show_hints: Option<bool>) -> ApiResult<GameResponse> {
        let session = self
            .sessions
            .create_session(show_hints.unwrap_or(self.default_show_hints))?;
        Ok(GameResponse::from_session(&session))
    }

    pub fn get_game(&self, game_id: Uuid) -> ApiResult<GameResponse> {
        let session = self.sessions.get_session(&game_id)?;
        Ok(GameResponse::from_session(&session))
    }

    /// 手番側のプレイヤーとして着手し、続けてターン判定を行う
    /// パスになった場合は新しい手番側でもう一度判定する
    pub fn make_move(&self, game_id: Uuid, row: usize, col: usize) -> ApiResult<MoveResponse> {
        let position = validate_position(row, col).map_err(|details| ApiError::BadRequest { details })?;

        self.sessions.with_session_mut(&game_id, |session| {
            let player = session.game.current_player;
            let player_move = ReversiRules::apply_move(&mut session.game, position, player)?;

            let mut outcome = ReversiRules::advance_turn(&mut session.game);
            if let TurnOutcome::Pass { .. } = outcome {
                if let over @ TurnOutcome::GameOver { .. } = ReversiRules::advance_turn(&mut session.game) {
                    outcome = over;
                }
            }
            session.last_outcome = outcome;

            Ok(MoveResponse {
                success: true,
                player_move,
                outcome,
                message: outcome.message(),
                game_state: GameResponse::from_session(session),
            })
        })
    }

    /// 同じセッションIDのまま初期局面からやり直す
    pub fn restart_game(&self, game_id: Uuid) -> ApiResult<GameResponse> {
        self.sessions.with_session_mut(&game_id, |session| {
            session.game.restart();
            session.last_outcome = ReversiRules::advance_turn(&mut session.game);
            tracing::info!(game_id = %game_id, "game restarted");
            Ok(GameResponse::from_session(session))
        })
    }

    pub fn set_hints(&self, game_id: Uuid, show_hints: bool) -> ApiResult<GameResponse> {
        self.sessions.with_session_mut(&game_id, |session| {
            session.show_hints = show_hints;
            Ok(GameResponse::from_session(session))
        })
    }

    pub fn get_history(&self, game_id: Uuid) -> ApiResult<MoveHistoryResponse> {
        let session = self.sessions.get_session(&game_id)?;
        let moves = session.game.move_history;
        Ok(MoveHistoryResponse {
            game_id,
            total_moves: moves.len(),
            moves,
        })
    }

    pub fn delete_game(&self, game_id: Uuid) -> ApiResult<()> {
        self.sessions.remove_session(&game_id).map(|_| ())
    }

    pub fn list_sessions(&self) -> Vec<SessionSummary> {
        self.sessions
            .list_sessions()
            .iter()
            .map(SessionSummary::from_session)
            .collect()
    }

    pub fn get_stats(&self) -> SessionStats {
        self.sessions.get_stats()
    }

    pub fn cleanup_inactive_sessions(&self) -> usize {
        self.sessions.cleanup_inactive_sessions()
    }
}

impl Default for GameService {
    fn default() -> Self {
        Self::new(Arc::new(GameSessionManager::default()), true)
    }
}
