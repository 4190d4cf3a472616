//! 対局セッション管理モジュール
//! 同時に進行する複数の対局を保持し、
//! セッション数制限、タイムアウト処理、クリーンアップを担当する。

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::dto::{ApiError, ApiResult};
use crate::game::{GameState, LegalMove, ReversiRules, TurnOutcome};

/// 1局分のセッション
/// エンジンの状態に、表示設定と直近のターン判定を添えたもの
#[derive(Debug, Clone)]
pub struct GameSession {
    pub id: Uuid,
    pub game: GameState,
    /// 合法手ヒントを描画するか。エンジンの挙動には影響しない
    pub show_hints: bool,
    pub last_outcome: TurnOutcome,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
}

impl GameSession {
    /// 新しい対局を開始し、最初のターン判定まで済ませる
    pub fn new(show_hints: bool) -> Self {
        let id = Uuid::new_v4();
        let mut game = GameState::new_with_id(id);
        let last_outcome = ReversiRules::advance_turn(&mut game);
        let now = Utc::now();

        Self {
            id,
            game,
            show_hints,
            last_outcome,
            created_at: now,
            last_activity_at: now,
        }
    }

    /// 手番側の合法手。終局後は空
    pub fn legal_moves(&self) -> Vec<LegalMove> {
        if self.game.is_active() {
            ReversiRules::legal_moves(&self.game.board, self.game.current_player)
        } else {
            Vec::new()
        }
    }

    pub fn touch(&mut self) {
        self.last_activity_at = Utc::now();
    }
}

/// セッションの管理を行うメイン構造体
/// 各局の更新はDashMapのエントリロック中に行うため、1手ずつ原子的に適用される
#[derive(Debug, Clone)]
pub struct GameSessionManager {
    sessions: Arc<DashMap<Uuid, GameSession>>,
    max_sessions: usize,
    session_timeout_minutes: i64,
}

impl GameSessionManager {
    /// デフォルトタイムアウト（30分）でセッションマネージャーを作成
    pub fn new(max_sessions: usize) -> Self {
        Self::with_timeout(max_sessions, 30)
    }

    /// カスタムタイムアウトでセッションマネージャーを作成
    pub fn with_timeout(max_sessions: usize, timeout_minutes: i64) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            max_sessions,
            session_timeout_minutes: timeout_minutes,
        }
    }

    /// 新しいセッションを作成する
    /// 最大セッション数に達している場合はエラーを返す
    pub fn create_session(&self, show_hints: bool) -> ApiResult<GameSession> {
        if self.sessions.len() >= self.max_sessions {
            return Err(ApiError::MaxSessionsReached { max: self.max_sessions });
        }

        let session = GameSession::new(show_hints);
        self.sessions.insert(session.id, session.clone());

        // 同時作成で上限を超えた場合は自分の挿入を取り消す
        if self.sessions.len() > self.max_sessions {
            self.sessions.remove(&session.id);
            return Err(ApiError::MaxSessionsReached { max: self.max_sessions });
        }

        tracing::info!(game_id = %session.id, show_hints, "session created");
        Ok(session)
    }

    /// 指定したIDのセッションのスナップショットを取得する
    pub fn get_session(&self, session_id: &Uuid) -> ApiResult<GameSession> {
        match self.sessions.get(session_id) {
            Some(session) => Ok(session.clone()),
            None => Err(ApiError::GameNotFound { game_id: *session_id }),
        }
    }

    /// セッションを排他的に更新する
    /// クロージャが成功した場合のみ最終操作時刻を更新する
    pub fn with_session_mut<R>(
        &self,
        session_id: &Uuid,
        f: impl FnOnce(&mut GameSession) -> ApiResult<R>,
    ) -> ApiResult<R> {
        match self.sessions.get_mut(session_id) {
            Some(mut session) => {
                let result = f(session.value_mut())?;
                session.touch();
                Ok(result)
            }
            None => Err(ApiError::GameNotFound { game_id: *session_id }),
        }
    }

    pub fn remove_session(&self, session_id: &Uuid) -> ApiResult<GameSession> {
        match self.sessions.remove(session_id) {
            Some((_, session)) => {
                tracing::info!(game_id = %session_id, "session removed");
                Ok(session)
            }
            None => Err(ApiError::GameNotFound { game_id: *session_id }),
        }
    }

    pub fn list_sessions(&self) -> Vec<GameSession> {
        self.sessions.iter().map(|entry| entry.value().clone()).collect()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn session_exists(&self, session_id: &Uuid) -> bool {
        self.sessions.contains_key(session_id)
    }

    /// タイムアウトを過ぎたセッションを削除し、削除数を返す
    /// 期限を計算できないほど長いタイムアウトでは何も削除しない
    pub fn cleanup_inactive_sessions(&self) -> usize {
        let cutoff_time = match Duration::try_minutes(self.session_timeout_minutes)
            .and_then(|timeout| Utc::now().checked_sub_signed(timeout))
        {
            Some(cutoff_time) => cutoff_time,
            None => return 0,
        };
        let before = self.sessions.len();

        self.sessions
            .retain(|_, session| session.last_activity_at >= cutoff_time);

        let removed_count = before.saturating_sub(self.sessions.len());
        if removed_count > 0 {
            tracing::info!(removed_count, "inactive sessions cleaned up");
        }
        removed_count
    }

    pub fn get_stats(&self) -> SessionStats {
        let total_sessions = self.sessions.len();
        let finished_games = self
            .sessions
            .iter()
            .filter(|entry| entry.value().game.is_finished())
            .count();

        SessionStats {
            total_sessions,
            max_sessions: self.max_sessions,
            active_games: total_sessions.saturating_sub(finished_games),
            finished_games,
        }
    }
}

impl Default for GameSessionManager {
    fn default() -> Self {
        Self::new(100)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionStats {
    pub total_sessions: usize,
    pub max_sessions: usize,
    pub active_games: usize,
    pub finished_games: usize,
}
