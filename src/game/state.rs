//! ゲーム状態管理モジュール
//! 盤面、手番、進行中フラグ、直前の着手などゲーム全体の状態を保持する。
//! グローバルな盤面は持たず、コントローラが1つのGameStateを所有する。

use super::board::Board;
use super::types::{GameResult, Move, Player, Position, Score};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// オセロ1局分の全体状態
/// 盤面の変更はルール側（ReversiRules）の着手適用とパス処理のみが行う
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub id: Uuid,
    pub board: Board,
    pub current_player: Player,
    /// 両者とも合法手がなくなった時点でfalse
    pub active: bool,
    /// 表示のハイライト用。ルールでは使わない
    pub last_move: Option<Position>,
    pub move_history: Vec<Move>,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl GameState {
    /// 初期配置・黒番で新しいゲームを作成する
    pub fn new() -> Self {
        Self::new_with_id(Uuid::new_v4())
    }

    /// 指定IDで新しいゲーム状態を作成する
    pub fn new_with_id(id: Uuid) -> Self {
        Self::from_board(id, Board::new(), Player::Black)
    }

    /// 任意の局面からゲームを作成する
    /// 検証用の局面や途中局面の再現に使う
    pub fn from_board(id: Uuid, board: Board, current_player: Player) -> Self {
        let now = Utc::now();
        Self {
            id,
            board,
            current_player,
            active: true,
            last_move: None,
            move_history: Vec::new(),
            created_at: now,
            last_updated: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_finished(&self) -> bool {
        !self.active
    }

    /// 現在のプレイヤーを交代する
    /// 着手後やパス時に呼び出される
    pub fn switch_player(&mut self) {
        self.current_player = self.current_player.opposite();
        self.last_updated = Utc::now();
    }

    /// 手の履歴に新しい手を追加し、直前の着手を更新する
    pub fn add_move(&mut self, game_move: Move) {
        self.last_move = Some(game_move.position);
        self.move_history.push(game_move);
        self.last_updated = Utc::now();
    }

    /// ゲームを終了させる
    pub fn finish(&mut self) {
        self.active = false;
        self.last_updated = Utc::now();
    }

    /// 現在のスコア
    pub fn score(&self) -> Score {
        self.board.count_pieces()
    }

    /// 終局していれば最終結果を返す
    pub fn result(&self) -> Option<GameResult> {
        if self.active {
            None
        } else {
            Some(GameResult::from(self.score()))
        }
    }

    /// IDと作成時刻を保ったまま初期配置に戻す
    pub fn restart(&mut self) {
        self.board = Board::new();
        self.current_player = Player::Black;
        self.active = true;
        self.last_move = None;
        self.move_history.clear();
        self.last_updated = Utc::now();
    }

    /// これまでの手数を取得する
    pub fn get_move_count(&self) -> usize {
        self.move_history.len()
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
