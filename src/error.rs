//! エンジンのエラー定義モジュール
//! 盤面ルールが呼び出し側に返す唯一のエラー条件を定義する。

use thiserror::Error;

use crate::game::{Player, Position};

/// ゲームロジックに関連するエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// 合法手集合に含まれない位置への着手
    /// 状態は一切変更されない
    #[error("Illegal move at {position} for {player:?}: {reason}")]
    IllegalMove {
        position: Position,
        player: Player,
        reason: String,
    },
}

impl GameError {
    pub(crate) fn illegal(position: Position, player: Player, reason: impl Into<String>) -> Self {
        GameError::IllegalMove {
            position,
            player,
            reason: reason.into(),
        }
    }
}

/// ゲームエラーをベースとした結果型
pub type Result<T> = std::result::Result<T, GameError>;
