//! ゲームの基本型定義モジュール
//! オセロで使用される石の色、座標、合法手、ターン結果などを定義する。

use serde::{Deserialize, Serialize};

/// 盤面の一辺のマス数
pub const BOARD_SIZE: usize = 8;

/// 盤面の各マスの状態を表現するenum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Black,
    White,
}

impl Cell {
    /// 石が置かれていればその持ち主を返す
    pub fn owner(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Black => Some(Player::Black),
            Cell::White => Some(Player::White),
        }
    }
}

/// ゲームのプレイヤーを表すenum
/// 先手は黒、後手は白
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    Black,
    White,
}

impl Player {
    /// 相手プレイヤーを返す
    pub fn opposite(self) -> Player {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }

    /// プレイヤーを対応するセル状態に変換する
    pub fn to_cell(self) -> Cell {
        match self {
            Player::Black => Cell::Black,
            Player::White => Cell::White,
        }
    }

    /// 表示用の名前
    pub fn label(self) -> &'static str {
        match self {
            Player::Black => "黒",
            Player::White => "白",
        }
    }
}

/// 8x8盤面上の座標を表す構造体
/// row, colともに0-7の範囲で有効
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    /// 範囲チェック付きのコンストラクタ
    /// 盤面の範囲外の座標の場合はNoneを返す
    pub fn new(row: usize, col: usize) -> Option<Position> {
        if row < BOARD_SIZE && col < BOARD_SIZE {
            Some(Position { row, col })
        } else {
            None
        }
    }

    /// 座標が有効範囲内かチェックする
    pub fn is_valid(&self) -> bool {
        self.row < BOARD_SIZE && self.col < BOARD_SIZE
    }

    /// 指定方向に1マス進んだ座標を返す。盤外に出る場合はNone
    pub fn step(self, dr: isize, dc: isize) -> Option<Position> {
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        Position::new(row, col)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// 合法手1つ分の情報
/// 着手位置と、その手で裏返る石の位置（重複なし、行優先順）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalMove {
    pub position: Position,
    pub captured: Vec<Position>,
}

/// 実行された1手の記録
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub player: Player,
    pub position: Position,
    pub flipped: Vec<Position>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl Move {
    /// 新しい手を作成する
    /// タイムスタンプは現在時刻で自動設定される
    pub fn new(player: Player, position: Position, flipped: Vec<Position>) -> Self {
        Self {
            player,
            position,
            flipped,
            timestamp: chrono::Utc::now(),
        }
    }
}

/// 盤面上の石数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub black: u8,
    pub white: u8,
}

impl Score {
    /// 石数の多い方を勝者とする。同数ならNone（引き分け）
    pub fn winner(&self) -> Option<Player> {
        match self.black.cmp(&self.white) {
            std::cmp::Ordering::Greater => Some(Player::Black),
            std::cmp::Ordering::Less => Some(Player::White),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn total(&self) -> u8 {
        self.black + self.white
    }
}

/// 終局時の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub black_count: u8,
    pub white_count: u8,
    pub winner: Option<Player>,
}

impl From<Score> for GameResult {
    fn from(score: Score) -> Self {
        Self {
            black_count: score.black,
            white_count: score.white,
            winner: score.winner(),
        }
    }
}

impl GameResult {
    /// 結果表示用のメッセージ
    pub fn message(&self) -> String {
        match self.winner {
            Some(player) => format!("{}の勝ち! ({} - {})", player.label(), self.black_count, self.white_count),
            None => format!("引き分け! ({} - {})", self.black_count, self.white_count),
        }
    }
}

/// ターン進行判定の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TurnOutcome {
    /// 現在のプレイヤーに合法手がある
    Normal,
    /// `passed` が打てる場所がなくパスした
    Pass { passed: Player },
    /// 両者とも合法手がなく終局
    GameOver { result: GameResult },
}

impl TurnOutcome {
    /// プレゼンテーション層向けのメッセージ。通常進行ならNone
    pub fn message(&self) -> Option<String> {
        match self {
            TurnOutcome::Normal => None,
            TurnOutcome::Pass { passed } => {
                Some(format!("{}は置ける場所がありません。パスします。", passed.label()))
            }
            TurnOutcome::GameOver { result } => Some(result.message()),
        }
    }
}
