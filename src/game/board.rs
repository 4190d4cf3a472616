//! オセロの盤面状態を管理するモジュール
//! 8x8グリッドの盤面と石の配置、集計、文字列表現を担当する。

use std::str::FromStr;

use super::types::{Cell, Position, Score, BOARD_SIZE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 8x8盤面を表現する構造体
/// 各マスのCell状態を保持し、盤面操作を提供する
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

/// 文字列から盤面を組み立てる際のエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardParseError {
    #[error("Unexpected symbol '{symbol}' at index {index}")]
    UnexpectedSymbol { symbol: char, index: usize },

    #[error("Expected 64 cells, found {found}")]
    WrongCellCount { found: usize },
}

impl Board {
    /// 標準の初期配置で盤面を作成する
    /// 中央の2x2に白黒を対角に配置する
    pub fn new() -> Self {
        let mut board = Self::empty();
        let mid = BOARD_SIZE / 2;

        board.cells[mid - 1][mid - 1] = Cell::White;
        board.cells[mid][mid] = Cell::White;
        board.cells[mid - 1][mid] = Cell::Black;
        board.cells[mid][mid - 1] = Cell::Black;

        board
    }

    /// 全マス空の盤面
    pub fn empty() -> Self {
        Board {
            cells: [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// 指定した位置のセル状態を取得する
    /// 範囲外の場合はNoneを返す
    pub fn get_cell(&self, position: Position) -> Option<Cell> {
        if position.is_valid() {
            Some(self.cells[position.row][position.col])
        } else {
            None
        }
    }

    /// 指定した位置にセル状態を設定する
    /// 範囲外の場合はfalseを返す
    pub fn set_cell(&mut self, position: Position, cell: Cell) -> bool {
        if position.is_valid() {
            self.cells[position.row][position.col] = cell;
            true
        } else {
            false
        }
    }

    /// 指定した位置が空かチェックする
    pub fn is_cell_empty(&self, position: Position) -> bool {
        matches!(self.get_cell(position), Some(Cell::Empty))
    }

    /// 行ごとのセル配列
    pub fn rows(&self) -> &[[Cell; BOARD_SIZE]; BOARD_SIZE] {
        &self.cells
    }

    /// 盤面上の座標を行優先で列挙する
    pub fn positions() -> impl Iterator<Item = Position> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Position { row, col }))
    }

    /// 盤面上の黒石と白石の数を数える
    pub fn count_pieces(&self) -> Score {
        let mut score = Score { black: 0, white: 0 };

        for row in &self.cells {
            for &cell in row {
                match cell {
                    Cell::Black => score.black += 1,
                    Cell::White => score.white += 1,
                    Cell::Empty => {}
                }
            }
        }

        score
    }

    /// 空きマスの数
    pub fn empty_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|&&cell| cell == Cell::Empty)
            .count()
    }

    /// デバッグ用の盤面表示文字列を生成する
    /// ●で黒、○で白、.で空マスを表現
    pub fn display(&self) -> String {
        let mut result = String::new();
        result.push_str("  0 1 2 3 4 5 6 7\n");

        for (row_idx, row) in self.cells.iter().enumerate() {
            result.push_str(&format!("{} ", row_idx));
            for &cell in row {
                result.push_str(&format!("{} ", cell_symbol(cell)));
            }
            result.push('\n');
        }

        result
    }
}

fn cell_symbol(cell: Cell) -> char {
    match cell {
        Cell::Empty => '.',
        Cell::Black => '●',
        Cell::White => '○',
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// 64個の記号から盤面を組み立てる。空白は無視する
/// 黒: `B` `X` `●`、白: `W` `O` `○`、空: `.` `-`
impl FromStr for Board {
    type Err = BoardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut board = Board::empty();
        let mut count = 0;

        for (index, symbol) in s.chars().filter(|c| !c.is_whitespace()).enumerate() {
            let cell = match symbol {
                'B' | 'b' | 'X' | 'x' | '●' => Cell::Black,
                'W' | 'w' | 'O' | 'o' | '○' => Cell::White,
                '.' | '-' => Cell::Empty,
                _ => return Err(BoardParseError::UnexpectedSymbol { symbol, index }),
            };
            if index < BOARD_SIZE * BOARD_SIZE {
                board.cells[index / BOARD_SIZE][index % BOARD_SIZE] = cell;
            }
            count += 1;
        }

        if count != BOARD_SIZE * BOARD_SIZE {
            return Err(BoardParseError::WrongCellCount { found: count });
        }

        Ok(board)
    }
}
