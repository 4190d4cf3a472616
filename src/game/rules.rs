//! オセロのルールとゲームロジック実装モジュール
//! 合法手の列挙、石の裏返し、パス判定、終局判定を担当する。

use super::board::Board;
use super::state::GameState;
use super::types::{GameResult, LegalMove, Move, Player, Position, TurnOutcome};
use crate::error::{GameError, Result};

/// 盤面上の8方向への移動ベクトル
const DIRECTIONS: [(isize, isize); 8] = [
    (-1, -1), (-1, 0), (-1, 1),  // 左上、上、右上
    (0, -1),           (0, 1),   // 左、右
    (1, -1),  (1, 0),  (1, 1),   // 左下、下、右下
];

/// オセロのルールを実装する構造体
/// スタティックメソッドのみを提供する
pub struct ReversiRules;

impl ReversiRules {
    /// 指定した位置に石を置いた場合に裏返る石の位置を返す
    /// 空マスでない、または盤外の場合は空
    pub fn captured_discs(board: &Board, position: Position, player: Player) -> Vec<Position> {
        if !board.is_cell_empty(position) {
            return Vec::new();
        }

        let player_cell = player.to_cell();
        let opponent_cell = player.opposite().to_cell();
        let mut captured = Vec::new();

        for &(dr, dc) in &DIRECTIONS {
            let mut run = Vec::new();
            let mut cursor = position.step(dr, dc);

            // 相手の石が続く間進み、自分の石で挟めたら確定
            while let Some(current) = cursor {
                match board.get_cell(current) {
                    Some(cell) if cell == opponent_cell => run.push(current),
                    Some(cell) if cell == player_cell => {
                        captured.append(&mut run);
                        break;
                    }
                    _ => break,
                }
                cursor = current.step(dr, dc);
            }
        }

        // 方向ごとの列は互いに素だが、順序は行優先にそろえる
        captured.sort();
        captured.dedup();
        captured
    }

    /// 指定位置が合法手ならその情報を返す
    pub fn find_legal_move(board: &Board, position: Position, player: Player) -> Option<LegalMove> {
        let captured = Self::captured_discs(board, position, player);
        if captured.is_empty() {
            None
        } else {
            Some(LegalMove { position, captured })
        }
    }

    /// 指定した位置にプレイヤーが置けるかチェックする
    pub fn is_legal_move(board: &Board, position: Position, player: Player) -> bool {
        !Self::captured_discs(board, position, player).is_empty()
    }

    /// 指定したプレイヤーの合法手を行優先で全て取得する
    /// 副作用なし。何度呼んでも同じ結果を返す
    pub fn legal_moves(board: &Board, player: Player) -> Vec<LegalMove> {
        Board::positions()
            .filter_map(|position| Self::find_legal_move(board, position, player))
            .collect()
    }

    /// 指定したプレイヤーに合法手があるかチェックする
    pub fn has_legal_moves(board: &Board, player: Player) -> bool {
        Board::positions().any(|position| Self::is_legal_move(board, position, player))
    }

    /// 両プレイヤーとも合法手がないか
    pub fn is_game_over(board: &Board) -> bool {
        !Self::has_legal_moves(board, Player::Black) && !Self::has_legal_moves(board, Player::White)
    }

    /// 石数の多い方を勝者とする。同数の場合はNone（引き分け）
    pub fn determine_winner(board: &Board) -> Option<Player> {
        board.count_pieces().winner()
    }

    /// 着手を適用する
    /// 石を置き、挟んだ石を裏返し、直前の着手を記録して手番を相手に渡す。
    /// 合法でない場合はIllegalMoveを返し、状態には一切触れない
    pub fn apply_move(game_state: &mut GameState, position: Position, player: Player) -> Result<Move> {
        let legal = match Self::check_move(game_state, position, player) {
            Ok(legal) => legal,
            Err(err) => {
                tracing::warn!(game_id = %game_state.id, %err, "rejected move");
                return Err(err);
            }
        };

        let cell = player.to_cell();
        game_state.board.set_cell(legal.position, cell);
        for &flip in &legal.captured {
            game_state.board.set_cell(flip, cell);
        }

        let game_move = Move::new(player, legal.position, legal.captured);
        game_state.add_move(game_move.clone());
        game_state.switch_player();

        tracing::debug!(
            game_id = %game_state.id,
            player = ?player,
            position = %position,
            flipped = game_move.flipped.len(),
            "move applied"
        );

        Ok(game_move)
    }

    /// 着手の合法性を検証し、合法なら裏返る石を含めて返す
    fn check_move(game_state: &GameState, position: Position, player: Player) -> Result<LegalMove> {
        if !game_state.active {
            return Err(GameError::illegal(position, player, "game is already over"));
        }
        if player != game_state.current_player {
            return Err(GameError::illegal(
                position,
                player,
                format!("it is {:?}'s turn", game_state.current_player),
            ));
        }
        if !position.is_valid() {
            return Err(GameError::illegal(position, player, "position is out of range"));
        }
        if !game_state.board.is_cell_empty(position) {
            return Err(GameError::illegal(position, player, "cell is occupied"));
        }

        Self::find_legal_move(&game_state.board, position, player)
            .ok_or_else(|| GameError::illegal(position, player, "move captures nothing"))
    }

    /// ターン進行の判定を行う
    /// 開始時と着手の後に必ず呼び出す。
    /// - 現在のプレイヤーに合法手あり: Normal（変更なし）
    /// - 相手にも合法手なし: GameOver（active = false）
    /// - 相手にのみ合法手あり: Pass（手番だけ交代、盤面は変更しない）
    pub fn advance_turn(game_state: &mut GameState) -> TurnOutcome {
        if !game_state.active {
            return TurnOutcome::GameOver {
                result: GameResult::from(game_state.score()),
            };
        }

        let current = game_state.current_player;
        if Self::has_legal_moves(&game_state.board, current) {
            return TurnOutcome::Normal;
        }

        if !Self::has_legal_moves(&game_state.board, current.opposite()) {
            game_state.finish();
            let result = GameResult::from(game_state.score());
            tracing::debug!(
                game_id = %game_state.id,
                black = result.black_count,
                white = result.white_count,
                winner = ?result.winner,
                "game over"
            );
            return TurnOutcome::GameOver { result };
        }

        game_state.switch_player();
        tracing::debug!(game_id = %game_state.id, passed = ?current, "pass");
        TurnOutcome::Pass { passed: current }
    }
}
