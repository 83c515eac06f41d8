//! 對局狀態：棋盤、輪到誰、半步計數與終局判定

use crate::alias::PlyCount;
use crate::component::{Color, DrawKind, Move, Position};
use crate::constants::FIFTY_MOVE_LIMIT;
use crate::error::{MoveError, Result};
use crate::logic::apply::{MoveOutcome, apply_move};
use crate::logic::board::ChessBoard;
use crate::logic::movement::{has_any_legal_move, legal_destinations};
use crate::logic::status::{is_in_check, is_insufficient_material};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// 對局結果，任何時刻恰好一種成立
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    Checkmate { winner: Color },
    Draw { kind: DrawKind },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub board: ChessBoard,
    pub current_turn: Color,
    /// 已完成的半步數
    pub move_count: PlyCount,
    /// 距離上次吃子或兵移動的半步數
    pub halfmove_clock: PlyCount,
    pub in_check: bool,
    pub status: GameStatus,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// 標準開局，白方先走
    pub fn new() -> Self {
        Self::from_board(ChessBoard::standard(), Color::White)
    }

    pub fn from_board(board: ChessBoard, current_turn: Color) -> Self {
        let mut state = Self {
            board,
            current_turn,
            move_count: 0,
            halfmove_clock: 0,
            in_check: false,
            status: GameStatus::InProgress,
        };
        state.refresh_status();
        state
    }

    pub fn is_over(&self) -> bool {
        self.status != GameStatus::InProgress
    }

    pub fn is_checkmate(&self) -> bool {
        matches!(self.status, GameStatus::Checkmate { .. })
    }

    pub fn is_stalemate(&self) -> bool {
        self.status
            == GameStatus::Draw {
                kind: DrawKind::Stalemate,
            }
    }

    /// 指定棋子的合法目的地
    pub fn legal_moves(&self, from: Position) -> Result<BTreeSet<Position>> {
        if self.board.get(from).is_none() {
            return Err(MoveError::NoPieceAt { pos: from }.into());
        }
        Ok(legal_destinations(&self.board, from))
    }

    /// 檢查對局未結束、起點有棋子且輪到該棋子
    pub fn ensure_can_move(&self, mv: Move) -> Result<()> {
        if self.is_over() {
            return Err(MoveError::GameFinished.into());
        }
        let piece = self
            .board
            .get(mv.from)
            .ok_or(MoveError::NoPieceAt { pos: mv.from })?;
        if piece.color != self.current_turn {
            return Err(MoveError::WrongTurn {
                expected: self.current_turn,
                found: piece.color,
                pos: mv.from,
            }
            .into());
        }
        Ok(())
    }

    /// 走一步，回傳新狀態；原狀態不變
    pub fn submit_move(&self, mv: Move) -> Result<(GameState, MoveOutcome)> {
        self.ensure_can_move(mv)?;
        let (board, outcome) = apply_move(&self.board, mv)?;
        let next = self.record_ply(board, outcome.resets_halfmove_clock());
        debug!(
            mv = %outcome.mv,
            turn = %self.current_turn,
            capture = outcome.is_capture(),
            status = ?next.status,
            "accepted move"
        );
        Ok((next, outcome))
    }

    /// 以處理過的棋盤完成一個半步：換邊、計數並重新判定終局
    ///
    /// 供上層在棋盤效果或戰鬥改動棋盤後提交
    pub fn record_ply(&self, board: ChessBoard, reset_clock: bool) -> GameState {
        let mut next = GameState {
            board,
            current_turn: self.current_turn.opponent(),
            move_count: self.move_count + 1,
            halfmove_clock: if reset_clock {
                0
            } else {
                self.halfmove_clock + 1
            },
            in_check: false,
            status: GameStatus::InProgress,
        };
        next.refresh_status();
        next
    }

    /// 替換棋盤（例如改變大小），不算一個半步
    pub fn with_board(&self, board: ChessBoard) -> GameState {
        let mut next = GameState {
            board,
            ..self.clone()
        };
        next.refresh_status();
        next
    }

    fn refresh_status(&mut self) {
        let turn = self.current_turn;
        self.in_check = is_in_check(&self.board, turn);
        self.status = if !has_any_legal_move(&self.board, turn) {
            if self.in_check {
                GameStatus::Checkmate {
                    winner: turn.opponent(),
                }
            } else {
                GameStatus::Draw {
                    kind: DrawKind::Stalemate,
                }
            }
        } else if is_insufficient_material(&self.board) {
            GameStatus::Draw {
                kind: DrawKind::InsufficientMaterial,
            }
        } else if self.halfmove_clock >= FIFTY_MOVE_LIMIT {
            GameStatus::Draw {
                kind: DrawKind::FiftyMoveRule,
            }
        } else {
            GameStatus::InProgress
        };
    }
}
