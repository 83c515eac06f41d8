//! 套用走法，產生新棋盤

use crate::component::{CastleSide, Color, Move, Piece, PieceKind, Position};
use crate::error::{MoveError, Result};
use crate::logic::board::ChessBoard;
use crate::logic::movement::{castle_rook_square, en_passant_victim, validate_move};
use serde::{Deserialize, Serialize};

/// 一步走法造成的變化，供上層同步自己的索引
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    /// 實際執行的走法（已補上升變）
    pub mv: Move,
    /// 走完後的棋子
    pub moved: Piece,
    /// 被吃的棋子與其原位置（過路兵時不等於 `mv.to`）
    pub captured: Option<(Position, Piece)>,
    /// 入堡時城堡的起點與終點
    pub castle_rook: Option<(Position, Position)>,
    pub promoted_to: Option<PieceKind>,
}

impl MoveOutcome {
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// 是否重置五十步計數
    pub fn resets_halfmove_clock(&self) -> bool {
        self.is_capture() || self.moved.kind == PieceKind::Pawn || self.promoted_to.is_some()
    }
}

/// 驗證並套用走法，回傳新棋盤；原棋盤不變
pub fn apply_move(board: &ChessBoard, mv: Move) -> Result<(ChessBoard, MoveOutcome)> {
    let mv = validate_move(board, mv)?;
    apply_unchecked(board, mv).ok_or_else(|| MoveError::NoPieceAt { pos: mv.from }.into())
}

/// 不做合法性檢查直接套用；起點沒有棋子時回傳 None
pub(crate) fn apply_unchecked(board: &ChessBoard, mv: Move) -> Option<(ChessBoard, MoveOutcome)> {
    let mut next = board.clone();
    let mut piece = next.remove(mv.from)?;
    let color = piece.color;
    next.clear_en_passant();

    let captured = match en_passant_victim(board, mv.from, mv.to, color) {
        Some(victim) if piece.kind == PieceKind::Pawn => {
            next.remove(victim).map(|p| (victim, p))
        }
        _ => next.remove(mv.to).map(|p| (mv.to, p)),
    };

    // 入堡權：國王移動撤銷兩側，未移動的城堡移動或被吃撤銷該側
    if piece.kind == PieceKind::King {
        next.castling.revoke_all(color);
    }
    if piece.kind == PieceKind::Rook && !piece.has_moved {
        next.castling.revoke(color, rook_side(board, mv.from, color));
    }
    if let Some((pos, taken)) = captured {
        if taken.kind == PieceKind::Rook && !taken.has_moved {
            next.castling
                .revoke(taken.color, rook_side(board, pos, taken.color));
        }
    }

    let mut castle_rook = None;
    if piece.kind == PieceKind::King && mv.from.col.abs_diff(mv.to.col) == 2 {
        let side = if mv.to.col > mv.from.col {
            CastleSide::Kingside
        } else {
            CastleSide::Queenside
        };
        if let (Some(rook_from), Some(rook_to)) = (
            castle_rook_square(board, mv.from, side),
            mv.from.offset(0, side.direction()),
        ) {
            if let Some(mut rook) = next.remove(rook_from) {
                rook.has_moved = true;
                if next.place(rook_to, rook).is_ok() {
                    castle_rook = Some((rook_from, rook_to));
                }
            }
        }
    }

    if piece.kind == PieceKind::Pawn && mv.from.row.abs_diff(mv.to.row) == 2 {
        piece.is_en_passant_target = true;
        next.en_passant = Some(Position::new((mv.from.row + mv.to.row) / 2, mv.from.col));
    }

    let mut promoted_to = None;
    if piece.kind == PieceKind::Pawn && mv.to.row == color.promotion_row(board.size()) {
        let kind = mv.promotion.unwrap_or(PieceKind::Queen);
        piece.kind = kind;
        promoted_to = Some(kind);
    }

    piece.has_moved = true;
    next.place(mv.to, piece).ok()?;

    let outcome = MoveOutcome {
        mv: Move {
            promotion: promoted_to,
            ..mv
        },
        moved: piece,
        captured,
        castle_rook,
        promoted_to,
    };
    Some((next, outcome))
}

/// 判斷城堡屬於哪一側：以己方國王所在行為界，沒有國王時以棋盤中線為界
fn rook_side(board: &ChessBoard, rook_pos: Position, color: Color) -> CastleSide {
    let pivot = board
        .king_position(color)
        .map(|king| king.col)
        .unwrap_or(board.size() / 2);
    if rook_pos.col > pivot {
        CastleSide::Kingside
    } else {
        CastleSide::Queenside
    }
}
