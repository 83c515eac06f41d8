//! 走法產生
//!
//! 先產生幾何上可行的走法（pseudo-legal），再以整盤複製模擬過濾掉
//! 會讓己方國王被將軍的走法

use crate::alias::Delta;
use crate::component::{CastleSide, Color, Move, Piece, PieceKind, Position};
use crate::constants::{
    DIAGONAL_DIRECTIONS, KING_OFFSETS, KNIGHT_OFFSETS, ORTHOGONAL_DIRECTIONS, PROMOTION_KINDS,
};
use crate::error::{MoveError, Result};
use crate::logic::apply::apply_unchecked;
use crate::logic::attack::{first_piece_on_ray, is_square_attacked};
use crate::logic::board::ChessBoard;
use crate::logic::status::is_in_check;
use std::collections::BTreeSet;
use strum::IntoEnumIterator;

/// 幾何上可行的走法，未檢查自將
pub fn pseudo_legal_moves(board: &ChessBoard, from: Position) -> Vec<Move> {
    let Some(piece) = board.get(from).copied() else {
        return Vec::new();
    };
    let mut moves = Vec::new();
    match piece.kind {
        PieceKind::Pawn => pawn_moves(board, from, piece, &mut moves),
        PieceKind::Knight => step_moves(board, from, piece, &KNIGHT_OFFSETS, &mut moves),
        PieceKind::Bishop => slide_moves(board, from, piece, &DIAGONAL_DIRECTIONS, &mut moves),
        PieceKind::Rook => slide_moves(board, from, piece, &ORTHOGONAL_DIRECTIONS, &mut moves),
        PieceKind::Queen => {
            slide_moves(board, from, piece, &ORTHOGONAL_DIRECTIONS, &mut moves);
            slide_moves(board, from, piece, &DIAGONAL_DIRECTIONS, &mut moves);
        }
        PieceKind::King => {
            step_moves(board, from, piece, &KING_OFFSETS, &mut moves);
            castling_moves(board, from, piece, &mut moves);
        }
    }
    moves
}

/// 合法走法：模擬走完後己方國王不能被將軍
pub fn legal_moves(board: &ChessBoard, from: Position) -> Vec<Move> {
    let Some(color) = board.get(from).map(|piece| piece.color) else {
        return Vec::new();
    };
    pseudo_legal_moves(board, from)
        .into_iter()
        .filter(|mv| leaves_king_safe(board, *mv, color))
        .collect()
}

/// 合法目的地集合
pub fn legal_destinations(board: &ChessBoard, from: Position) -> BTreeSet<Position> {
    legal_moves(board, from).into_iter().map(|mv| mv.to).collect()
}

/// 某方所有合法走法
pub fn all_legal_moves(board: &ChessBoard, color: Color) -> Vec<Move> {
    board
        .pieces_of(color)
        .flat_map(|(pos, _)| legal_moves(board, pos))
        .collect()
}

pub fn has_any_legal_move(board: &ChessBoard, color: Color) -> bool {
    board
        .pieces_of(color)
        .any(|(pos, _)| !legal_moves(board, pos).is_empty())
}

/// 走完 `mv` 後 `color` 方國王是否安全
pub fn leaves_king_safe(board: &ChessBoard, mv: Move, color: Color) -> bool {
    apply_unchecked(board, mv).is_some_and(|(next, _)| !is_in_check(&next, color))
}

/// 此走法是否為兵走到底線
pub fn is_promotion(board: &ChessBoard, mv: Move) -> bool {
    board.get(mv.from).is_some_and(|piece| {
        piece.kind == PieceKind::Pawn && mv.to.row == piece.color.promotion_row(board.size())
    })
}

/// 驗證走法並補上預設升變，回傳正規化後的走法
pub fn validate_move(board: &ChessBoard, mv: Move) -> Result<Move> {
    let piece = board
        .get(mv.from)
        .copied()
        .ok_or(MoveError::NoPieceAt { pos: mv.from })?;
    let illegal = |reason: &str| MoveError::Illegal {
        from: mv.from,
        to: mv.to,
        reason: reason.to_string(),
    };

    let pseudo = pseudo_legal_moves(board, mv.from);
    if !pseudo.iter().any(|candidate| candidate.to == mv.to) {
        return Err(illegal("目標不在此棋子的走法範圍內").into());
    }
    let mut normalized = Move::new(mv.from, mv.to);
    if is_promotion(board, mv) {
        let kind = mv.promotion.unwrap_or(PieceKind::Queen);
        if !PROMOTION_KINDS.contains(&kind) {
            return Err(MoveError::InvalidPromotion { kind }.into());
        }
        normalized.promotion = Some(kind);
    } else if mv.promotion.is_some() {
        return Err(illegal("此走法不是升變").into());
    }
    if !leaves_king_safe(board, normalized, piece.color) {
        return Err(illegal("走完後己方國王會被將軍").into());
    }
    Ok(normalized)
}

/// 入堡時對應的城堡位置：國王該方向上第一個棋子，必須是己方未移動的城堡
pub fn castle_rook_square(board: &ChessBoard, king_pos: Position, side: CastleSide) -> Option<Position> {
    let king = board.get(king_pos)?;
    let rook_pos = first_piece_on_ray(board, king_pos, 0, side.direction())?;
    let rook = board.get(rook_pos)?;
    (rook.kind == PieceKind::Rook && rook.color == king.color && !rook.has_moved)
        .then_some(rook_pos)
}

/// 過路兵被吃的位置
pub fn en_passant_victim(board: &ChessBoard, from: Position, to: Position, color: Color) -> Option<Position> {
    if board.en_passant != Some(to) {
        return None;
    }
    let victim = Position::new(from.row, to.col);
    board
        .get(victim)
        .filter(|piece| {
            piece.kind == PieceKind::Pawn && piece.color != color && piece.is_en_passant_target
        })
        .map(|_| victim)
}

// 空格，或是非國王的敵方棋子
fn can_land(board: &ChessBoard, pos: Position, color: Color) -> bool {
    match board.get(pos) {
        None => true,
        Some(target) => target.color != color && target.kind != PieceKind::King,
    }
}

fn pawn_moves(board: &ChessBoard, from: Position, piece: Piece, moves: &mut Vec<Move>) {
    let dir = piece.color.pawn_direction();

    if let Some(one) = board.step(from, dir, 0) {
        if board.is_empty(one) {
            moves.push(Move::new(from, one));
            if !piece.has_moved {
                if let Some(two) = board.step(one, dir, 0) {
                    if board.is_empty(two) {
                        moves.push(Move::new(from, two));
                    }
                }
            }
        }
    }

    for d_col in [-1, 1] {
        let Some(diag) = board.step(from, dir, d_col) else {
            continue;
        };
        match board.get(diag) {
            Some(_) => {
                if can_land(board, diag, piece.color) {
                    moves.push(Move::new(from, diag));
                }
            }
            None => {
                if en_passant_victim(board, from, diag, piece.color).is_some() {
                    moves.push(Move::new(from, diag));
                }
            }
        }
    }
}

fn step_moves(
    board: &ChessBoard,
    from: Position,
    piece: Piece,
    offsets: &[(Delta, Delta)],
    moves: &mut Vec<Move>,
) {
    for &(d_row, d_col) in offsets {
        if let Some(to) = board.step(from, d_row, d_col) {
            if can_land(board, to, piece.color) {
                moves.push(Move::new(from, to));
            }
        }
    }
}

fn slide_moves(
    board: &ChessBoard,
    from: Position,
    piece: Piece,
    directions: &[(Delta, Delta)],
    moves: &mut Vec<Move>,
) {
    for &(d_row, d_col) in directions {
        let mut current = from;
        while let Some(to) = board.step(current, d_row, d_col) {
            if board.is_empty(to) {
                moves.push(Move::new(from, to));
                current = to;
                continue;
            }
            if can_land(board, to, piece.color) {
                moves.push(Move::new(from, to));
            }
            break;
        }
    }
}

fn castling_moves(board: &ChessBoard, from: Position, king: Piece, moves: &mut Vec<Move>) {
    let enemy = king.color.opponent();
    if king.has_moved || is_square_attacked(board, from, enemy) {
        return;
    }
    for side in CastleSide::iter() {
        if !board.castling.get(king.color, side) {
            continue;
        }
        let Some(rook_pos) = castle_rook_square(board, from, side) else {
            continue;
        };
        if rook_pos.col.abs_diff(from.col) < 3 {
            continue;
        }
        let dir = side.direction();
        // 國王經過與落點的兩格都不能被攻擊
        let transit: Vec<Position> = (1..=2).filter_map(|i| board.step(from, 0, dir * i)).collect();
        if transit.len() == 2
            && transit
                .iter()
                .all(|pos| !is_square_attacked(board, *pos, enemy))
        {
            moves.push(Move::new(from, transit[1]));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_from_ascii;

    fn pos(text: &str) -> Position {
        Position::from_algebraic(text).unwrap()
    }

    #[test]
    fn test_opening_move_counts() {
        let board = ChessBoard::standard();
        assert_eq!(all_legal_moves(&board, Color::White).len(), 20);
        assert_eq!(all_legal_moves(&board, Color::Black).len(), 20);
        assert_eq!(
            legal_destinations(&board, pos("g1")),
            BTreeSet::from([pos("f3"), pos("h3")])
        );
        assert_eq!(
            legal_destinations(&board, pos("e2")),
            BTreeSet::from([pos("e3"), pos("e4")])
        );
        assert!(legal_destinations(&board, pos("e4")).is_empty());
    }

    #[test]
    fn test_pinned_piece_cannot_leave_line() {
        let board = load_from_ascii(
            r#"
            . . . . r . . k
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . B . . .
            . . . . K . . .
            "#,
        )
        .unwrap();
        assert!(legal_moves(&board, pos("e2")).is_empty());
        let err = validate_move(&board, Move::new(pos("e2"), pos("d3"))).unwrap_err();
        assert!(err.to_string().contains("國王會被將軍"));
    }

    #[test]
    fn test_slider_stops_at_first_piece() {
        let board = load_from_ascii(
            r#"
            . . . . k . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . p . . . .
            . . . . . . . .
            . . . P . . . .
            . . . R K . . .
            "#,
        )
        .unwrap();
        let rook = legal_destinations(&board, pos("d1"));
        assert_eq!(rook, BTreeSet::from([pos("a1"), pos("b1"), pos("c1")]));
        let pawn = legal_destinations(&board, pos("d2"));
        assert_eq!(pawn, BTreeSet::from([pos("d3")]));
    }

    #[test]
    fn test_king_is_never_a_destination() {
        let board = load_from_ascii(
            r#"
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            R . . . . . k .
            . . . . K . . .
            "#,
        )
        .unwrap();
        let rook = legal_destinations(&board, pos("a2"));
        assert!(rook.contains(&pos("f2")));
        assert!(!rook.contains(&pos("g2")));
    }

    #[test]
    fn test_promotion_validation() {
        let board = load_from_ascii(
            r#"
            . . . . . . . k
            P . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . K . . .
            "#,
        )
        .unwrap();
        let push = Move::new(pos("a7"), pos("a8"));
        assert_eq!(
            validate_move(&board, push).unwrap().promotion,
            Some(PieceKind::Queen)
        );
        assert_eq!(
            validate_move(&board, push.with_promotion(PieceKind::Knight))
                .unwrap()
                .promotion,
            Some(PieceKind::Knight)
        );
        assert!(validate_move(&board, push.with_promotion(PieceKind::King)).is_err());
        let quiet = Move::new(pos("e1"), pos("e2")).with_promotion(PieceKind::Queen);
        assert!(validate_move(&board, quiet).is_err());
    }
}
