//! 攻擊判定
//!
//! 從目標格反向搜尋攻擊者，不需要先產生整份走法列表

use crate::component::{Color, PieceKind, Position};
use crate::constants::{DIAGONAL_DIRECTIONS, KING_OFFSETS, KNIGHT_OFFSETS, ORTHOGONAL_DIRECTIONS};
use crate::logic::board::ChessBoard;

/// `by` 方是否有棋子攻擊 `target`
pub fn is_square_attacked(board: &ChessBoard, target: Position, by: Color) -> bool {
    !attackers_of(board, target, by).is_empty()
}

/// 列出 `by` 方所有攻擊 `target` 的棋子位置
pub fn attackers_of(board: &ChessBoard, target: Position, by: Color) -> Vec<Position> {
    let mut attackers = Vec::new();
    let is_enemy_kind = |pos: Position, kinds: &[PieceKind]| {
        board
            .get(pos)
            .is_some_and(|piece| piece.color == by && kinds.contains(&piece.kind))
    };

    // 兵：從目標格往反方向看斜前兩格
    let back = -by.pawn_direction();
    for d_col in [-1, 1] {
        if let Some(pos) = board.step(target, back, d_col) {
            if is_enemy_kind(pos, &[PieceKind::Pawn]) {
                attackers.push(pos);
            }
        }
    }

    for (d_row, d_col) in KNIGHT_OFFSETS {
        if let Some(pos) = board.step(target, d_row, d_col) {
            if is_enemy_kind(pos, &[PieceKind::Knight]) {
                attackers.push(pos);
            }
        }
    }

    for (d_row, d_col) in KING_OFFSETS {
        if let Some(pos) = board.step(target, d_row, d_col) {
            if is_enemy_kind(pos, &[PieceKind::King]) {
                attackers.push(pos);
            }
        }
    }

    let rays = ORTHOGONAL_DIRECTIONS
        .iter()
        .map(|dir| (*dir, [PieceKind::Rook, PieceKind::Queen]))
        .chain(
            DIAGONAL_DIRECTIONS
                .iter()
                .map(|dir| (*dir, [PieceKind::Bishop, PieceKind::Queen])),
        );
    for ((d_row, d_col), kinds) in rays {
        if let Some(pos) = first_piece_on_ray(board, target, d_row, d_col) {
            if is_enemy_kind(pos, &kinds) {
                attackers.push(pos);
            }
        }
    }

    attackers
}

/// 沿方向前進直到遇到第一個棋子
pub fn first_piece_on_ray(
    board: &ChessBoard,
    from: Position,
    d_row: isize,
    d_col: isize,
) -> Option<Position> {
    let mut current = from;
    while let Some(next) = board.step(current, d_row, d_col) {
        if !board.is_empty(next) {
            return Some(next);
        }
        current = next;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_from_ascii;

    #[test]
    fn test_attackers() {
        let board = load_from_ascii(
            r#"
            . . . . k . . .
            . . . . . . . .
            . . . . . . . .
            . . . r . . . .
            . . . . . . . .
            . . p . n . . .
            . . . . . . . .
            . . . . K . . .
            "#,
        )
        .unwrap();
        let e1 = Position::from_algebraic("e1").unwrap();
        // e3 騎士擋住 e 行，也跳不到 e1
        assert!(!is_square_attacked(&board, e1, Color::Black));
        // d2 被 c3 兵斜吃、被 d5 城堡沿直線攻擊
        let d2 = Position::from_algebraic("d2").unwrap();
        let attackers = attackers_of(&board, d2, Color::Black);
        assert_eq!(
            attackers,
            vec![
                Position::from_algebraic("c3").unwrap(),
                Position::from_algebraic("d5").unwrap(),
            ]
        );
        let c2 = Position::from_algebraic("c2").unwrap();
        assert_eq!(
            attackers_of(&board, c2, Color::Black),
            vec![Position::from_algebraic("e3").unwrap()]
        );
    }
}
