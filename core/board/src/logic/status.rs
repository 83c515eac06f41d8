//! 將軍、將死、逼和與其他和棋判定

use crate::component::{Color, DrawKind, PieceKind};
use crate::logic::attack::is_square_attacked;
use crate::logic::board::ChessBoard;
use crate::logic::movement::has_any_legal_move;

/// 沒有國王的一方永遠不算被將軍
pub fn is_in_check(board: &ChessBoard, color: Color) -> bool {
    board
        .king_position(color)
        .is_some_and(|king| is_square_attacked(board, king, color.opponent()))
}

/// 被將軍且沒有任何合法走法
pub fn is_checkmate(board: &ChessBoard, color: Color) -> bool {
    is_in_check(board, color) && !has_any_legal_move(board, color)
}

/// 沒被將軍但沒有任何合法走法
pub fn is_stalemate(board: &ChessBoard, color: Color) -> bool {
    !is_in_check(board, color) && !has_any_legal_move(board, color)
}

/// 子力不足以將死：王對王、王加一輕子對王、只剩同色格主教
pub fn is_insufficient_material(board: &ChessBoard) -> bool {
    let others: Vec<_> = board
        .pieces()
        .filter(|(_, piece)| piece.kind != PieceKind::King)
        .collect();
    match others.as_slice() {
        [] => true,
        [(_, piece)] => matches!(piece.kind, PieceKind::Bishop | PieceKind::Knight),
        _ => {
            let all_bishops = others.iter().all(|(_, piece)| piece.kind == PieceKind::Bishop);
            let mut square_colors = others.iter().map(|(pos, _)| (pos.row + pos.col) % 2);
            let first = square_colors.next();
            all_bishops && square_colors.all(|shade| Some(shade) == first)
        }
    }
}

/// 只看棋盤可判定的和棋；五十步規則需要半步計數，由 `GameState` 判定
pub fn is_stalemate_or_draw(board: &ChessBoard, color: Color) -> Option<DrawKind> {
    if is_stalemate(board, color) {
        Some(DrawKind::Stalemate)
    } else if is_insufficient_material(board) {
        Some(DrawKind::InsufficientMaterial)
    } else {
        None
    }
}
