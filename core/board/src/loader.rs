//! 棋盤載入器

use crate::component::{Color, Piece, PieceKind, Position};
use crate::error::{LoadError, Result};
use crate::logic::board::ChessBoard;

/// 從 ASCII 棋盤圖載入棋盤
///
/// 每行用空格分隔的符號，第一行是黑方底線（最大列號）：
/// - `.` = 空格
/// - `KQRBNP` = 白方棋子，小寫為黑方
///
/// 推導規則：
/// - 兵在自己的起始列視為未移動，否則視為已移動
/// - 其他棋子在己方底線視為未移動
/// - 國王與同側城堡都未移動時給予該側入堡權
///
/// 例如：
/// ```text
/// . . . . k . . .
/// . . . . . . . .
/// . . . . . . . .
/// . . . . . . . .
/// . . . . . . . .
/// . . . . . . . .
/// . . . . . . . .
/// R . . . K . . R
/// ```
pub fn load_from_ascii(ascii: &str) -> Result<ChessBoard> {
    let lines: Vec<&str> = ascii
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    if lines.is_empty() {
        return Err(LoadError::ParseError("棋盤為空".to_string()).into());
    }

    let size = lines.len();
    let mut board = ChessBoard::empty(size)?;

    for (i, line) in lines.iter().enumerate() {
        let row = size - 1 - i;
        let cells: Vec<&str> = line.split_whitespace().collect();
        if cells.len() != size {
            return Err(LoadError::ParseError(format!(
                "第 {} 行有 {} 格，棋盤需要 {} 格",
                i + 1,
                cells.len(),
                size
            ))
            .into());
        }
        for (col, cell) in cells.into_iter().enumerate() {
            if cell == "." {
                continue;
            }
            let mut chars = cell.chars();
            let (kind, color) = match (chars.next(), chars.next()) {
                (Some(symbol), None) => PieceKind::from_symbol(symbol),
                _ => None,
            }
            .ok_or_else(|| LoadError::ParseError(format!("未知符號 `{cell}`")))?;
            let pos = Position { row, col };
            let mut piece = Piece::new(kind, color);
            piece.has_moved = !is_start_square(kind, color, pos, size);
            board.place(pos, piece)?;
        }
    }

    board.infer_castling_rights();
    Ok(board)
}

fn is_start_square(kind: PieceKind, color: Color, pos: Position, size: usize) -> bool {
    let home = color.home_row(size);
    match kind {
        PieceKind::Pawn => pos.row == home.saturating_add_signed(color.pawn_direction()),
        _ => pos.row == home,
    }
}

/// 把棋盤轉成與 `load_from_ascii` 相同格式的文字
pub fn to_ascii(board: &ChessBoard) -> String {
    let size = board.size();
    (0..size)
        .rev()
        .map(|row| {
            (0..size)
                .map(|col| {
                    board
                        .get(Position { row, col })
                        .map_or('.', |piece| piece.symbol())
                        .to_string()
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
