//! 棋盤基本資料：顏色、棋子、座標、走法、入堡權

use crate::alias::{Coord, Delta};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::{Display, EnumIter, EnumString};

/// 陣營顏色
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opponent(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// 兵前進的列方向（白方往大列號走）
    pub fn pawn_direction(self) -> Delta {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// 己方底線所在的列
    pub fn home_row(self, size: Coord) -> Coord {
        match self {
            Color::White => 0,
            Color::Black => size - 1,
        }
    }

    /// 兵升變的列
    pub fn promotion_row(self, size: Coord) -> Coord {
        self.opponent().home_row(size)
    }
}

/// 棋子種類
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// 白方記號（大寫），黑方以小寫表示
    pub fn symbol(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<(PieceKind, Color)> {
        let color = if symbol.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let kind = match symbol.to_ascii_uppercase() {
            'P' => PieceKind::Pawn,
            'N' => PieceKind::Knight,
            'B' => PieceKind::Bishop,
            'R' => PieceKind::Rook,
            'Q' => PieceKind::Queen,
            'K' => PieceKind::King,
            _ => return None,
        };
        Some((kind, color))
    }

    /// 是否為沿直線滑行的棋子
    pub fn is_slider(self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)
    }
}

/// 棋盤上的棋子
///
/// 值型別，由棋盤擁有；移動時以新值取代舊值
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub has_moved: bool,
    /// 上一個半步剛完成兩格前進，只維持一個半步
    pub is_en_passant_target: bool,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color) -> Self {
        Self {
            kind,
            color,
            has_moved: false,
            is_en_passant_target: false,
        }
    }

    pub fn symbol(&self) -> char {
        match self.color {
            Color::White => self.kind.symbol(),
            Color::Black => self.kind.symbol().to_ascii_lowercase(),
        }
    }
}

/// 棋盤座標，`row` 0 為白方底線
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    pub row: Coord,
    pub col: Coord,
}

impl Position {
    pub fn new(row: Coord, col: Coord) -> Self {
        Self { row, col }
    }

    /// 位移後的座標，只檢查不小於 0，棋盤上界由棋盤自行檢查
    pub fn offset(self, d_row: Delta, d_col: Delta) -> Option<Position> {
        let row = self.row.checked_add_signed(d_row)?;
        let col = self.col.checked_add_signed(d_col)?;
        Some(Position { row, col })
    }

    /// 解析代數記號，例如 `e2`、`j10`
    pub fn from_algebraic(text: &str) -> Option<Position> {
        let mut chars = text.chars();
        let file = chars.next()?;
        if !file.is_ascii_lowercase() {
            return None;
        }
        let rank: Coord = chars.as_str().parse().ok()?;
        if rank == 0 {
            return None;
        }
        Some(Position {
            row: rank - 1,
            col: (file as u8 - b'a') as Coord,
        })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match u8::try_from(self.col) {
            Ok(col) if col < 26 => write!(f, "{}{}", (b'a' + col) as char, self.row + 1),
            _ => write!(f, "({}, {})", self.row, self.col),
        }
    }
}

/// 一步走法；`promotion` 為 None 時兵升變預設為皇后
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Move {
    pub from: Position,
    pub to: Position,
    pub promotion: Option<PieceKind>,
}

impl Move {
    pub fn new(from: Position, to: Position) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    pub fn with_promotion(mut self, kind: PieceKind) -> Self {
        self.promotion = Some(kind);
        self
    }

    /// 以代數記號建立走法，測試與工具使用
    pub fn parse(from: &str, to: &str) -> Option<Move> {
        Some(Move::new(
            Position::from_algebraic(from)?,
            Position::from_algebraic(to)?,
        ))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(kind) = self.promotion {
            write!(f, "={}", kind.symbol())?;
        }
        Ok(())
    }
}

/// 入堡方向，王翼為列號增加方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

impl CastleSide {
    pub fn direction(self) -> Delta {
        match self {
            CastleSide::Kingside => 1,
            CastleSide::Queenside => -1,
        }
    }
}

/// 四個獨立的入堡權旗標，一旦撤銷不再恢復
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CastlingRights {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl CastlingRights {
    pub fn all() -> Self {
        Self {
            white_kingside: true,
            white_queenside: true,
            black_kingside: true,
            black_queenside: true,
        }
    }

    pub fn none() -> Self {
        Self {
            white_kingside: false,
            white_queenside: false,
            black_kingside: false,
            black_queenside: false,
        }
    }

    pub fn get(&self, color: Color, side: CastleSide) -> bool {
        match (color, side) {
            (Color::White, CastleSide::Kingside) => self.white_kingside,
            (Color::White, CastleSide::Queenside) => self.white_queenside,
            (Color::Black, CastleSide::Kingside) => self.black_kingside,
            (Color::Black, CastleSide::Queenside) => self.black_queenside,
        }
    }

    pub fn set(&mut self, color: Color, side: CastleSide, value: bool) {
        let flag = match (color, side) {
            (Color::White, CastleSide::Kingside) => &mut self.white_kingside,
            (Color::White, CastleSide::Queenside) => &mut self.white_queenside,
            (Color::Black, CastleSide::Kingside) => &mut self.black_kingside,
            (Color::Black, CastleSide::Queenside) => &mut self.black_queenside,
        };
        *flag = value;
    }

    pub fn revoke(&mut self, color: Color, side: CastleSide) {
        self.set(color, side, false);
    }

    pub fn revoke_all(&mut self, color: Color) {
        self.revoke(color, CastleSide::Kingside);
        self.revoke(color, CastleSide::Queenside);
    }
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self::none()
    }
}

/// 和棋種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum DrawKind {
    Stalemate,
    InsufficientMaterial,
    FiftyMoveRule,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algebraic() {
        let e2 = Position::from_algebraic("e2").unwrap();
        assert_eq!(e2, Position::new(1, 4));
        assert_eq!(e2.to_string(), "e2");
        assert_eq!(
            Position::from_algebraic("j10"),
            Some(Position::new(9, 9))
        );
        assert_eq!(Position::from_algebraic("e0"), None);
        assert_eq!(Position::from_algebraic("E2"), None);
        assert_eq!(Position::from_algebraic(""), None);
    }

    #[test]
    fn test_offset() {
        let a1 = Position::new(0, 0);
        assert_eq!(a1.offset(-1, 0), None);
        assert_eq!(a1.offset(1, 2), Some(Position::new(1, 2)));
    }

    #[test]
    fn test_symbol() {
        assert_eq!(
            PieceKind::from_symbol('n'),
            Some((PieceKind::Knight, Color::Black))
        );
        assert_eq!(PieceKind::from_symbol('x'), None);
        assert_eq!(Piece::new(PieceKind::Queen, Color::Black).symbol(), 'q');
        assert_eq!("queen".parse::<PieceKind>().unwrap(), PieceKind::Queen);
    }

    #[test]
    fn test_castling_rights() {
        let mut rights = CastlingRights::all();
        rights.revoke(Color::White, CastleSide::Kingside);
        assert!(!rights.get(Color::White, CastleSide::Kingside));
        assert!(rights.get(Color::White, CastleSide::Queenside));
        rights.revoke_all(Color::Black);
        assert!(!rights.black_kingside && !rights.black_queenside);
    }
}
