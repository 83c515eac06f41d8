//! 棋盤常數定義

use crate::alias::{Coord, Delta, PlyCount};
use crate::component::PieceKind;

/// 標準棋盤邊長
pub const STANDARD_BOARD_SIZE: Coord = 8;

/// 引擎可接受的最小棋盤邊長
pub const MIN_BOARD_SIZE: Coord = 4;

/// 引擎可接受的最大棋盤邊長
pub const MAX_BOARD_SIZE: Coord = 16;

/// 五十步規則（以半步計）
pub const FIFTY_MOVE_LIMIT: PlyCount = 100;

/// 標準底線排列（由 a 行到 h 行）
pub const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// 騎士跳躍位移
pub const KNIGHT_OFFSETS: [(Delta, Delta); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// 國王一步位移
pub const KING_OFFSETS: [(Delta, Delta); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// 直線方向（城堡、皇后）
pub const ORTHOGONAL_DIRECTIONS: [(Delta, Delta); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// 斜線方向（主教、皇后）
pub const DIAGONAL_DIRECTIONS: [(Delta, Delta); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// 升變可選的棋子
pub const PROMOTION_KINDS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];
