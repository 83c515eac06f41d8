//! 型別別名

/// 棋盤座標（列或行）
pub type Coord = usize;

/// 座標位移量
pub type Delta = isize;

/// 半步數（ply）計數
pub type PlyCount = u32;
