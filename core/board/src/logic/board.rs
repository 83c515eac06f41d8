//! 棋盤邏輯

use crate::alias::{Coord, Delta};
use crate::component::{CastleSide, CastlingRights, Color, Piece, PieceKind, Position};
use crate::constants::{BACK_RANK, MAX_BOARD_SIZE, MIN_BOARD_SIZE, STANDARD_BOARD_SIZE};
use crate::error::{BoardError, Result};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// N×N 棋盤，`cells[row][col]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChessBoard {
    size: Coord,
    cells: Vec<Vec<Option<Piece>>>,
    pub castling: CastlingRights,
    /// 可被吃過路兵的目標格（被越過的那一格）
    pub en_passant: Option<Position>,
}

/// 驗證棋盤邊長是否在引擎範圍內
pub fn validate_size(size: Coord) -> Result<()> {
    if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
        return Err(BoardError::InvalidSize {
            size,
            min: MIN_BOARD_SIZE,
            max: MAX_BOARD_SIZE,
        }
        .into());
    }
    Ok(())
}

impl ChessBoard {
    /// 空棋盤，無入堡權
    pub fn empty(size: Coord) -> Result<Self> {
        validate_size(size)?;
        Ok(Self {
            size,
            cells: vec![vec![None; size]; size],
            castling: CastlingRights::none(),
            en_passant: None,
        })
    }

    /// 標準開局（8×8）
    pub fn standard() -> Self {
        let mut board = Self {
            size: STANDARD_BOARD_SIZE,
            cells: vec![vec![None; STANDARD_BOARD_SIZE]; STANDARD_BOARD_SIZE],
            castling: CastlingRights::all(),
            en_passant: None,
        };
        board.fill_standard(Color::White);
        board.fill_standard(Color::Black);
        board
    }

    /// 指定邊長的標準開局，八個行置中
    pub fn standard_with_size(size: Coord) -> Result<Self> {
        validate_size(size)?;
        if size < STANDARD_BOARD_SIZE {
            return Err(BoardError::InvalidSize {
                size,
                min: STANDARD_BOARD_SIZE,
                max: MAX_BOARD_SIZE,
            }
            .into());
        }
        let mut board = Self::empty(size)?;
        board.castling = CastlingRights::all();
        board.fill_standard(Color::White);
        board.fill_standard(Color::Black);
        Ok(board)
    }

    fn fill_standard(&mut self, color: Color) {
        let offset = standard_col_offset(self.size);
        let home = color.home_row(self.size);
        let pawn_row = home.saturating_add_signed(color.pawn_direction());
        for (i, kind) in BACK_RANK.iter().enumerate() {
            self.cells[home][offset + i] = Some(Piece::new(*kind, color));
            self.cells[pawn_row][offset + i] = Some(Piece::new(PieceKind::Pawn, color));
        }
    }

    pub fn size(&self) -> Coord {
        self.size
    }

    /// 驗證位置是否在棋盤邊界內
    pub fn is_valid_position(&self, pos: Position) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    /// 位移後仍在棋盤內的座標
    pub fn step(&self, pos: Position, d_row: Delta, d_col: Delta) -> Option<Position> {
        pos.offset(d_row, d_col)
            .filter(|next| self.is_valid_position(*next))
    }

    pub fn get(&self, pos: Position) -> Option<&Piece> {
        self.cells.get(pos.row)?.get(pos.col)?.as_ref()
    }

    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos).is_none()
    }

    /// 放置棋子並回傳原本佔據的棋子
    pub fn place(&mut self, pos: Position, piece: Piece) -> Result<Option<Piece>> {
        let size = self.size;
        let cell = self.cell_mut(pos).ok_or(BoardError::OutOfBounds { pos, size })?;
        Ok(cell.replace(piece))
    }

    pub fn remove(&mut self, pos: Position) -> Option<Piece> {
        self.cell_mut(pos)?.take()
    }

    /// 把棋子搬到空格，不做任何規則檢查
    pub fn relocate(&mut self, from: Position, to: Position) -> Result<()> {
        let size = self.size;
        if !self.is_valid_position(to) {
            return Err(BoardError::OutOfBounds { pos: to, size }.into());
        }
        if from == to {
            return Ok(());
        }
        if !self.is_empty(to) {
            return Err(BoardError::Occupied { pos: to }.into());
        }
        if let Some(piece) = self.remove(from) {
            self.cells[to.row][to.col] = Some(piece);
        }
        Ok(())
    }

    fn cell_mut(&mut self, pos: Position) -> Option<&mut Option<Piece>> {
        self.cells.get_mut(pos.row)?.get_mut(pos.col)
    }

    /// 依列、行順序列出所有棋子
    pub fn pieces(&self) -> impl Iterator<Item = (Position, &Piece)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells.iter().enumerate().filter_map(move |(col, cell)| {
                cell.as_ref().map(|piece| (Position { row, col }, piece))
            })
        })
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Position, &Piece)> + '_ {
        self.pieces().filter(move |(_, piece)| piece.color == color)
    }

    pub fn piece_count(&self) -> usize {
        self.pieces().count()
    }

    pub fn king_position(&self, color: Color) -> Option<Position> {
        self.pieces_of(color)
            .find(|(_, piece)| piece.kind == PieceKind::King)
            .map(|(pos, _)| pos)
    }

    /// 清除所有過路兵標記（每個半步開始時呼叫）
    pub fn clear_en_passant(&mut self) {
        self.en_passant = None;
        for piece in self.cells.iter_mut().flatten().flatten() {
            piece.is_en_passant_target = false;
        }
    }

    /// 依棋子位置重建入堡權：國王未移動，且同側有己方未移動的城堡
    pub fn infer_castling_rights(&mut self) {
        let mut rights = CastlingRights::none();
        for color in Color::iter() {
            let Some(king) = self.king_position(color) else {
                continue;
            };
            if self.get(king).is_some_and(|piece| piece.has_moved) {
                continue;
            }
            for side in CastleSide::iter() {
                let has_rook = self.pieces_of(color).any(|(pos, piece)| {
                    piece.kind == PieceKind::Rook
                        && !piece.has_moved
                        && pos.row == king.row
                        && match side {
                            CastleSide::Kingside => pos.col > king.col,
                            CastleSide::Queenside => pos.col < king.col,
                        }
                });
                rights.set(color, side, has_rook);
            }
        }
        self.castling = rights;
    }

    /// 改變棋盤邊長，座標不變；縮小時不能移除任何棋子
    pub fn resized(&self, new_size: Coord) -> Result<ChessBoard> {
        validate_size(new_size)?;
        if let Some((pos, _)) = self
            .pieces()
            .find(|(pos, _)| pos.row >= new_size || pos.col >= new_size)
        {
            return Err(BoardError::PieceOutsideResize { pos }.into());
        }
        let mut cells = vec![vec![None; new_size]; new_size];
        for (pos, piece) in self.pieces() {
            cells[pos.row][pos.col] = Some(*piece);
        }
        let en_passant = self.en_passant.filter(|pos| pos.row < new_size && pos.col < new_size);
        Ok(ChessBoard {
            size: new_size,
            cells,
            castling: self.castling,
            en_passant,
        })
    }
}

/// 標準開局八個行在較大棋盤上的起始行
pub fn standard_col_offset(size: Coord) -> Coord {
    size.saturating_sub(STANDARD_BOARD_SIZE) / 2
}
