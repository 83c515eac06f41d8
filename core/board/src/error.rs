//! 錯誤處理系統
//!
//! 頂層 `Error` 攜帶錯誤種類與 context 鏈，種類以 thiserror 定義

use crate::alias::Coord;
use crate::component::{Color, PieceKind, Position};
use thiserror::Error as ThisError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// 頂層錯誤，包含原始錯誤和 context 鏈
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    contexts: Vec<String>,
}

/// 錯誤種類
#[derive(Debug, ThisError)]
pub enum ErrorKind {
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Move(#[from] MoveError),
    #[error(transparent)]
    Load(#[from] LoadError),
}

/// 棋盤錯誤
#[derive(Debug, ThisError)]
pub enum BoardError {
    #[error("位置超出棋盤邊界: {pos:?} 邊長 {size}")]
    OutOfBounds { pos: Position, size: Coord },
    #[error("棋盤邊長 {size} 不在 [{min}, {max}] 之內")]
    InvalidSize { size: Coord, min: Coord, max: Coord },
    #[error("縮小棋盤會移除位於 {pos} 的棋子")]
    PieceOutsideResize { pos: Position },
    #[error("位置 {pos} 已有棋子")]
    Occupied { pos: Position },
}

/// 走法錯誤
#[derive(Debug, ThisError)]
pub enum MoveError {
    #[error("位置 {pos} 沒有棋子")]
    NoPieceAt { pos: Position },
    #[error("輪到 {expected} 行棋，但 {pos} 的棋子屬於 {found}")]
    WrongTurn {
        expected: Color,
        found: Color,
        pos: Position,
    },
    #[error("非法走法 {from} -> {to}: {reason}")]
    Illegal {
        from: Position,
        to: Position,
        reason: String,
    },
    #[error("不能升變為 {kind}")]
    InvalidPromotion { kind: PieceKind },
    #[error("對局已結束")]
    GameFinished,
}

/// 格式載入錯誤
#[derive(Debug, ThisError)]
pub enum LoadError {
    #[error("解析失敗: {0}")]
    ParseError(String),
}

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// 添加錯誤上下文，自動記錄呼叫位置
    #[track_caller]
    pub fn context<C: Into<String>>(mut self, context: C) -> Self {
        let loc = std::panic::Location::caller();
        let msg = format!("{} [{}:{}]", context.into(), loc.file(), loc.line());
        self.contexts.push(msg);
        self
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)?;
        for ctx in &self.contexts {
            write!(f, "\n  {}", ctx)?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

impl<E: Into<ErrorKind>> From<E> for Error {
    fn from(error: E) -> Self {
        Self {
            kind: error.into(),
            contexts: Vec::new(),
        }
    }
}

/// Result 擴展 trait，用於添加錯誤上下文
pub trait Context<T> {
    fn context<C: Into<String>>(self, context: C) -> Result<T>;
}

impl<T> Context<T> for Result<T> {
    #[track_caller]
    fn context<C: Into<String>>(self, context: C) -> Result<T> {
        match self {
            Ok(value) => Ok(value),
            Err(e) => Err(e.context(context)),
        }
    }
}
