// 遊戲邏輯錯誤型別，攜帶 function name 與 context，支援來源錯誤巢狀
use crate::*;
use board::component::PieceKind;
use board::error::{BoardError, ErrorKind, MoveError};
use skills_lib::*;
use thiserror::Error;

/// 遊戲核心錯誤型別
#[derive(Debug, Error)]
pub enum Error {
    #[error("`{func}`: 非法走法: {reason}")]
    IllegalMove { func: &'static str, reason: String },

    #[error("`{func}`: 狀態 {state} 不允許此操作")]
    InvalidTransition { func: &'static str, state: String },

    #[error("`{func}`: {kind} 已達上限 {limit}")]
    CapacityExceeded {
        func: &'static str,
        kind: PieceKind,
        limit: usize,
    },

    #[error("`{func}`: 己方前三列只有 {limit} 格可部署")]
    DeployLimit { func: &'static str, limit: usize },

    #[error("`{func}`: 金幣不足，需要 {cost}，持有 {coins}")]
    InsufficientFunds {
        func: &'static str,
        cost: Coins,
        coins: Coins,
    },

    #[error("`{func}`: 棋盤大小錯誤: {reason}")]
    InvalidBoardSize { func: &'static str, reason: String },

    #[error("`{func}`: 無法戰鬥: {reason}")]
    InvalidCombatState { func: &'static str, reason: String },

    #[error("`{func}`: 遊戲已結束")]
    AlreadyEnded { func: &'static str },

    #[error("`{func}`: 遊戲 {game_id} 版本衝突，預期 {expected}，實際 {actual}")]
    VersionConflict {
        func: &'static str,
        game_id: GameID,
        expected: Version,
        actual: Version,
    },

    #[error("`{func}`: 遊戲 {game_id} 不存在")]
    GameNotFound { func: &'static str, game_id: GameID },

    #[error("`{func}`: 棋子 {piece_id} 不存在")]
    PieceNotFound {
        func: &'static str,
        piece_id: PieceID,
    },

    #[error("`{func}`: 棋子 {piece_id} 已在軍隊中")]
    DuplicatePiece {
        func: &'static str,
        piece_id: PieceID,
    },

    #[error("`{func}`: 棋子 {piece_id} 沒有 RPG 屬性")]
    NotRpgPiece {
        func: &'static str,
        piece_id: PieceID,
    },

    #[error("`{func}`: 棋子 {piece_id} 沒有特殊能力")]
    NoAbility {
        func: &'static str,
        piece_id: PieceID,
    },

    #[error("`{func}`: 能力 {ability} 是被動能力")]
    AbilityPassive { func: &'static str, ability: Ability },

    #[error("`{func}`: 棋子 {piece_id} 本回合已使用過能力")]
    AbilityOnCooldown {
        func: &'static str,
        piece_id: PieceID,
    },

    #[error("`{func}`: 任務 {quest_id} 已接取或已完成")]
    QuestAlreadyActive {
        func: &'static str,
        quest_id: QuestID,
    },

    #[error("`{func}`: 任務 {quest_id} 不存在")]
    QuestNotFound {
        func: &'static str,
        quest_id: QuestID,
    },

    #[error("`{func}`: 任務 {quest_id} 尚未完成 ({progress}/{target})")]
    QuestNotComplete {
        func: &'static str,
        quest_id: QuestID,
        progress: u32,
        target: u32,
    },

    #[error("`{func}`: 進行中的任務已達上限 {max}")]
    TooManyQuests { func: &'static str, max: usize },

    #[error("`{func}`: 棋盤效果設定錯誤: {reason}")]
    InvalidEffect { func: &'static str, reason: String },

    #[error("`{func}`: 設定錯誤: {reason}")]
    InvalidConfig { func: &'static str, reason: String },

    #[error("`{func}`: 行動序號 {got} 不大於上一個序號 {last}")]
    OutOfOrder {
        func: &'static str,
        last: SequenceNumber,
        got: SequenceNumber,
    },

    #[error("`{func}`: 包裝: {source}")]
    Wrap {
        func: &'static str,
        #[source]
        source: Box<Error>,
    },
}

pub fn root_error(err: &Error) -> &Error {
    let mut err = err;
    while let Error::Wrap { source, .. } = err {
        err = source.as_ref();
    }
    err
}

/// 把棋盤引擎的錯誤轉成遊戲錯誤：走法錯誤為 `IllegalMove`，邊長錯誤為 `InvalidBoardSize`
pub fn from_chess_error(func: &'static str, err: board::error::Error) -> Error {
    let reason = err.to_string();
    match err.kind() {
        ErrorKind::Board(BoardError::InvalidSize { .. })
        | ErrorKind::Board(BoardError::PieceOutsideResize { .. }) => {
            Error::InvalidBoardSize { func, reason }
        }
        ErrorKind::Move(MoveError::GameFinished) => Error::InvalidTransition {
            func,
            state: reason,
        },
        ErrorKind::Board(_) | ErrorKind::Move(_) => Error::IllegalMove { func, reason },
        ErrorKind::Load(_) => Error::InvalidConfig { func, reason },
    }
}
