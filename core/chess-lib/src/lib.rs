//! 西洋棋 + RPG 規則與進程引擎
//!
//! 所有操作都是純函式：接收快照、回傳新快照，失敗時原快照不變。
//! 同一個遊戲的寫入必須由呼叫端序列化（見 `session`）。
use board::component::Color;

mod action;
mod ai;
mod battle;
mod config;
mod effect;
mod error;
mod game;
mod quest;
mod session;
mod shop;
mod unit;

pub use action::*;
pub use ai::*;
pub use battle::*;
pub use config::*;
pub use effect::*;
pub use error::*;
pub use game::*;
pub use quest::*;
pub use session::*;
pub use shop::*;
pub use unit::*;

pub type GameID = String;
pub type PieceID = u64;
pub type EffectID = u64;
pub type Coins = i64;
pub type Score = i64;
pub type Xp = u32;
pub type Round = u32;
pub type Lives = u32;
pub type Version = u64;
pub type SequenceNumber = u64;

/// 玩家固定執白，敵方執黑
pub const PLAYER_COLOR: Color = Color::White;
pub const ENEMY_COLOR: Color = Color::Black;
