//! 核心規則邏輯

pub mod apply;
pub mod attack;
pub mod board;
pub mod game;
pub mod movement;
pub mod status;
