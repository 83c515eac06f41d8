//! action/mod.rs：
//! - 作為 action 子模組的入口，統一 re-export movement、ability、dispatch 等子模組。
//! - 不放具體邏輯或資料結構實作。
mod ability;
mod dispatch;
mod movement;

pub use dispatch::*;
pub use movement::*;
