//! 西洋棋棋盤模型與規則引擎
//!
//! - `component`：棋子、座標、走法等基本資料
//! - `logic`：合法走法、攻擊判定、將軍/將死/和棋判定、套用走法
//! - `loader`：ASCII 棋盤圖與棋盤互轉

pub mod alias;
pub mod component;
pub mod constants;
pub mod error;
pub mod loader;
pub mod logic;
