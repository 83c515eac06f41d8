use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

pub type QuestID = String;
/// 百分比數值（100 = 原值）
pub type Percent = u32;

/// 稀有度，決定棋子屬性倍率與商店價格
#[derive(
    Debug,
    Deserialize,
    Serialize,
    Clone,
    Copy,
    Default,
    EnumString,
    Display,
    EnumIter,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// 屬性倍率
    pub fn stat_percent(self) -> Percent {
        match self {
            Rarity::Common => 100,
            Rarity::Uncommon => 115,
            Rarity::Rare => 130,
            Rarity::Epic => 150,
            Rarity::Legendary => 175,
        }
    }

    /// 依倍率縮放數值，至少為 1
    pub fn scale(self, value: i32) -> i32 {
        (value * self.stat_percent() as i32 / 100).max(1)
    }
}

/// 職業專精，攻擊方專精落在防守方弱點時傷害加成
#[derive(
    Debug,
    Deserialize,
    Serialize,
    Clone,
    Copy,
    EnumString,
    Display,
    EnumIter,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Specialization {
    // 近戰
    Vanguard,
    Skirmisher,
    // 遠程
    Marksman,
    Arcanist,
    // 防禦
    Guardian,
}

/// 棋子的特殊能力
#[derive(
    Debug,
    Deserialize,
    Serialize,
    Clone,
    Copy,
    EnumString,
    Display,
    EnumIter,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Ability {
    /// 被攻擊且存活時反擊
    Counter,
    /// 回復生命
    Heal,
    /// 本回合防禦提升
    Fortify,
    /// 本回合攻擊提升
    Berserk,
}

impl Ability {
    /// 被動能力不能主動發動
    pub fn is_passive(self) -> bool {
        matches!(self, Ability::Counter)
    }
}

/// 任務目標
#[derive(Debug, Deserialize, Serialize, Clone, Display, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "type")]
#[strum(serialize_all = "snake_case")]
pub enum QuestKind {
    DefeatPieces { count: u32 },
    WinRounds { count: u32 },
    EarnCoins { amount: u32 },
    DefeatBoss,
}

/// 對任務進度有影響的遊戲事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestEvent {
    PieceDefeated,
    RoundWon,
    CoinsEarned(u32),
    BossDefeated,
}

impl QuestKind {
    /// 完成任務需要的進度
    pub fn target(&self) -> u32 {
        match self {
            QuestKind::DefeatPieces { count } | QuestKind::WinRounds { count } => *count,
            QuestKind::EarnCoins { amount } => *amount,
            QuestKind::DefeatBoss => 1,
        }
    }

    /// 事件對此任務貢獻的進度
    pub fn progress_for(&self, event: QuestEvent) -> u32 {
        match (self, event) {
            (QuestKind::DefeatPieces { .. }, QuestEvent::PieceDefeated) => 1,
            (QuestKind::DefeatPieces { .. }, QuestEvent::BossDefeated) => 1,
            (QuestKind::WinRounds { .. }, QuestEvent::RoundWon) => 1,
            (QuestKind::EarnCoins { .. }, QuestEvent::CoinsEarned(amount)) => amount,
            (QuestKind::DefeatBoss, QuestEvent::BossDefeated) => 1,
            _ => 0,
        }
    }
}

/// 任務模板，接取後成為進行中的任務
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct QuestTemplate {
    pub id: QuestID,
    pub kind: QuestKind,
    #[serde(default)]
    pub reward_coins: u32,
    #[serde(default)]
    pub reward_xp: u32,
}
