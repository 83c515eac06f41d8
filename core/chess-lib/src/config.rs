//! config.rs：
//! - 遊戲平衡參數，全部由呼叫端傳入，不使用全域設定。
//! - 以 toml 載入，缺少的欄位使用預設值。
use crate::*;
use board::alias::Coord;
use board::component::PieceKind;
use board::constants::{MAX_BOARD_SIZE, STANDARD_BOARD_SIZE};
use serde::{Deserialize, Serialize};
use skills_lib::*;

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GameConfig {
    pub board: BoardConfig,
    pub capacity: CapacityConfig,
    pub combat: CombatConfig,
    pub economy: EconomyConfig,
    pub rounds: RoundConfig,
    pub progression: ProgressionConfig,
    pub abilities: AbilityConfig,
    pub quests: QuestConfig,
    pub starting_army: StartingArmy,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BoardConfig {
    pub base_size: Coord,
    /// 尺寸效果可縮到的最小邊長；部署需要完整的八個行
    pub min_size: Coord,
    pub max_size: Coord,
    /// 每隔幾個回合邊長加一
    pub growth_interval: Round,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CapacityConfig {
    pub max_pawns: usize,
    pub max_knights: usize,
    pub max_bishops: usize,
    pub max_rooks: usize,
    pub max_queens: usize,
    pub max_total: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CombatConfig {
    pub crit_chance_percent: Percent,
    pub crit_multiplier_percent: Percent,
    pub weakness_multiplier_percent: Percent,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EconomyConfig {
    pub starting_coins: Coins,
    pub starting_lives: Lives,
    pub coins_per_defeat: Coins,
    pub score_per_defeat: Score,
    pub round_win_coins: Coins,
    pub round_win_score: Score,
    pub boss_bonus_coins: Coins,
    pub prices: PriceConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PriceConfig {
    pub pawn: Coins,
    pub knight: Coins,
    pub bishop: Coins,
    pub rook: Coins,
    pub queen: Coins,
    pub joker_surcharge: Coins,
    pub extra_life: Coins,
    pub capacity_slot: Coins,
    pub heal_army: Coins,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RoundConfig {
    /// 每隔幾個回合出現首領
    pub boss_interval: Round,
    /// 完成此回合即獲勝；None 代表無盡模式
    pub max_rounds: Option<Round>,
    pub effects_per_round: usize,
    /// 隨機棋盤效果持續的回合數
    pub effect_duration: Round,
    /// 敵方每回合屬性成長百分比
    pub enemy_growth_percent: Percent,
    pub boss_stat_percent: Percent,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProgressionConfig {
    pub xp_per_level: Xp,
    pub xp_per_defeat: Xp,
    pub hp_per_level: i32,
    pub attack_per_level: i32,
    pub defense_per_level: i32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AbilityConfig {
    pub heal_percent: Percent,
    pub fortify_defense: i32,
    pub berserk_attack: i32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct QuestConfig {
    pub max_active: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StartingArmy {
    pub pieces: Vec<PieceKind>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            base_size: STANDARD_BOARD_SIZE,
            min_size: STANDARD_BOARD_SIZE,
            max_size: 12,
            growth_interval: 3,
        }
    }
}

impl Default for CapacityConfig {
    fn default() -> Self {
        Self {
            max_pawns: 8,
            max_knights: 3,
            max_bishops: 3,
            max_rooks: 3,
            max_queens: 2,
            max_total: 16,
        }
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            crit_chance_percent: 10,
            crit_multiplier_percent: 150,
            weakness_multiplier_percent: 200,
        }
    }
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_coins: 100,
            starting_lives: 3,
            coins_per_defeat: 10,
            score_per_defeat: 100,
            round_win_coins: 50,
            round_win_score: 500,
            boss_bonus_coins: 100,
            prices: PriceConfig::default(),
        }
    }
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            pawn: 20,
            knight: 60,
            bishop: 60,
            rook: 100,
            queen: 180,
            joker_surcharge: 50,
            extra_life: 150,
            capacity_slot: 120,
            heal_army: 40,
        }
    }
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            boss_interval: 5,
            max_rounds: Some(10),
            effects_per_round: 3,
            effect_duration: 2,
            enemy_growth_percent: 10,
            boss_stat_percent: 250,
        }
    }
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            xp_per_level: 100,
            xp_per_defeat: 20,
            hp_per_level: 2,
            attack_per_level: 1,
            defense_per_level: 1,
        }
    }
}

impl Default for AbilityConfig {
    fn default() -> Self {
        Self {
            heal_percent: 50,
            fortify_defense: 3,
            berserk_attack: 3,
        }
    }
}

impl Default for QuestConfig {
    fn default() -> Self {
        Self { max_active: 3 }
    }
}

impl Default for StartingArmy {
    fn default() -> Self {
        let mut pieces = vec![PieceKind::Pawn; 8];
        pieces.extend([
            PieceKind::Knight,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Bishop,
            PieceKind::Rook,
            PieceKind::Rook,
            PieceKind::Queen,
        ]);
        Self { pieces }
    }
}

impl BoardConfig {
    /// 回合對應的棋盤邊長，隨回合單調不減
    pub fn size_for_round(&self, round: Round) -> Coord {
        let growth = round.saturating_sub(1) / self.growth_interval.max(1);
        (self.base_size + growth as Coord).min(self.max_size)
    }
}

impl PriceConfig {
    pub fn piece_price(&self, kind: PieceKind) -> Option<Coins> {
        match kind {
            PieceKind::Pawn => Some(self.pawn),
            PieceKind::Knight => Some(self.knight),
            PieceKind::Bishop => Some(self.bishop),
            PieceKind::Rook => Some(self.rook),
            PieceKind::Queen => Some(self.queen),
            PieceKind::King => None,
        }
    }
}

impl RoundConfig {
    pub fn is_boss_round(&self, round: Round) -> bool {
        self.boss_interval > 0 && round > 0 && round % self.boss_interval == 0
    }
}

impl GameConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, Error> {
        let func = "GameConfig::from_toml_str";
        let config: GameConfig = toml::from_str(text).map_err(|e| Error::InvalidConfig {
            func,
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        let func = "GameConfig::validate";
        let invalid = |reason: &str| Error::InvalidConfig {
            func,
            reason: reason.to_string(),
        };

        let board = &self.board;
        if board.min_size < STANDARD_BOARD_SIZE || board.max_size > MAX_BOARD_SIZE {
            return Err(invalid("棋盤邊長範圍必須在 8 到 16 之間"));
        }
        if !(board.min_size..=board.max_size).contains(&board.base_size) {
            return Err(invalid("初始邊長不在最小與最大邊長之間"));
        }
        if board.growth_interval == 0 || self.rounds.boss_interval == 0 {
            return Err(invalid("回合間隔必須大於 0"));
        }
        if self.combat.crit_chance_percent > 100 {
            return Err(invalid("爆擊機率不能超過 100%"));
        }
        if self.combat.crit_multiplier_percent < 100 || self.combat.weakness_multiplier_percent < 100
        {
            return Err(invalid("倍率不能小於 100%"));
        }
        if self.economy.starting_coins < 0 || self.economy.starting_lives == 0 {
            return Err(invalid("初始金幣不能為負，初始生命至少為 1"));
        }
        if self.progression.xp_per_level == 0 {
            return Err(invalid("升級經驗必須大於 0"));
        }
        if self.starting_army.pieces.contains(&PieceKind::King) {
            return Err(invalid("國王不能編入軍隊"));
        }
        if self.capacity.max_total > deployable_squares(board.base_size) {
            return Err(invalid("軍隊總上限超過己方前三列的格數"));
        }
        Ok(())
    }
}
