//! unit.rs：
//! - 定義 RPG 棋子（RpgPiece）與其屬性（RpgAttributes）、軍隊容量（ArmyCapacity）。
//! - 棋子以組合方式攜帶屬性：沒有屬性的棋子（例如國王）只參與西洋棋規則。
//! - 不負責戰鬥流程與判定（見 battle.rs）。
use crate::*;
use board::component::{Color, Piece, PieceKind, Position};
use serde::{Deserialize, Serialize};
use skills_lib::*;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RpgAttributes {
    pub hp: i32,
    pub max_hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub rarity: Rarity,
    pub ability: Option<Ability>,
    pub specialization: Specialization,
    pub weaknesses: BTreeSet<Specialization>,
    /// 不受單一種類上限限制，只計入總數
    pub is_joker: bool,
    pub level: u32,
    pub xp: Xp,
    /// 本回合的暫時加成，回合開始時歸零
    pub attack_bonus: i32,
    pub defense_bonus: i32,
    pub last_ability_round: Option<Round>,
    pub is_boss: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RpgPiece {
    pub id: PieceID,
    pub kind: PieceKind,
    pub color: Color,
    /// None 代表在後備區，尚未部署
    pub position: Option<Position>,
    pub attributes: Option<RpgAttributes>,
}

/// 基礎屬性 (hp, attack, defense)
pub fn base_stats(kind: PieceKind) -> (i32, i32, i32) {
    match kind {
        PieceKind::Pawn => (10, 4, 2),
        PieceKind::Knight => (16, 7, 3),
        PieceKind::Bishop => (14, 7, 3),
        PieceKind::Rook => (22, 8, 5),
        PieceKind::Queen => (28, 11, 6),
        PieceKind::King => (30, 6, 6),
    }
}

pub fn default_specialization(kind: PieceKind) -> Specialization {
    match kind {
        PieceKind::Pawn => Specialization::Vanguard,
        PieceKind::Knight => Specialization::Skirmisher,
        PieceKind::Bishop => Specialization::Arcanist,
        PieceKind::Rook | PieceKind::King => Specialization::Guardian,
        PieceKind::Queen => Specialization::Marksman,
    }
}

pub fn default_ability(kind: PieceKind) -> Option<Ability> {
    match kind {
        PieceKind::Knight => Some(Ability::Berserk),
        PieceKind::Bishop => Some(Ability::Heal),
        PieceKind::Rook => Some(Ability::Counter),
        PieceKind::Queen => Some(Ability::Fortify),
        PieceKind::Pawn | PieceKind::King => None,
    }
}

/// 專精相剋：近戰怕遠程、遠程怕遊擊、遊擊怕防禦、防禦怕法術、法術怕近戰
pub fn weakness_of(specialization: Specialization) -> Specialization {
    match specialization {
        Specialization::Vanguard => Specialization::Marksman,
        Specialization::Marksman => Specialization::Skirmisher,
        Specialization::Skirmisher => Specialization::Guardian,
        Specialization::Guardian => Specialization::Arcanist,
        Specialization::Arcanist => Specialization::Vanguard,
    }
}

impl RpgAttributes {
    /// 依種類與稀有度產生 1 級屬性
    pub fn for_kind(kind: PieceKind, rarity: Rarity) -> Self {
        let (hp, attack, defense) = base_stats(kind);
        let specialization = default_specialization(kind);
        let max_hp = rarity.scale(hp);
        Self {
            hp: max_hp,
            max_hp,
            attack: rarity.scale(attack),
            defense: rarity.scale(defense),
            rarity,
            ability: default_ability(kind),
            specialization,
            weaknesses: BTreeSet::from([weakness_of(specialization)]),
            is_joker: false,
            level: 1,
            xp: 0,
            attack_bonus: 0,
            defense_bonus: 0,
            last_ability_round: None,
            is_boss: false,
        }
    }

    /// 以百分比縮放生命、攻擊、防禦
    pub fn scaled(mut self, percent: Percent) -> Self {
        let scale = |value: i32| (value * percent as i32 / 100).max(1);
        self.max_hp = scale(self.max_hp);
        self.hp = self.max_hp;
        self.attack = scale(self.attack);
        self.defense = scale(self.defense);
        self
    }

    pub fn effective_attack(&self) -> i32 {
        self.attack + self.attack_bonus
    }

    pub fn effective_defense(&self) -> i32 {
        self.defense + self.defense_bonus
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// 加經驗並處理升級，回傳升了幾級
    pub fn gain_xp(&mut self, xp: Xp, progression: &ProgressionConfig) -> u32 {
        let per_level = progression.xp_per_level.max(1);
        let total = self.xp.saturating_add(xp);
        let levels = total / per_level;
        self.xp = total % per_level;
        if levels > 0 {
            let steps = i32::try_from(levels).unwrap_or(i32::MAX);
            let grow = |stat: i32, per: i32| stat.saturating_add(per.saturating_mul(steps));
            self.level = self.level.saturating_add(levels);
            self.max_hp = grow(self.max_hp, progression.hp_per_level);
            self.hp = grow(self.hp, progression.hp_per_level);
            self.attack = grow(self.attack, progression.attack_per_level);
            self.defense = grow(self.defense, progression.defense_per_level);
        }
        levels
    }

    pub fn clear_round_bonuses(&mut self) {
        self.attack_bonus = 0;
        self.defense_bonus = 0;
    }
}

impl RpgPiece {
    pub fn new(id: PieceID, kind: PieceKind, color: Color, rarity: Rarity) -> Self {
        Self {
            id,
            kind,
            color,
            position: None,
            attributes: (kind != PieceKind::King).then(|| RpgAttributes::for_kind(kind, rarity)),
        }
    }

    /// 沒有 RPG 屬性的一般棋子
    pub fn plain(id: PieceID, kind: PieceKind, color: Color) -> Self {
        Self {
            id,
            kind,
            color,
            position: None,
            attributes: None,
        }
    }

    pub fn joker(mut self) -> Self {
        if let Some(attributes) = &mut self.attributes {
            attributes.is_joker = true;
        }
        self
    }

    pub fn rpg(&self) -> Option<&RpgAttributes> {
        self.attributes.as_ref()
    }

    pub fn rpg_mut(&mut self) -> Option<&mut RpgAttributes> {
        self.attributes.as_mut()
    }

    /// 沒有屬性的棋子不會被戰鬥擊倒，視為存活
    pub fn is_alive(&self) -> bool {
        self.rpg().is_none_or(RpgAttributes::is_alive)
    }

    pub fn is_joker(&self) -> bool {
        self.rpg().is_some_and(|a| a.is_joker)
    }

    pub fn is_boss(&self) -> bool {
        self.rpg().is_some_and(|a| a.is_boss)
    }

    /// 放上棋盤用的西洋棋棋子
    pub fn chess_piece(&self) -> Piece {
        Piece::new(self.kind, self.color)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArmyCapacity {
    pub max_pawns: usize,
    pub max_knights: usize,
    pub max_bishops: usize,
    pub max_rooks: usize,
    pub max_queens: usize,
    pub max_total: usize,
    /// 商店購買的額外總數上限
    pub bonus_slots: usize,
}

impl From<&CapacityConfig> for ArmyCapacity {
    fn from(config: &CapacityConfig) -> Self {
        Self {
            max_pawns: config.max_pawns,
            max_knights: config.max_knights,
            max_bishops: config.max_bishops,
            max_rooks: config.max_rooks,
            max_queens: config.max_queens,
            max_total: config.max_total,
            bonus_slots: 0,
        }
    }
}

impl ArmyCapacity {
    /// 單一種類上限，國王不能編入軍隊
    pub fn limit_for(&self, kind: PieceKind) -> usize {
        match kind {
            PieceKind::Pawn => self.max_pawns,
            PieceKind::Knight => self.max_knights,
            PieceKind::Bishop => self.max_bishops,
            PieceKind::Rook => self.max_rooks,
            PieceKind::Queen => self.max_queens,
            PieceKind::King => 0,
        }
    }

    pub fn total_limit(&self) -> usize {
        self.max_total + self.bonus_slots
    }

    /// 檢查加入 `candidate` 後是否仍在所有上限內
    pub fn check(&self, army: &[RpgPiece], candidate: &RpgPiece) -> Result<(), Error> {
        let func = "ArmyCapacity::check";

        if candidate.kind == PieceKind::King {
            return Err(Error::CapacityExceeded {
                func,
                kind: candidate.kind,
                limit: 0,
            });
        }
        let total = self.total_limit();
        if army.len() + 1 > total {
            return Err(Error::CapacityExceeded {
                func,
                kind: candidate.kind,
                limit: total,
            });
        }
        if candidate.is_joker() {
            return Ok(());
        }
        let limit = self.limit_for(candidate.kind);
        let same_kind = army
            .iter()
            .filter(|p| p.kind == candidate.kind && !p.is_joker())
            .count();
        if same_kind + 1 > limit {
            return Err(Error::CapacityExceeded {
                func,
                kind: candidate.kind,
                limit,
            });
        }
        Ok(())
    }
}
