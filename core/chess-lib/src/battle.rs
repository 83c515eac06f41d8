//! battle.rs：
//! - 負責吃子時的戰鬥判定：傷害、爆擊、弱點加成、反擊。
//! - 棋盤效果的加成由呼叫端整理成 CombatModifiers 傳入。
//! - 每場戰鬥只骰一次 random，RNG 由呼叫端提供。
use crate::*;
use board::component::{Color, PieceKind};
use serde::{Deserialize, Serialize};
use skills_lib::*;
use tracing::debug;

/// 棋盤效果帶來的暫時屬性變化
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CombatModifiers {
    pub attacker_attack: i32,
    pub attacker_defense: i32,
    pub defender_attack: i32,
    pub defender_defense: i32,
}

/// 戰鬥開始前的棋子狀態
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CombatantSnapshot {
    pub id: PieceID,
    pub kind: PieceKind,
    pub color: Color,
    pub hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub specialization: Specialization,
}

/// 一場戰鬥的紀錄，產生後不再修改
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CombatResult {
    pub attacker: CombatantSnapshot,
    pub defender: CombatantSnapshot,
    pub damage: i32,
    pub critical: bool,
    pub weakness_hit: bool,
    pub defender_defeated: bool,
    pub attacker_counter_damage: Option<i32>,
    pub attacker_defeated: bool,
    pub detail: String,
}

/// 不擲骰的戰鬥預估：兩種可能的傷害與反擊
///
/// 走棋前用來判斷攻擊是否可能被彈回，以及攻擊方是否可能被反擊打倒
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombatForecast {
    pub damage: i32,
    pub critical_damage: i32,
    /// 防守方存活時的反擊傷害
    pub counter_damage: Option<i32>,
    pub may_bounce: bool,
    pub may_defeat_attacker: bool,
}

struct Matchup {
    attacker: CombatantSnapshot,
    defender: CombatantSnapshot,
    weakness_hit: bool,
    forecast: CombatForecast,
}

fn matchup(
    func: &'static str,
    attacker: &RpgPiece,
    defender: &RpgPiece,
    modifiers: &CombatModifiers,
    rules: &CombatConfig,
) -> Result<Matchup, Error> {
    let invalid = |reason: String| Error::InvalidCombatState { func, reason };

    if attacker.color == defender.color {
        return Err(invalid(format!(
            "棋子 {} 與 {} 同屬一方",
            attacker.id, defender.id
        )));
    }
    let (Some(att), Some(def)) = (attacker.rpg(), defender.rpg()) else {
        return Err(invalid("雙方都必須有 RPG 屬性".to_string()));
    };
    if !att.is_alive() || !def.is_alive() {
        return Err(invalid(format!(
            "已倒下的棋子不能戰鬥: {} hp {}, {} hp {}",
            attacker.id, att.hp, defender.id, def.hp
        )));
    }

    let att_attack = att.effective_attack() + modifiers.attacker_attack;
    let att_defense = att.effective_defense() + modifiers.attacker_defense;
    let def_attack = def.effective_attack() + modifiers.defender_attack;
    let def_defense = def.effective_defense() + modifiers.defender_defense;
    let weakness_hit = def.weaknesses.contains(&att.specialization);

    let mut damage = (att_attack - def_defense).max(1);
    if weakness_hit {
        damage = damage * rules.weakness_multiplier_percent as i32 / 100;
    }
    let critical_damage = (damage * rules.crit_multiplier_percent as i32 / 100).max(1);
    let damage = damage.max(1);

    let counter_damage = (def.ability == Some(Ability::Counter)).then(|| {
        let mut counter = (def_attack - att_defense).max(1);
        if att.weaknesses.contains(&def.specialization) {
            counter = counter * rules.weakness_multiplier_percent as i32 / 100;
        }
        counter.max(1)
    });

    // 爆擊機率為 100% 時不會出現一般傷害
    let weakest = if rules.crit_chance_percent >= 100 {
        critical_damage
    } else {
        damage
    };
    let may_bounce = weakest < def.hp;
    let floor = if attacker.kind == PieceKind::King { 1 } else { 0 };
    let may_defeat_attacker =
        may_bounce && counter_damage.is_some_and(|counter| (att.hp - counter).max(floor) <= 0);

    Ok(Matchup {
        attacker: snapshot(attacker, att, att_attack, att_defense),
        defender: snapshot(defender, def, def_attack, def_defense),
        weakness_hit,
        forecast: CombatForecast {
            damage,
            critical_damage,
            counter_damage,
            may_bounce,
            may_defeat_attacker,
        },
    })
}

/// 預估一場戰鬥，不擲骰也不修改棋子
pub fn forecast_combat(
    attacker: &RpgPiece,
    defender: &RpgPiece,
    modifiers: &CombatModifiers,
    rules: &CombatConfig,
) -> Result<CombatForecast, Error> {
    let func = "forecast_combat";
    Ok(matchup(func, attacker, defender, modifiers, rules)?.forecast)
}

/// 解決一場戰鬥，直接修改兩個棋子的生命值
///
/// 任一方沒有 RPG 屬性、已倒下或雙方同色時回傳 `InvalidCombatState`，且不修改任何棋子
pub fn resolve_combat<R: rand::Rng>(
    attacker: &mut RpgPiece,
    defender: &mut RpgPiece,
    modifiers: &CombatModifiers,
    rules: &CombatConfig,
    rng: &mut R,
) -> Result<CombatResult, Error> {
    let func = "resolve_combat";

    let m = matchup(func, attacker, defender, modifiers, rules)?;
    let roll = rng.random_range(0..100);
    let critical = roll < rules.crit_chance_percent;
    let damage = if critical {
        m.forecast.critical_damage
    } else {
        m.forecast.damage
    };
    let defender_defeated = m.defender.hp - damage <= 0;
    let counter_damage = m.forecast.counter_damage.filter(|_| !defender_defeated);

    let detail = format!(
        "roll({}) atk({}) - def({}) weakness({}) critical({}) = {}",
        roll, m.attacker.attack, m.defender.defense, m.weakness_hit, critical, damage
    );

    if let Some(def) = defender.rpg_mut() {
        def.hp = (def.hp - damage).max(0);
    }
    let mut attacker_defeated = false;
    // 國王不會被反擊打倒
    let floor = if attacker.kind == PieceKind::King { 1 } else { 0 };
    if let (Some(counter), Some(att)) = (counter_damage, attacker.rpg_mut()) {
        att.hp = (att.hp - counter).max(floor);
        attacker_defeated = att.hp <= 0;
    }

    debug!(
        attacker = attacker.id,
        defender = defender.id,
        damage,
        critical,
        defender_defeated,
        counter = ?counter_damage,
        "resolved combat"
    );

    Ok(CombatResult {
        attacker: m.attacker,
        defender: m.defender,
        damage,
        critical,
        weakness_hit: m.weakness_hit,
        defender_defeated,
        attacker_counter_damage: counter_damage,
        attacker_defeated,
        detail,
    })
}

fn snapshot(piece: &RpgPiece, attributes: &RpgAttributes, attack: i32, defense: i32) -> CombatantSnapshot {
    CombatantSnapshot {
        id: piece.id,
        kind: piece.kind,
        color: piece.color,
        hp: attributes.hp,
        attack,
        defense,
        specialization: attributes.specialization,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn no_crit() -> CombatConfig {
        CombatConfig {
            crit_chance_percent: 0,
            ..CombatConfig::default()
        }
    }

    fn always_crit() -> CombatConfig {
        CombatConfig {
            crit_chance_percent: 100,
            ..CombatConfig::default()
        }
    }

    fn fighter(id: PieceID, kind: PieceKind, color: Color) -> RpgPiece {
        let mut piece = RpgPiece::new(id, kind, color, Rarity::Common);
        if let Some(a) = piece.rpg_mut() {
            a.weaknesses.clear();
            a.ability = None;
        }
        piece
    }

    fn set(piece: &mut RpgPiece, hp: i32, attack: i32, defense: i32) {
        let a = piece.rpg_mut().unwrap();
        a.hp = hp;
        a.max_hp = hp.max(1);
        a.attack = attack;
        a.defense = defense;
    }

    #[test]
    fn test_damage_never_below_one() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut attacker = fighter(1, PieceKind::Pawn, Color::White);
        let mut defender = fighter(2, PieceKind::Rook, Color::Black);
        set(&mut attacker, 10, 1, 0);
        set(&mut defender, 1, 1, 50);
        let result = resolve_combat(
            &mut attacker,
            &mut defender,
            &CombatModifiers::default(),
            &no_crit(),
            &mut rng,
        )
        .unwrap();
        assert_eq!(result.damage, 1);
        assert!(result.defender_defeated);
        assert_eq!(defender.rpg().unwrap().hp, 0);
        assert!(!defender.is_alive());
    }

    #[test]
    fn test_weakness_and_critical_multipliers() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut attacker = fighter(1, PieceKind::Queen, Color::White);
        let mut defender = fighter(2, PieceKind::Pawn, Color::Black);
        set(&mut attacker, 20, 8, 0);
        set(&mut defender, 100, 1, 3);
        defender
            .rpg_mut()
            .unwrap()
            .weaknesses
            .insert(Specialization::Marksman);

        let result = resolve_combat(
            &mut attacker,
            &mut defender,
            &CombatModifiers::default(),
            &always_crit(),
            &mut rng,
        )
        .unwrap();
        // (8 - 3) × 200% × 150%
        assert!(result.weakness_hit);
        assert!(result.critical);
        assert_eq!(result.damage, 15);
        assert_eq!(defender.rpg().unwrap().hp, 85);
        assert_eq!(result.defender.hp, 100);
    }

    #[test]
    fn test_modifiers_apply() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut attacker = fighter(1, PieceKind::Knight, Color::White);
        let mut defender = fighter(2, PieceKind::Bishop, Color::Black);
        set(&mut attacker, 20, 6, 0);
        set(&mut defender, 20, 0, 2);
        let modifiers = CombatModifiers {
            attacker_attack: 3,
            defender_defense: 1,
            ..Default::default()
        };
        let result =
            resolve_combat(&mut attacker, &mut defender, &modifiers, &no_crit(), &mut rng).unwrap();
        assert_eq!(result.damage, 6);
        assert_eq!(result.attacker.attack, 9);
    }

    #[test]
    fn test_counter_damage() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut attacker = fighter(1, PieceKind::Pawn, Color::White);
        let mut defender = fighter(2, PieceKind::Rook, Color::Black);
        set(&mut attacker, 3, 4, 1);
        set(&mut defender, 30, 6, 2);
        defender.rpg_mut().unwrap().ability = Some(Ability::Counter);

        let result = resolve_combat(
            &mut attacker,
            &mut defender,
            &CombatModifiers::default(),
            &no_crit(),
            &mut rng,
        )
        .unwrap();
        assert!(!result.defender_defeated);
        assert_eq!(result.attacker_counter_damage, Some(5));
        assert!(result.attacker_defeated);
        assert_eq!(attacker.rpg().unwrap().hp, 0);
    }

    #[test]
    fn test_king_survives_counter() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut attacker = fighter(1, PieceKind::King, Color::White);
        attacker.attributes = Some(RpgAttributes::for_kind(PieceKind::King, Rarity::Common));
        set(&mut attacker, 2, 1, 0);
        let mut defender = fighter(2, PieceKind::Rook, Color::Black);
        set(&mut defender, 30, 10, 0);
        defender.rpg_mut().unwrap().ability = Some(Ability::Counter);

        let result = resolve_combat(
            &mut attacker,
            &mut defender,
            &CombatModifiers::default(),
            &no_crit(),
            &mut rng,
        )
        .unwrap();
        assert_eq!(result.attacker_counter_damage, Some(10));
        assert!(!result.attacker_defeated);
        assert_eq!(attacker.rpg().unwrap().hp, 1);
    }

    #[test]
    fn test_forecast_matches_resolution() {
        let mut attacker = fighter(1, PieceKind::Rook, Color::White);
        let mut defender = fighter(2, PieceKind::Rook, Color::Black);
        set(&mut attacker, 4, 6, 1);
        set(&mut defender, 10, 7, 2);
        defender.rpg_mut().unwrap().ability = Some(Ability::Counter);

        let forecast =
            forecast_combat(&attacker, &defender, &CombatModifiers::default(), &no_crit()).unwrap();
        assert_eq!(forecast.damage, 4);
        assert_eq!(forecast.critical_damage, 6);
        assert_eq!(forecast.counter_damage, Some(6));
        assert!(forecast.may_bounce);
        assert!(forecast.may_defeat_attacker);

        let result = resolve_combat(
            &mut attacker,
            &mut defender,
            &CombatModifiers::default(),
            &no_crit(),
            &mut StdRng::seed_from_u64(0),
        )
        .unwrap();
        assert_eq!(result.damage, forecast.damage);
        assert!(result.attacker_defeated);

        // 一般傷害就足以擊倒時不會被彈回
        set(&mut defender, 4, 7, 2);
        let forecast =
            forecast_combat(&attacker, &defender, &CombatModifiers::default(), &no_crit()).unwrap();
        assert!(!forecast.may_bounce);
        assert!(!forecast.may_defeat_attacker);
    }

    #[test]
    fn test_invalid_combat_state() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut attacker = fighter(1, PieceKind::Pawn, Color::White);
        let mut defender = fighter(2, PieceKind::Pawn, Color::Black);
        set(&mut defender, 0, 1, 1);
        let before = (attacker.clone(), defender.clone());
        let err = resolve_combat(
            &mut attacker,
            &mut defender,
            &CombatModifiers::default(),
            &no_crit(),
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidCombatState { .. }));
        assert_eq!((attacker.clone(), defender.clone()), before);

        let mut ally = fighter(3, PieceKind::Pawn, Color::White);
        assert!(
            resolve_combat(
                &mut attacker,
                &mut ally,
                &CombatModifiers::default(),
                &no_crit(),
                &mut rng
            )
            .is_err()
        );

        let mut king = RpgPiece::plain(4, PieceKind::King, Color::Black);
        assert!(
            resolve_combat(
                &mut attacker,
                &mut king,
                &CombatModifiers::default(),
                &no_crit(),
                &mut rng
            )
            .is_err()
        );
    }
}
