//! ability.rs：
//! - 主動能力的發動：治療、強化防禦、狂暴。
//! - 每個棋子每回合只能發動一次，反擊為被動能力不能手動發動。
use crate::*;
use skills_lib::*;
use tracing::debug;

impl RpgGameState {
    pub fn activate_ability(&self, piece_id: PieceID, config: &GameConfig) -> Result<Self, Error> {
        let func = "activate_ability";

        self.ensure_round_active(func)?;
        let round = self.current_round;
        let mut next = self.clone();
        let piece = next
            .player_army
            .iter_mut()
            .find(|p| p.id == piece_id)
            .ok_or(Error::PieceNotFound { func, piece_id })?;
        let attributes = piece
            .rpg_mut()
            .ok_or(Error::NotRpgPiece { func, piece_id })?;
        let ability = attributes
            .ability
            .ok_or(Error::NoAbility { func, piece_id })?;
        if ability.is_passive() {
            return Err(Error::AbilityPassive { func, ability });
        }
        if attributes.last_ability_round == Some(round) {
            return Err(Error::AbilityOnCooldown { func, piece_id });
        }

        let abilities = &config.abilities;
        match ability {
            Ability::Heal => {
                let amount = attributes.max_hp * abilities.heal_percent as i32 / 100;
                attributes.hp = (attributes.hp + amount.max(1)).min(attributes.max_hp);
            }
            Ability::Fortify => attributes.defense_bonus += abilities.fortify_defense,
            Ability::Berserk => attributes.attack_bonus += abilities.berserk_attack,
            Ability::Counter => {}
        }
        attributes.last_ability_round = Some(round);
        debug!(piece_id, %ability, hp = attributes.hp, "activated ability");
        Ok(next)
    }
}
