//! quest.rs：
//! - 任務接取、進度、完成獎勵與經驗值分配。
//! - 進度由遊戲事件推進（擊倒棋子、贏得回合、賺取金幣、擊倒首領）。
use crate::*;
use serde::{Deserialize, Serialize};
use skills_lib::*;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ActiveQuest {
    pub template: QuestTemplate,
    pub progress: u32,
}

impl ActiveQuest {
    pub fn is_complete(&self) -> bool {
        self.progress >= self.template.kind.target()
    }
}

impl RpgGameState {
    pub fn accept_quest(&self, template: QuestTemplate, config: &GameConfig) -> Result<Self, Error> {
        let func = "accept_quest";

        self.ensure_not_over(func)?;
        let quest_id = template.id.clone();
        if self.completed_quests.contains(&quest_id)
            || self.quests.iter().any(|q| q.template.id == quest_id)
        {
            return Err(Error::QuestAlreadyActive { func, quest_id });
        }
        if self.quests.len() >= config.quests.max_active {
            return Err(Error::TooManyQuests {
                func,
                max: config.quests.max_active,
            });
        }

        let mut next = self.clone();
        next.quests.push(ActiveQuest {
            template,
            progress: 0,
        });
        Ok(next)
    }

    /// 領取任務獎勵：金幣直接入帳，經驗平均分給存活的軍隊
    pub fn complete_quest(&self, quest_id: &str, config: &GameConfig) -> Result<Self, Error> {
        let func = "complete_quest";

        self.ensure_not_over(func)?;
        let index = self
            .quests
            .iter()
            .position(|q| q.template.id == quest_id)
            .ok_or_else(|| Error::QuestNotFound {
                func,
                quest_id: quest_id.to_string(),
            })?;
        let quest = &self.quests[index];
        if !quest.is_complete() {
            return Err(Error::QuestNotComplete {
                func,
                quest_id: quest_id.to_string(),
                progress: quest.progress,
                target: quest.template.kind.target(),
            });
        }

        let mut next = self.clone();
        let quest = next.quests.remove(index);
        next.coins = next.coins.saturating_add(quest.template.reward_coins as Coins);
        next.share_xp(quest.template.reward_xp, config);
        next.completed_quests.insert(quest.template.id.clone());
        info!(
            game_id = %next.game_id,
            quest = %quest.template.id,
            coins = quest.template.reward_coins,
            xp = quest.template.reward_xp,
            "quest completed"
        );
        Ok(next)
    }

    /// 給軍隊中的一個棋子經驗值，足夠時升級
    pub fn award_xp(&self, piece_id: PieceID, xp: Xp, config: &GameConfig) -> Result<Self, Error> {
        let func = "award_xp";

        self.ensure_not_over(func)?;
        let mut next = self.clone();
        let piece = next
            .player_army
            .iter_mut()
            .find(|p| p.id == piece_id)
            .ok_or(Error::PieceNotFound { func, piece_id })?;
        let attributes = piece
            .rpg_mut()
            .ok_or(Error::NotRpgPiece { func, piece_id })?;
        let levels = attributes.gain_xp(xp, &config.progression);
        if levels > 0 {
            info!(piece_id, level = attributes.level, "piece leveled up");
        }
        Ok(next)
    }

    /// 經驗平均分配，餘數依軍隊順序補給前面的棋子
    pub(crate) fn share_xp(&mut self, xp: Xp, config: &GameConfig) {
        let mut living: Vec<&mut RpgAttributes> = self
            .player_army
            .iter_mut()
            .filter_map(RpgPiece::rpg_mut)
            .filter(|a| a.is_alive())
            .collect();
        if living.is_empty() {
            return;
        }
        let count = living.len() as Xp;
        let (share, remainder) = (xp / count, xp % count);
        for (i, attributes) in living.iter_mut().enumerate() {
            let extra = if (i as Xp) < remainder { 1 } else { 0 };
            attributes.gain_xp(share + extra, &config.progression);
        }
    }

    pub(crate) fn record_quest_event(&mut self, event: QuestEvent) {
        for quest in &mut self.quests {
            let gained = quest.template.kind.progress_for(event);
            if gained > 0 {
                let target = quest.template.kind.target();
                quest.progress = quest.progress.saturating_add(gained).min(target);
            }
        }
    }
}
