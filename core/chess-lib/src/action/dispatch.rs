//! dispatch.rs：
//! - GameAction 列舉所有會修改快照的操作，ActionRecord 加上序號。
//! - dispatch 依序號套用單一行動並記錄；replay 先依序號排序再逐一套用。
use crate::*;
use board::component::Move;
use serde::{Deserialize, Serialize};
use skills_lib::*;
use strum_macros::Display;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Display)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum GameAction {
    ProgressToNextRound,
    SubmitMove { mv: Move },
    AddPieceToArmy { piece: RpgPiece },
    UpdateScore { delta: Score },
    UpdateCoins { delta: Coins },
    PurchaseShopItem { item: ShopItem },
    ApplyEffect { effect: BoardEffect },
    ActivateAbility { piece_id: PieceID },
    AcceptQuest { template: QuestTemplate },
    CompleteQuest { quest_id: QuestID },
    AwardXp { piece_id: PieceID, xp: Xp },
    EndGame { victory: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ActionRecord {
    pub sequence_number: SequenceNumber,
    pub action: GameAction,
}

impl ActionRecord {
    pub fn new(sequence_number: SequenceNumber, action: GameAction) -> Self {
        Self {
            sequence_number,
            action,
        }
    }
}

/// 套用一筆行動，成功後記錄到快照的行動紀錄
///
/// 序號必須大於上一筆紀錄，否則回傳 `OutOfOrder`
pub fn dispatch<R: rand::Rng>(
    state: &RpgGameState,
    record: &ActionRecord,
    config: &GameConfig,
    rng: &mut R,
) -> Result<RpgGameState, Error> {
    let func = "dispatch";

    if let Some(last) = state.action_log.last() {
        if record.sequence_number <= last.sequence_number {
            return Err(Error::OutOfOrder {
                func,
                last: last.sequence_number,
                got: record.sequence_number,
            });
        }
    }

    let mut next = match &record.action {
        GameAction::ProgressToNextRound => state.progress_to_next_round(config, rng)?,
        GameAction::SubmitMove { mv } => submit_move(state, *mv, config, rng)?.0,
        GameAction::AddPieceToArmy { piece } => state.add_piece_to_army(piece.clone())?,
        GameAction::UpdateScore { delta } => state.update_score(*delta)?,
        GameAction::UpdateCoins { delta } => state.update_coins(*delta)?,
        GameAction::PurchaseShopItem { item } => state.purchase_shop_item(item, config)?,
        GameAction::ApplyEffect { effect } => apply_effect(state, effect.clone(), config)?,
        GameAction::ActivateAbility { piece_id } => state.activate_ability(*piece_id, config)?,
        GameAction::AcceptQuest { template } => state.accept_quest(template.clone(), config)?,
        GameAction::CompleteQuest { quest_id } => state.complete_quest(quest_id, config)?,
        GameAction::AwardXp { piece_id, xp } => state.award_xp(*piece_id, *xp, config)?,
        GameAction::EndGame { victory } => state.end_game(*victory)?,
    };
    debug!(
        game_id = %next.game_id,
        sequence = record.sequence_number,
        action = %record.action,
        "dispatched action"
    );
    next.action_log.push(record.clone());
    Ok(next)
}

/// 依序號排序後逐一套用，遇到第一個錯誤就停止
pub fn replay<R: rand::Rng>(
    state: &RpgGameState,
    records: &[ActionRecord],
    config: &GameConfig,
    rng: &mut R,
) -> Result<RpgGameState, Error> {
    let func = "replay";

    let mut ordered: Vec<&ActionRecord> = records.iter().collect();
    ordered.sort_by_key(|r| r.sequence_number);
    let mut current = state.clone();
    for record in ordered {
        current = dispatch(&current, record, config, rng).map_err(|e| Error::Wrap {
            func,
            source: Box::new(e),
        })?;
    }
    Ok(current)
}
