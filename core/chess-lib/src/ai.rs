//! ai.rs：
//! - 敵方回合的掛鉤：由 OpponentPolicy 從合法走法中挑一步，再照一般走棋流程提交。
//! - 不含任何走棋策略，策略由外部實作。
use crate::*;
use board::component::Move;
use tracing::debug;

pub trait OpponentPolicy {
    /// 從候選走法中選一步；回傳 None 表示放棄
    fn choose_move(&mut self, state: &RpgGameState, candidates: &[Move]) -> Option<Move>;
}

/// 永遠選第一個候選走法，測試用
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstLegalMove;

impl OpponentPolicy for FirstLegalMove {
    fn choose_move(&mut self, _state: &RpgGameState, candidates: &[Move]) -> Option<Move> {
        candidates.first().copied()
    }
}

/// 讓敵方走一步
pub fn play_opponent_turn<P: OpponentPolicy, R: rand::Rng>(
    state: &RpgGameState,
    policy: &mut P,
    config: &GameConfig,
    rng: &mut R,
) -> Result<(RpgGameState, MoveReport), Error> {
    let func = "play_opponent_turn";

    state.ensure_round_active(func)?;
    if state.chess.current_turn != ENEMY_COLOR {
        return Err(Error::InvalidTransition {
            func,
            state: format!("輪到 {}", state.chess.current_turn),
        });
    }
    let candidates = rpg_move_candidates(state, ENEMY_COLOR, config);
    let mv = policy
        .choose_move(state, &candidates)
        .ok_or_else(|| Error::InvalidTransition {
            func,
            state: "敵方沒有選擇走法".to_string(),
        })?;
    // 升變未指定時與候選走法比較起訖點即可
    if !candidates.iter().any(|c| c.from == mv.from && c.to == mv.to) {
        return Err(Error::IllegalMove {
            func,
            reason: format!("{mv} 不在候選走法中"),
        });
    }
    debug!(mv = %mv, candidates = candidates.len(), "opponent chose move");
    submit_move(state, mv, config, rng).map_err(|e| Error::Wrap {
        func,
        source: Box::new(e),
    })
}
