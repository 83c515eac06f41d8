//! effect.rs：
//! - 棋盤效果（BoardEffect）：傳送門、增益格、陷阱、坑洞、滑行格，以及棋盤放大/縮小。
//! - 效果依加入順序存放，到期與觸發都照此順序處理，結果可重現。
//! - 只改變落點與戰鬥數值，不改變西洋棋本身的走法幾何。
use crate::*;
use board::alias::Delta;
use board::component::{Move, Piece, PieceKind, Position};
use board::logic::board::ChessBoard;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BoostStat {
    Attack,
    Defense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Display)]
#[serde(rename_all = "snake_case", tag = "type")]
#[strum(serialize_all = "snake_case")]
pub enum EffectKind {
    /// 落在任一端時移到另一端（另一端必須是空格）
    Teleport { a: Position, b: Position },
    /// 站在此格時攻擊或防禦增加 intensity
    Boost { tile: Position, stat: BoostStat },
    /// 落在此格的 RPG 棋子受到 intensity 傷害，觸發一次後失效
    Trap { tile: Position },
    /// 任何棋子都不能落在此格
    Pit { tile: Position },
    /// 滑行棋子落在此格後沿原方向繼續滑到被擋住為止
    Slippery { tile: Position },
    /// 棋盤邊長增加 intensity，套用後立即失效
    SizeIncrease,
    SizeDecrease,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifetime {
    Permanent,
    /// 到此回合結束為止
    UntilRound(Round),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BoardEffect {
    pub id: EffectID,
    pub kind: EffectKind,
    pub intensity: i32,
    pub is_active: bool,
    pub lifetime: Lifetime,
}

impl BoardEffect {
    /// 尚未編號的效果，`apply_effect` 時才分配 id
    pub fn new(kind: EffectKind, intensity: i32, lifetime: Lifetime) -> Self {
        Self {
            id: 0,
            kind,
            intensity,
            is_active: true,
            lifetime,
        }
    }

    /// 影響的格子；尺寸效果影響整個棋盤，回傳空集合
    pub fn positions(&self) -> Vec<Position> {
        match self.kind {
            EffectKind::Teleport { a, b } => vec![a, b],
            EffectKind::Boost { tile, .. }
            | EffectKind::Trap { tile }
            | EffectKind::Pit { tile }
            | EffectKind::Slippery { tile } => vec![tile],
            EffectKind::SizeIncrease | EffectKind::SizeDecrease => Vec::new(),
        }
    }

    pub fn covers(&self, pos: Position) -> bool {
        self.positions().contains(&pos)
    }

    pub fn is_expired(&self, round: Round) -> bool {
        match self.lifetime {
            Lifetime::Permanent => false,
            Lifetime::UntilRound(last) => last < round,
        }
    }
}

fn active(effects: &[BoardEffect]) -> impl Iterator<Item = &BoardEffect> {
    effects.iter().filter(|e| e.is_active)
}

pub fn is_pit(effects: &[BoardEffect], pos: Position) -> bool {
    active(effects).any(|e| e.kind == EffectKind::Pit { tile: pos })
}

/// 在 `pos` 上仍有效的陷阱索引
pub fn trap_at(effects: &[BoardEffect], pos: Position) -> Option<usize> {
    effects
        .iter()
        .position(|e| e.is_active && e.kind == EffectKind::Trap { tile: pos })
}

/// 套用一個效果，回傳新快照
///
/// 尺寸效果立即改變棋盤邊長，超出範圍時回傳 `InvalidBoardSize` 且快照不變
pub fn apply_effect(
    state: &RpgGameState,
    effect: BoardEffect,
    config: &GameConfig,
) -> Result<RpgGameState, Error> {
    let func = "apply_effect";
    let invalid = |reason: String| Error::InvalidEffect { func, reason };

    state.ensure_not_over(func)?;
    if effect.intensity < 1 {
        return Err(invalid(format!("強度 {} 必須大於 0", effect.intensity)));
    }

    let mut next = state.clone();
    let mut effect = BoardEffect {
        id: next.next_effect_id,
        is_active: true,
        ..effect
    };
    next.next_effect_id += 1;

    match effect.kind {
        EffectKind::SizeIncrease | EffectKind::SizeDecrease => {
            let size = state.board_size as i64;
            let step = effect.intensity as i64;
            let target = if effect.kind == EffectKind::SizeIncrease {
                size + step
            } else {
                size - step
            };
            let (min, max) = (config.board.min_size as i64, config.board.max_size as i64);
            if !(min..=max).contains(&target) {
                return Err(Error::InvalidBoardSize {
                    func,
                    reason: format!("邊長 {target} 不在 [{min}, {max}] 之內"),
                });
            }
            let target = target as usize;
            let board = state
                .chess
                .board
                .resized(target)
                .map_err(|e| from_chess_error(func, e))?;
            next.chess = state.chess.with_board(board);
            next.board_size = target;
            next.board_effects
                .retain(|e| e.positions().iter().all(|p| p.row < target && p.col < target));
            effect.is_active = false;
        }
        _ => {
            let board = &state.chess.board;
            let positions = effect.positions();
            if let Some(pos) = positions.iter().find(|p| !board.is_valid_position(**p)) {
                return Err(invalid(format!("位置 {pos} 超出棋盤")));
            }
            if let EffectKind::Teleport { a, b } = effect.kind {
                if a == b {
                    return Err(invalid("傳送門兩端不能相同".to_string()));
                }
            }
            if let Some(pos) = positions
                .iter()
                .find(|p| active(&state.board_effects).any(|e| e.covers(**p)))
            {
                return Err(invalid(format!("位置 {pos} 已有其他效果")));
            }
            if let EffectKind::Pit { tile } = effect.kind {
                if !board.is_empty(tile) {
                    return Err(invalid(format!("坑洞 {tile} 上已有棋子")));
                }
            }
        }
    }

    debug!(id = effect.id, kind = %effect.kind, intensity = effect.intensity, "applied board effect");
    next.board_effects.push(effect);
    Ok(next)
}

/// 回合轉換時處理到期：過期或已失效的效果依插入順序移除
pub fn expire_effects(state: &RpgGameState, round: Round) -> RpgGameState {
    let mut next = state.clone();
    for effect in &mut next.board_effects {
        if effect.is_active && effect.is_expired(round) {
            effect.is_active = false;
            debug!(id = effect.id, kind = %effect.kind, round, "board effect expired");
        }
    }
    next.board_effects.retain(|e| e.is_active);
    next
}

/// 效果改寫後的落點
///
/// 吃子、兵與國王不受影響；`board` 是走完後的棋盤
pub fn resolve_landing(
    effects: &[BoardEffect],
    board: &ChessBoard,
    mv: Move,
    piece: Piece,
    is_capture: bool,
) -> Position {
    if is_capture || matches!(piece.kind, PieceKind::Pawn | PieceKind::King) {
        return mv.to;
    }
    for effect in active(effects) {
        match effect.kind {
            EffectKind::Teleport { a, b } if mv.to == a || mv.to == b => {
                let exit = if mv.to == a { b } else { a };
                if board.is_empty(exit) && !is_pit(effects, exit) {
                    return exit;
                }
                return mv.to;
            }
            EffectKind::Slippery { tile } if tile == mv.to && piece.kind.is_slider() => {
                let d_row = (mv.to.row as Delta - mv.from.row as Delta).signum();
                let d_col = (mv.to.col as Delta - mv.from.col as Delta).signum();
                let mut current = mv.to;
                while let Some(next) = board.step(current, d_row, d_col) {
                    if !board.is_empty(next) || is_pit(effects, next) {
                        break;
                    }
                    current = next;
                }
                return current;
            }
            _ => {}
        }
    }
    mv.to
}

/// 雙方所站格子上的增益
pub fn combat_modifiers(
    effects: &[BoardEffect],
    attacker_pos: Position,
    defender_pos: Position,
) -> CombatModifiers {
    let mut modifiers = CombatModifiers::default();
    for effect in active(effects) {
        let EffectKind::Boost { tile, stat } = effect.kind else {
            continue;
        };
        match (stat, tile == attacker_pos, tile == defender_pos) {
            (BoostStat::Attack, true, _) => modifiers.attacker_attack += effect.intensity,
            (BoostStat::Defense, true, _) => modifiers.attacker_defense += effect.intensity,
            (BoostStat::Attack, _, true) => modifiers.defender_attack += effect.intensity,
            (BoostStat::Defense, _, true) => modifiers.defender_defense += effect.intensity,
            _ => {}
        }
    }
    modifiers
}

/// 在中間列的空格上隨機產生本回合的棋盤效果
pub fn generate_round_effects<R: rand::Rng>(
    state: &RpgGameState,
    config: &GameConfig,
    rng: &mut R,
) -> RpgGameState {
    let mut next = state.clone();
    let board = &state.chess.board;
    let size = board.size();
    let round = state.current_round;
    let lifetime = Lifetime::UntilRound(round + config.rounds.effect_duration.max(1) - 1);

    let mut tiles: Vec<Position> = (2..size.saturating_sub(2))
        .flat_map(|row| (0..size).map(move |col| Position::new(row, col)))
        .filter(|pos| board.is_empty(*pos))
        .filter(|pos| !active(&state.board_effects).any(|e| e.covers(*pos)))
        .collect();
    tiles.shuffle(rng);

    for _ in 0..config.rounds.effects_per_round {
        let Some(tile) = tiles.pop() else {
            break;
        };
        let (kind, intensity) = match rng.random_range(0..5) {
            0 => {
                let stat = if rng.random_bool(0.5) {
                    BoostStat::Attack
                } else {
                    BoostStat::Defense
                };
                (EffectKind::Boost { tile, stat }, 2)
            }
            1 => (EffectKind::Trap { tile }, 2 + round as i32 / 2),
            2 => (EffectKind::Pit { tile }, 1),
            3 => match tiles.pop() {
                Some(b) => (EffectKind::Teleport { a: tile, b }, 1),
                None => (EffectKind::Slippery { tile }, 1),
            },
            _ => (EffectKind::Slippery { tile }, 1),
        };
        let effect = BoardEffect {
            id: next.next_effect_id,
            kind,
            intensity,
            is_active: true,
            lifetime,
        };
        next.next_effect_id += 1;
        debug!(id = effect.id, kind = %effect.kind, round, "generated board effect");
        next.board_effects.push(effect);
    }
    next
}
