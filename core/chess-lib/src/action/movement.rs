//! movement.rs：
//! - RPG 模式的走棋：棋盤效果改寫落點、吃子改為戰鬥、陷阱、擊倒獎勵與回合結果判定。
//! - 西洋棋合法性由 board crate 判定，這裡只做額外限制。
use crate::*;
use board::component::{Color, Move, Piece, PieceKind, Position};
use board::constants::PROMOTION_KINDS;
use board::logic::apply::apply_move;
use board::logic::board::ChessBoard;
use board::logic::movement::{en_passant_victim, is_promotion, legal_moves, validate_move};
use board::logic::status::is_in_check;
use serde::{Deserialize, Serialize};
use skills_lib::*;
use std::collections::BTreeSet;
use tracing::debug;

/// 一步棋的結果
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MoveReport {
    /// 已補上升變的走法
    pub mv: Move,
    /// 實際落點；攻擊被彈回時為 None
    pub landed: Option<Position>,
    pub combat: Option<CombatResult>,
    pub bounced: bool,
    pub captured: Option<PieceKind>,
    pub trap_damage: Option<i32>,
    pub status: RoundStatus,
}

/// 考慮棋盤效果後，`from` 上棋子可以選的目的地
pub fn rpg_legal_moves(
    state: &RpgGameState,
    from: Position,
    config: &GameConfig,
) -> Result<BTreeSet<Position>, Error> {
    let func = "rpg_legal_moves";

    state
        .chess
        .legal_moves(from)
        .map_err(|e| from_chess_error(func, e))?;
    Ok(rpg_moves_from(state, from, config)
        .into_iter()
        .map(|mv| mv.to)
        .collect())
}

/// 某方所有考慮棋盤效果後的合法走法，升變走法依可選種類展開
pub fn rpg_move_candidates(state: &RpgGameState, color: Color, config: &GameConfig) -> Vec<Move> {
    state
        .chess
        .board
        .pieces_of(color)
        .flat_map(|(pos, _)| rpg_moves_from(state, pos, config))
        .collect()
}

fn rpg_moves_from(state: &RpgGameState, from: Position, config: &GameConfig) -> Vec<Move> {
    let func = "rpg_moves_from";
    let board = &state.chess.board;
    legal_moves(board, from)
        .into_iter()
        .flat_map(|mv| {
            if is_promotion(board, mv) {
                PROMOTION_KINDS.iter().map(|kind| mv.with_promotion(*kind)).collect::<Vec<_>>()
            } else {
                vec![mv]
            }
        })
        .filter(|mv| ensure_rpg_move(state, *mv, config, func).is_ok())
        .collect()
}

// 吃子時被攻擊的格子，包含吃過路兵
fn capture_target(board: &ChessBoard, mv: Move, mover: Piece) -> Option<Position> {
    if !board.is_empty(mv.to) {
        Some(mv.to)
    } else if mover.kind == PieceKind::Pawn {
        en_passant_victim(board, mv.from, mv.to, mover.color)
    } else {
        None
    }
}

// 雙方都是 RPG 棋子時，吃子改為戰鬥
fn combatants(state: &RpgGameState, mv: Move, mover: Piece) -> Option<(&RpgPiece, &RpgPiece, Position)> {
    let target = capture_target(&state.chess.board, mv, mover)?;
    let attacker = state.piece_at(mv.from)?;
    let defender = state.piece_at(target)?;
    (attacker.rpg().is_some() && defender.rpg().is_some()).then_some((attacker, defender, target))
}

/// 西洋棋合法之外的額外限制，`mv` 必須已補上升變
///
/// 不論擲骰結果如何，走完後己方國王都不能被將軍：攻擊被彈回、攻擊方被反擊打倒、
/// 效果改變落點、踩中陷阱倒下都算。升變後的種類也受軍隊上限限制
fn ensure_rpg_move(
    state: &RpgGameState,
    mv: Move,
    config: &GameConfig,
    func: &'static str,
) -> Result<(), Error> {
    let chess_err = |e| from_chess_error(func, e);
    let illegal = |reason: &str| Error::IllegalMove {
        func,
        reason: format!("{mv}: {reason}"),
    };
    let board = &state.chess.board;
    let effects = &state.board_effects;

    if is_pit(effects, mv.to) {
        return Err(illegal("落點是坑洞"));
    }
    let mover = *board.get(mv.from).ok_or_else(|| illegal("起點沒有棋子"))?;

    if let Some((attacker, defender, target)) = combatants(state, mv, mover) {
        let modifiers = combat_modifiers(effects, mv.from, target);
        let forecast = forecast_combat(attacker, defender, &modifiers, &config.combat)?;
        if forecast.may_bounce {
            let mut bounced = board.clone();
            if forecast.may_defeat_attacker {
                bounced.remove(mv.from);
            }
            if is_in_check(&bounced, mover.color) {
                return Err(illegal("攻擊被彈回時己方國王會被將軍"));
            }
        }
    }

    let (mut after, outcome) = apply_move(board, mv).map_err(chess_err)?;
    let landing = resolve_landing(effects, &after, mv, outcome.moved, outcome.is_capture());
    if landing != mv.to {
        after.relocate(mv.to, landing).map_err(chess_err)?;
        if is_in_check(&after, mover.color) {
            return Err(illegal("棋盤效果改變落點後己方國王會被將軍"));
        }
    }

    if let (Some(kind), Some(pawn)) = (outcome.promoted_to, state.piece_at(mv.from)) {
        if pawn.color == PLAYER_COLOR {
            let others: Vec<RpgPiece> = state
                .player_army
                .iter()
                .filter(|p| p.id != pawn.id)
                .cloned()
                .collect();
            let promoted = RpgPiece {
                kind,
                ..pawn.clone()
            };
            state.army_capacity.check(&others, &promoted)?;
        }
    }

    if let Some(index) = trap_at(effects, landing) {
        let damage = effects[index].intensity;
        let lethal = state
            .piece_at(mv.from)
            .and_then(RpgPiece::rpg)
            .is_some_and(|attributes| attributes.hp - damage <= 0);
        if lethal {
            after.remove(landing);
            if is_in_check(&after, mover.color) {
                return Err(illegal("踩中陷阱倒下後己方國王會被將軍"));
            }
        }
    }
    Ok(())
}

/// 走一步棋
///
/// 雙方都是 RPG 棋子時吃子改為戰鬥：防守方倒下才真正吃掉，否則攻擊被彈回、
/// 兩個棋子留在原位，但這個半步仍然算數
pub fn submit_move<R: rand::Rng>(
    state: &RpgGameState,
    mv: Move,
    config: &GameConfig,
    rng: &mut R,
) -> Result<(RpgGameState, MoveReport), Error> {
    let func = "submit_move";
    let chess_err = |e| from_chess_error(func, e);

    state.ensure_round_active(func)?;
    state.chess.ensure_can_move(mv).map_err(chess_err)?;
    let mv = validate_move(&state.chess.board, mv).map_err(chess_err)?;
    ensure_rpg_move(state, mv, config, func)?;
    let mover_id = state.piece_at(mv.from).map(|p| p.id);
    let combat = state
        .chess
        .board
        .get(mv.from)
        .and_then(|mover| combatants(state, mv, *mover))
        .map(|(attacker, defender, target)| (attacker.clone(), defender.clone(), target));

    let mut next = state.clone();
    let mut report = MoveReport {
        mv,
        landed: None,
        combat: None,
        bounced: false,
        captured: None,
        trap_damage: None,
        status: state.status,
    };

    if let Some((mut attacker, mut defender, target)) = combat {
        let modifiers = combat_modifiers(&next.board_effects, mv.from, target);
        let result = resolve_combat(&mut attacker, &mut defender, &modifiers, &config.combat, rng)
            .map_err(|e| Error::Wrap {
                func,
                source: Box::new(e),
            })?;
        for piece in [attacker.clone(), defender.clone()] {
            if let Some(slot) = next.piece_mut(piece.id) {
                *slot = piece;
            }
        }
        let defeated = result.defender_defeated;
        let attacker_defeated = result.attacker_defeated;
        report.combat = Some(result);

        if !defeated {
            let mut board = next.chess.board.clone();
            board.clear_en_passant();
            if attacker_defeated {
                board.remove(mv.from);
                next.remove_piece(attacker.id);
            }
            next.chess = next.chess.record_ply(board, true);
            report.bounced = true;
            debug!(mv = %mv, attacker = attacker.id, defender = defender.id, "attack bounced");
            next.evaluate_round(config, false);
            report.status = next.status;
            return Ok((next, report));
        }
    }

    let (mut after, outcome) = apply_move(&next.chess.board, mv).map_err(chess_err)?;
    let landing = resolve_landing(
        &next.board_effects,
        &after,
        mv,
        outcome.moved,
        outcome.is_capture(),
    );
    if landing != mv.to {
        after.relocate(mv.to, landing).map_err(chess_err)?;
    }
    report.landed = Some(landing);

    let rook_id = outcome
        .castle_rook
        .and_then(|(rook_from, rook_to)| next.piece_at(rook_from).map(|p| (p.id, rook_to)));
    let captured_id = outcome
        .captured
        .and_then(|(pos, _)| next.piece_at(pos))
        .map(|p| p.id);

    let mut boss_defeated = false;
    if let Some((_, taken)) = outcome.captured {
        report.captured = Some(taken.kind);
        let removed = captured_id.and_then(|id| next.remove_piece(id));
        boss_defeated = removed.as_ref().is_some_and(RpgPiece::is_boss);
        if taken.color == ENEMY_COLOR {
            next.reward_defeat(mover_id, boss_defeated, config);
        }
    }
    if let Some((id, rook_to)) = rook_id {
        if let Some(rook) = next.piece_mut(id) {
            rook.position = Some(rook_to);
        }
    }
    if let Some(piece) = mover_id.and_then(|id| next.piece_mut(id)) {
        piece.position = Some(landing);
        if let Some(kind) = outcome.promoted_to {
            piece.kind = kind;
        }
    }

    // 陷阱只對 RPG 棋子生效
    if let Some(index) = trap_at(&next.board_effects, landing) {
        let damage = next.board_effects[index].intensity;
        let mut fallen = None;
        if let Some(piece) = mover_id.and_then(|id| next.piece_mut(id)) {
            if let Some(attributes) = piece.rpg_mut() {
                attributes.hp = (attributes.hp - damage).max(0);
                report.trap_damage = Some(damage);
                if !attributes.is_alive() {
                    fallen = Some(piece.id);
                }
            }
        }
        if report.trap_damage.is_some() {
            next.board_effects[index].is_active = false;
        }
        if let Some(id) = fallen {
            after.remove(landing);
            next.remove_piece(id);
            report.landed = None;
        }
    }

    next.chess = next.chess.record_ply(after, outcome.resets_halfmove_clock());
    debug!(
        mv = %mv,
        landing = %landing,
        capture = outcome.is_capture(),
        status = ?next.chess.status,
        "accepted rpg move"
    );
    next.evaluate_round(config, boss_defeated);
    report.status = next.status;
    Ok((next, report))
}

impl RpgGameState {
    /// 玩家吃掉敵方棋子的獎勵
    fn reward_defeat(&mut self, attacker: Option<PieceID>, boss: bool, config: &GameConfig) {
        let economy = &config.economy;
        self.earn(economy.coins_per_defeat, economy.score_per_defeat);
        // 擊倒首領同時算一次擊倒棋子
        self.record_quest_event(if boss {
            QuestEvent::BossDefeated
        } else {
            QuestEvent::PieceDefeated
        });
        let xp = config.progression.xp_per_defeat;
        if let Some(attributes) = attacker
            .and_then(|id| self.piece_mut(id))
            .and_then(RpgPiece::rpg_mut)
        {
            attributes.gain_xp(xp, &config.progression);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use board::component::Piece;
    use board::loader::load_from_ascii;
    use board::logic::game::GameState;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn pos(text: &str) -> Position {
        Position::from_algebraic(text).unwrap()
    }

    fn mv(from: &str, to: &str) -> Move {
        Move::parse(from, to).unwrap()
    }

    fn quiet_config() -> GameConfig {
        GameConfig {
            combat: CombatConfig {
                crit_chance_percent: 0,
                ..CombatConfig::default()
            },
            ..GameConfig::default()
        }
    }

    /// 以棋盤圖建立進行中的回合，所有非國王棋子都成為 RPG 棋子
    fn arena(ascii: &str) -> RpgGameState {
        let config = quiet_config();
        let mut state = RpgGameState::new("arena", &config).unwrap();
        let board = load_from_ascii(ascii).unwrap();
        state.player_army.clear();
        state.enemies.clear();
        let pieces: Vec<(Position, Piece)> = board.pieces().map(|(p, piece)| (p, *piece)).collect();
        for (at, piece) in pieces {
            if piece.kind == PieceKind::King {
                continue;
            }
            let mut rpg = state.mint_piece(piece.kind, piece.color, Rarity::Common);
            rpg.position = Some(at);
            if piece.color == PLAYER_COLOR {
                state.player_army.push(rpg);
            } else {
                state.enemies.push(rpg);
            }
        }
        state.chess = GameState::from_board(board, Color::White);
        state.status = RoundStatus::InProgress;
        state.current_round = 1;
        state
    }

    fn set_stats(state: &mut RpgGameState, at: &str, hp: i32, attack: i32, defense: i32) {
        let id = state.piece_at(pos(at)).unwrap().id;
        let attributes = state.piece_mut(id).unwrap().rpg_mut().unwrap();
        attributes.hp = hp;
        attributes.attack = attack;
        attributes.defense = defense;
        attributes.weaknesses.clear();
        attributes.ability = None;
    }

    const DUEL: &str = r#"
        . . . . k . . .
        . . . . . . . .
        . . . . . . . .
        . . . p . . . .
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
        . . . R K . . .
    "#;

    #[test]
    fn test_capture_after_defeat() {
        let config = quiet_config();
        let mut state = arena(DUEL);
        set_stats(&mut state, "d1", 20, 10, 0);
        set_stats(&mut state, "d5", 5, 1, 0);
        let (next, report) = submit_move(&state, mv("d1", "d5"), &config, &mut StdRng::seed_from_u64(1)).unwrap();
        let combat = report.combat.unwrap();
        assert!(combat.defender_defeated);
        assert_eq!(report.landed, Some(pos("d5")));
        assert_eq!(report.captured, Some(PieceKind::Pawn));
        assert!(next.enemies.is_empty());
        assert_eq!(next.piece_at(pos("d5")).unwrap().kind, PieceKind::Rook);
        assert_eq!(next.coins, state.coins + 10);
        assert_eq!(next.score, 100);
        assert_eq!(next.player_army[0].rpg().unwrap().xp, 20);
        assert_eq!(next.chess.current_turn, Color::Black);
    }

    #[test]
    fn test_attack_bounces_when_defender_survives() {
        let config = quiet_config();
        let mut state = arena(DUEL);
        set_stats(&mut state, "d1", 20, 3, 0);
        set_stats(&mut state, "d5", 10, 1, 1);
        let (next, report) = submit_move(&state, mv("d1", "d5"), &config, &mut StdRng::seed_from_u64(1)).unwrap();
        assert!(report.bounced);
        assert_eq!(report.landed, None);
        assert_eq!(next.chess.board.get(pos("d1")).map(|p| p.kind), Some(PieceKind::Rook));
        assert_eq!(next.chess.board.get(pos("d5")).map(|p| p.kind), Some(PieceKind::Pawn));
        assert_eq!(next.enemies[0].rpg().unwrap().hp, 8);
        assert_eq!(next.chess.current_turn, Color::Black);
        assert_eq!(next.chess.move_count, 1);
    }

    #[test]
    fn test_counter_can_defeat_attacker() {
        let config = quiet_config();
        let mut state = arena(DUEL);
        set_stats(&mut state, "d1", 2, 3, 0);
        set_stats(&mut state, "d5", 10, 5, 1);
        let id = state.piece_at(pos("d5")).unwrap().id;
        state.piece_mut(id).unwrap().rpg_mut().unwrap().ability = Some(Ability::Counter);
        let (next, report) = submit_move(&state, mv("d1", "d5"), &config, &mut StdRng::seed_from_u64(1)).unwrap();
        assert!(report.bounced);
        assert!(report.combat.unwrap().attacker_defeated);
        assert!(next.player_army.is_empty());
        assert!(next.chess.board.is_empty(pos("d1")));
    }

    #[test]
    fn test_illegal_and_inactive_moves_rejected() {
        let config = quiet_config();
        let state = arena(DUEL);
        let mut rng = StdRng::seed_from_u64(0);
        let err = submit_move(&state, mv("d1", "e2"), &config, &mut rng).unwrap_err();
        assert!(matches!(err, Error::IllegalMove { .. }));
        let err = submit_move(&state, mv("d5", "d4"), &config, &mut rng).unwrap_err();
        assert!(matches!(err, Error::IllegalMove { .. }));

        let mut finished = state.clone();
        finished.status = RoundStatus::RoundComplete {
            outcome: RoundOutcome::Draw,
        };
        let err = submit_move(&finished, mv("d1", "d2"), &config, &mut rng).unwrap_err();
        assert!(matches!(err, Error::InvalidTransition { .. }));
    }

    #[test]
    fn test_pit_and_teleport() {
        let config = quiet_config();
        let state = arena(DUEL);
        let state = apply_effect(
            &state,
            BoardEffect::new(EffectKind::Pit { tile: pos("d3") }, 1, Lifetime::Permanent),
            &config,
        )
        .unwrap();
        let state = apply_effect(
            &state,
            BoardEffect::new(
                EffectKind::Teleport {
                    a: pos("a1"),
                    b: pos("h6"),
                },
                1,
                Lifetime::Permanent,
            ),
            &config,
        )
        .unwrap();
        let destinations = rpg_legal_moves(&state, pos("d1"), &config).unwrap();
        assert!(destinations.contains(&pos("d2")));
        assert!(!destinations.contains(&pos("d3")));

        let mut rng = StdRng::seed_from_u64(0);
        let err = submit_move(&state, mv("d1", "d3"), &config, &mut rng).unwrap_err();
        assert!(matches!(err, Error::IllegalMove { .. }));

        let (next, report) = submit_move(&state, mv("d1", "a1"), &config, &mut rng).unwrap();
        assert_eq!(report.landed, Some(pos("h6")));
        assert_eq!(next.player_army[0].position, Some(pos("h6")));
        assert!(next.chess.board.is_empty(pos("a1")));
    }

    const PINNED: &str = r#"
        k . . . r . . .
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
        . . . . R . . .
        . . . . K . . .
    "#;

    #[test]
    fn test_counter_death_cannot_expose_king() {
        let config = quiet_config();
        let mut state = arena(PINNED);
        set_stats(&mut state, "e2", 1, 3, 0);
        set_stats(&mut state, "e8", 50, 5, 1);
        let mut countering = state.clone();
        let id = countering.piece_at(pos("e8")).unwrap().id;
        countering.piece_mut(id).unwrap().rpg_mut().unwrap().ability = Some(Ability::Counter);

        let mut rng = StdRng::seed_from_u64(0);
        let err = submit_move(&countering, mv("e2", "e8"), &config, &mut rng).unwrap_err();
        assert!(matches!(err, Error::IllegalMove { .. }));
        let destinations = rpg_legal_moves(&countering, pos("e2"), &config).unwrap();
        assert!(destinations.contains(&pos("e7")));
        assert!(!destinations.contains(&pos("e8")));

        // 沒有反擊時攻擊方留在原位，仍擋住將軍
        let (next, report) = submit_move(&state, mv("e2", "e8"), &config, &mut rng).unwrap();
        assert!(report.bounced);
        assert!(!is_in_check(&next.chess.board, Color::White));
    }

    #[test]
    fn test_bounce_cannot_leave_king_in_check() {
        let config = quiet_config();
        let ascii = r#"
            k . . . . . . .
            . . . . . . . .
            . . . . . . . .
            R . . . r . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . K . . .
        "#;
        let mut state = arena(ascii);
        set_stats(&mut state, "a5", 20, 10, 0);
        set_stats(&mut state, "e5", 50, 1, 0);
        let mut rng = StdRng::seed_from_u64(0);
        let err = submit_move(&state, mv("a5", "e5"), &config, &mut rng).unwrap_err();
        assert!(matches!(err, Error::IllegalMove { .. }));
        assert!(
            !rpg_move_candidates(&state, Color::White, &config)
                .iter()
                .any(|m| m.from == pos("a5"))
        );

        set_stats(&mut state, "e5", 5, 1, 0);
        let (next, report) = submit_move(&state, mv("a5", "e5"), &config, &mut rng).unwrap();
        assert_eq!(report.captured, Some(PieceKind::Rook));
        assert!(!is_in_check(&next.chess.board, Color::White));
    }

    #[test]
    fn test_trap_death_cannot_expose_king() {
        let config = quiet_config();
        let mut state = arena(PINNED);
        set_stats(&mut state, "e2", 5, 3, 0);
        let state = apply_effect(
            &state,
            BoardEffect::new(EffectKind::Trap { tile: pos("e4") }, 10, Lifetime::Permanent),
            &config,
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let err = submit_move(&state, mv("e2", "e4"), &config, &mut rng).unwrap_err();
        assert!(matches!(err, Error::IllegalMove { .. }));
        assert!(submit_move(&state, mv("e2", "e3"), &config, &mut rng).is_ok());
    }

    #[test]
    fn test_promotion_respects_army_capacity() {
        let config = quiet_config();
        let state = arena(
            r#"
            . . . . k . . .
            P . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . Q Q K . . .
            "#,
        );
        let mut rng = StdRng::seed_from_u64(0);
        let err = submit_move(&state, mv("a7", "a8"), &config, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            Error::CapacityExceeded {
                kind: PieceKind::Queen,
                limit: 2,
                ..
            }
        ));
        let candidates = rpg_move_candidates(&state, Color::White, &config);
        assert!(!candidates.contains(&mv("a7", "a8").with_promotion(PieceKind::Queen)));
        assert!(candidates.contains(&mv("a7", "a8").with_promotion(PieceKind::Knight)));

        let knight = mv("a7", "a8").with_promotion(PieceKind::Knight);
        let (next, _) = submit_move(&state, knight, &config, &mut rng).unwrap();
        let promoted = next.piece_at(pos("a8")).unwrap();
        assert_eq!(promoted.kind, PieceKind::Knight);
        let queens = next
            .player_army
            .iter()
            .filter(|p| p.kind == PieceKind::Queen)
            .count();
        assert_eq!(queens, 2);
    }

    #[test]
    fn test_trap_damages_once() {
        let config = quiet_config();
        let state = arena(DUEL);
        let state = apply_effect(
            &state,
            BoardEffect::new(EffectKind::Trap { tile: pos("d3") }, 4, Lifetime::Permanent),
            &config,
        )
        .unwrap();
        let hp = state.player_army[0].rpg().unwrap().hp;
        let mut rng = StdRng::seed_from_u64(0);
        let (next, report) = submit_move(&state, mv("d1", "d3"), &config, &mut rng).unwrap();
        assert_eq!(report.trap_damage, Some(4));
        assert_eq!(next.player_army[0].rpg().unwrap().hp, hp - 4);
        assert!(!next.board_effects[0].is_active);
    }

    #[test]
    fn test_checkmate_wins_round() {
        let config = quiet_config();
        let state = arena(
            r#"
            . . . . . . . k
            . . . . . . p p
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            R . . . K . . .
            "#,
        );
        let mut rng = StdRng::seed_from_u64(0);
        let (next, report) = submit_move(&state, mv("a1", "a8"), &config, &mut rng).unwrap();
        assert!(next.chess.is_checkmate());
        assert_eq!(
            report.status,
            RoundStatus::RoundComplete {
                outcome: RoundOutcome::Victory
            }
        );
        assert_eq!(next.coins, state.coins + config.economy.round_win_coins);
        assert!(submit_move(&next, mv("e1", "e2"), &config, &mut rng).is_err());
    }

    #[test]
    fn test_boss_defeat_ends_round() {
        let config = quiet_config();
        let mut state = arena(DUEL);
        state.status = RoundStatus::BossRound;
        let id = state.piece_at(pos("d5")).unwrap().id;
        state.piece_mut(id).unwrap().rpg_mut().unwrap().is_boss = true;
        set_stats(&mut state, "d1", 20, 50, 0);
        let state = state
            .accept_quest(
                QuestTemplate {
                    id: "boss".to_string(),
                    kind: QuestKind::DefeatBoss,
                    reward_coins: 0,
                    reward_xp: 0,
                },
                &config,
            )
            .unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let (next, report) = submit_move(&state, mv("d1", "d5"), &config, &mut rng).unwrap();
        assert_eq!(
            report.status,
            RoundStatus::RoundComplete {
                outcome: RoundOutcome::Victory
            }
        );
        assert!(next.quests[0].is_complete());
        let economy = &config.economy;
        assert_eq!(
            next.coins,
            state.coins + economy.coins_per_defeat + economy.round_win_coins + economy.boss_bonus_coins
        );
    }
}
