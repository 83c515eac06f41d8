//! game.rs：
//! - RPG 遊戲快照（RpgGameState）與回合狀態機：Setup → InProgress/BossRound → RoundComplete → … → GameOver。
//! - 每個操作都複製快照後修改，失敗時回傳錯誤且原快照不變。
//! - 部署軍隊與產生敵方陣容也在這裡。
use crate::*;
use board::alias::Coord;
use board::component::{Color, Piece, PieceKind, Position};
use board::constants::BACK_RANK;
use board::logic::board::{ChessBoard, standard_col_offset};
use board::logic::game::{GameState, GameStatus};
use serde::{Deserialize, Serialize};
use skills_lib::*;
use std::collections::BTreeSet;
use strum_macros::Display;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Display)]
pub enum RoundOutcome {
    Victory,
    Draw,
    Defeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Display)]
pub enum GameOverReason {
    Victory,
    Defeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Display)]
pub enum RoundStatus {
    Setup,
    InProgress,
    BossRound,
    RoundComplete { outcome: RoundOutcome },
    GameOver { reason: GameOverReason },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RpgGameState {
    pub game_id: GameID,
    pub current_round: Round,
    pub status: RoundStatus,
    pub chess: GameState,
    /// 依加入順序排列
    pub player_army: Vec<RpgPiece>,
    pub enemies: Vec<RpgPiece>,
    /// 依加入順序排列，到期與觸發都照此順序處理
    pub board_effects: Vec<BoardEffect>,
    pub board_size: Coord,
    pub army_capacity: ArmyCapacity,
    pub lives: Lives,
    pub score: Score,
    pub coins: Coins,
    pub is_game_over: bool,
    pub quests: Vec<ActiveQuest>,
    pub completed_quests: BTreeSet<QuestID>,
    pub action_log: Vec<ActionRecord>,
    pub next_piece_id: PieceID,
    pub next_effect_id: EffectID,
}

impl RpgGameState {
    /// 新遊戲，狀態為 Setup，軍隊由設定的初始棋子組成
    pub fn new(game_id: impl Into<GameID>, config: &GameConfig) -> Result<Self, Error> {
        config.validate()?;
        let mut state = Self {
            game_id: game_id.into(),
            current_round: 0,
            status: RoundStatus::Setup,
            chess: GameState::new(),
            player_army: Vec::new(),
            enemies: Vec::new(),
            board_effects: Vec::new(),
            board_size: config.board.base_size,
            army_capacity: ArmyCapacity::from(&config.capacity),
            lives: config.economy.starting_lives,
            score: 0,
            coins: config.economy.starting_coins,
            is_game_over: false,
            quests: Vec::new(),
            completed_quests: BTreeSet::new(),
            action_log: Vec::new(),
            next_piece_id: 1,
            next_effect_id: 1,
        };
        for &kind in &config.starting_army.pieces {
            let piece = state.mint_piece(kind, PLAYER_COLOR, Rarity::Common);
            state.army_capacity.check(&state.player_army, &piece)?;
            state.player_army.push(piece);
        }
        state.deploy(config)?;
        Ok(state)
    }

    pub fn is_round_active(&self) -> bool {
        matches!(self.status, RoundStatus::InProgress | RoundStatus::BossRound)
    }

    pub fn ensure_not_over(&self, func: &'static str) -> Result<(), Error> {
        if self.is_game_over {
            return Err(Error::AlreadyEnded { func });
        }
        Ok(())
    }

    /// 只有回合進行中才能走棋或發動能力
    pub fn ensure_round_active(&self, func: &'static str) -> Result<(), Error> {
        self.ensure_not_over(func)?;
        if !self.is_round_active() {
            return Err(Error::InvalidTransition {
                func,
                state: self.status.to_string(),
            });
        }
        Ok(())
    }

    pub fn piece(&self, id: PieceID) -> Option<&RpgPiece> {
        self.player_army
            .iter()
            .chain(self.enemies.iter())
            .find(|p| p.id == id)
    }

    pub fn piece_mut(&mut self, id: PieceID) -> Option<&mut RpgPiece> {
        self.player_army
            .iter_mut()
            .chain(self.enemies.iter_mut())
            .find(|p| p.id == id)
    }

    /// 站在 `pos` 的 RPG 棋子
    pub fn piece_at(&self, pos: Position) -> Option<&RpgPiece> {
        self.player_army
            .iter()
            .chain(self.enemies.iter())
            .find(|p| p.position == Some(pos))
    }

    pub(crate) fn remove_piece(&mut self, id: PieceID) -> Option<RpgPiece> {
        if let Some(index) = self.player_army.iter().position(|p| p.id == id) {
            return Some(self.player_army.remove(index));
        }
        let index = self.enemies.iter().position(|p| p.id == id)?;
        Some(self.enemies.remove(index))
    }

    /// 用遞增編號產生新棋子
    pub fn mint_piece(&mut self, kind: PieceKind, color: Color, rarity: Rarity) -> RpgPiece {
        let id = self.next_piece_id;
        self.next_piece_id += 1;
        RpgPiece::new(id, kind, color, rarity)
    }

    /// 進入下一回合：只能從 Setup 或 RoundComplete 呼叫
    pub fn progress_to_next_round<R: rand::Rng>(
        &self,
        config: &GameConfig,
        rng: &mut R,
    ) -> Result<Self, Error> {
        let func = "progress_to_next_round";

        self.ensure_not_over(func)?;
        if !matches!(
            self.status,
            RoundStatus::Setup | RoundStatus::RoundComplete { .. }
        ) {
            return Err(Error::InvalidTransition {
                func,
                state: self.status.to_string(),
            });
        }

        let round = self.current_round + 1;
        let mut next = expire_effects(self, round);
        next.current_round = round;
        next.board_size = config.board.size_for_round(round);
        let size = next.board_size;
        next.board_effects
            .retain(|effect| effect.positions().iter().all(|p| p.row < size && p.col < size));
        next.deploy(config)?;
        let mut next = generate_round_effects(&next, config, rng);
        next.status = if config.rounds.is_boss_round(round) {
            RoundStatus::BossRound
        } else {
            RoundStatus::InProgress
        };

        info!(
            game_id = %next.game_id,
            round,
            board_size = size,
            status = %next.status,
            "round started"
        );
        Ok(next)
    }

    /// 加入軍隊，保留加入順序；新棋子待在後備區直到下次部署
    pub fn add_piece_to_army(&self, piece: RpgPiece) -> Result<Self, Error> {
        let func = "add_piece_to_army";

        self.ensure_not_over(func)?;
        if piece.rpg().is_none() {
            return Err(Error::NotRpgPiece {
                func,
                piece_id: piece.id,
            });
        }
        if self.piece(piece.id).is_some() {
            return Err(Error::DuplicatePiece {
                func,
                piece_id: piece.id,
            });
        }
        self.army_capacity.check(&self.player_army, &piece)?;

        let mut next = self.clone();
        next.next_piece_id = next.next_piece_id.max(piece.id + 1);
        next.player_army.push(RpgPiece {
            color: PLAYER_COLOR,
            position: None,
            ..piece
        });
        Ok(next)
    }

    /// 分數不會低於 0
    pub fn update_score(&self, delta: Score) -> Result<Self, Error> {
        let func = "update_score";
        self.ensure_not_over(func)?;
        let mut next = self.clone();
        next.score = next.score.saturating_add(delta).max(0);
        Ok(next)
    }

    /// 金幣變成負數時回傳 `InsufficientFunds`
    pub fn update_coins(&self, delta: Coins) -> Result<Self, Error> {
        let func = "update_coins";
        self.ensure_not_over(func)?;
        let coins = self.coins.saturating_add(delta);
        if coins < 0 {
            return Err(Error::InsufficientFunds {
                func,
                cost: delta.saturating_neg(),
                coins: self.coins,
            });
        }
        let mut next = self.clone();
        next.coins = coins;
        if delta > 0 {
            next.record_quest_event(QuestEvent::CoinsEarned(
                u32::try_from(delta).unwrap_or(u32::MAX),
            ));
        }
        Ok(next)
    }

    /// 結束遊戲；以相同結果重複呼叫不會出錯
    pub fn end_game(&self, victory: bool) -> Result<Self, Error> {
        let func = "end_game";
        let reason = if victory {
            GameOverReason::Victory
        } else {
            GameOverReason::Defeat
        };
        match self.status {
            RoundStatus::GameOver { reason: ended } if ended == reason => return Ok(self.clone()),
            RoundStatus::GameOver { .. } => return Err(Error::AlreadyEnded { func }),
            _ => {}
        }
        let mut next = self.clone();
        next.finish_game(reason);
        Ok(next)
    }

    fn finish_game(&mut self, reason: GameOverReason) {
        self.status = RoundStatus::GameOver { reason };
        self.is_game_over = true;
        info!(
            game_id = %self.game_id,
            round = self.current_round,
            score = self.score,
            %reason,
            "game over"
        );
    }

    /// 加金幣與分數，並推進賺錢類任務
    pub(crate) fn earn(&mut self, coins: Coins, score: Score) {
        self.coins = self.coins.saturating_add(coins);
        self.score = self.score.saturating_add(score).max(0);
        if coins > 0 {
            self.record_quest_event(QuestEvent::CoinsEarned(
                u32::try_from(coins).unwrap_or(u32::MAX),
            ));
        }
    }

    /// 每個半步後檢查回合目標是否已分出結果
    pub(crate) fn evaluate_round(&mut self, config: &GameConfig, boss_defeated: bool) {
        let outcome = if boss_defeated {
            Some(RoundOutcome::Victory)
        } else {
            match self.chess.status {
                GameStatus::InProgress => None,
                GameStatus::Checkmate { winner } if winner == PLAYER_COLOR => {
                    Some(RoundOutcome::Victory)
                }
                GameStatus::Checkmate { .. } => Some(RoundOutcome::Defeat),
                GameStatus::Draw { .. } => Some(RoundOutcome::Draw),
            }
        };
        if let Some(outcome) = outcome {
            self.finish_round(outcome, config);
        }
    }

    fn finish_round(&mut self, outcome: RoundOutcome, config: &GameConfig) {
        let was_boss = self.status == RoundStatus::BossRound;
        match outcome {
            RoundOutcome::Victory => {
                let economy = &config.economy;
                let bonus = if was_boss { economy.boss_bonus_coins } else { 0 };
                self.earn(economy.round_win_coins + bonus, economy.round_win_score);
                self.record_quest_event(QuestEvent::RoundWon);
            }
            RoundOutcome::Defeat => self.lives = self.lives.saturating_sub(1),
            RoundOutcome::Draw => {}
        }
        info!(
            game_id = %self.game_id,
            round = self.current_round,
            %outcome,
            lives = self.lives,
            "round complete"
        );

        let final_round = config
            .rounds
            .max_rounds
            .is_some_and(|max| self.current_round >= max);
        if self.lives == 0 {
            self.finish_game(GameOverReason::Defeat);
        } else if outcome == RoundOutcome::Victory && final_round {
            self.finish_game(GameOverReason::Victory);
        } else {
            self.status = RoundStatus::RoundComplete { outcome };
        }
    }

    /// 依回合重建棋盤：玩家國王與存活軍隊，加上依回合成長的敵方陣容
    fn deploy(&mut self, config: &GameConfig) -> Result<(), Error> {
        let func = "deploy";
        let size = self.board_size;
        let chess_err = |e| from_chess_error(func, e);
        let mut board = ChessBoard::empty(size).map_err(chess_err)?;
        let offset = standard_col_offset(size);

        for color in [PLAYER_COLOR, ENEMY_COLOR] {
            let king = Position::new(color.home_row(size), offset + 4);
            board
                .place(king, Piece::new(PieceKind::King, color))
                .map_err(chess_err)?;
        }

        self.player_army.retain(RpgPiece::is_alive);
        for piece in &mut self.player_army {
            piece.position = None;
            if let Some(attributes) = piece.rpg_mut() {
                attributes.clear_round_bonuses();
            }
            let spot = standard_squares(piece.kind, PLAYER_COLOR, size)
                .into_iter()
                .chain(overflow_squares(PLAYER_COLOR, size))
                .find(|pos| board.is_empty(*pos));
            let pos = spot.ok_or(Error::DeployLimit {
                func,
                limit: deployable_squares(size),
            })?;
            board.place(pos, piece.chess_piece()).map_err(chess_err)?;
            piece.position = Some(pos);
        }

        self.enemies.clear();
        let round = self.current_round.max(1);
        let growth = 100 + config.rounds.enemy_growth_percent * (round - 1);
        let boss_round = config.rounds.is_boss_round(self.current_round);
        let mut roster: Vec<(PieceKind, Position)> = BACK_RANK
            .iter()
            .enumerate()
            .filter(|(_, kind)| **kind != PieceKind::King)
            .map(|(i, kind)| (*kind, Position::new(ENEMY_COLOR.home_row(size), offset + i)))
            .collect();
        roster.extend(
            standard_squares(PieceKind::Pawn, ENEMY_COLOR, size)
                .into_iter()
                .map(|pos| (PieceKind::Pawn, pos)),
        );
        for (kind, pos) in roster {
            let mut enemy = self.mint_piece(kind, ENEMY_COLOR, Rarity::Common);
            enemy.attributes = enemy.attributes.map(|a| a.scaled(growth));
            if boss_round && kind == PieceKind::Queen {
                enemy.attributes = enemy.attributes.map(|a| RpgAttributes {
                    is_boss: true,
                    ..a.scaled(config.rounds.boss_stat_percent)
                });
            }
            board.place(pos, enemy.chess_piece()).map_err(chess_err)?;
            enemy.position = Some(pos);
            self.enemies.push(enemy);
        }

        board.infer_castling_rights();
        self.chess = GameState::from_board(board, PLAYER_COLOR);
        Ok(())
    }
}

/// 某種棋子在標準開局中的位置（八個行置中）
pub fn standard_squares(kind: PieceKind, color: Color, size: Coord) -> Vec<Position> {
    let offset = standard_col_offset(size);
    let home = color.home_row(size);
    match kind {
        PieceKind::Pawn => {
            let row = home.saturating_add_signed(color.pawn_direction());
            (0..BACK_RANK.len()).map(|i| Position::new(row, offset + i)).collect()
        }
        _ => BACK_RANK
            .iter()
            .enumerate()
            .filter(|(_, k)| **k == kind)
            .map(|(i, _)| Position::new(home, offset + i))
            .collect(),
    }
}

/// 己方前三列扣掉國王後可部署的格數，軍隊總數不能超過這個值
pub fn deployable_squares(size: Coord) -> usize {
    (size as usize * 3).saturating_sub(1)
}

/// 標準位置已滿時依序嘗試己方前三列
fn overflow_squares(color: Color, size: Coord) -> Vec<Position> {
    let home = color.home_row(size);
    (0..3)
        .filter_map(|i| home.checked_add_signed(color.pawn_direction() * i))
        .flat_map(|row| (0..size).map(move |col| Position::new(row, col)))
        .collect()
}
