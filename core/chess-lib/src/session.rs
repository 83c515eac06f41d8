//! session.rs：
//! - 引擎外部的協作者介面：快照儲存（樂觀版本檢查）與狀態通知。
//! - GameService 串起 load → dispatch → save → publish，不重試，版本衝突直接回傳給呼叫端。
//! - 同一個遊戲的寫入必須由呼叫端序列化。
use crate::*;
use std::collections::BTreeMap;
use tracing::{info, warn};

pub trait SnapshotStore {
    /// 讀取快照與目前版本
    fn load(&self, game_id: &str) -> Result<(RpgGameState, Version), Error>;

    /// 版本等於 `expected` 時寫入並回傳新版本，否則回傳 `VersionConflict`
    fn save(
        &mut self,
        game_id: &str,
        snapshot: &RpgGameState,
        expected: Option<Version>,
    ) -> Result<Version, Error>;
}

pub trait Notifier {
    fn publish(&mut self, game_id: &str, snapshot: &RpgGameState, version: Version);
}

/// 記憶體內的快照儲存；`expected` 為 None 表示建立新遊戲
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    games: BTreeMap<GameID, (RpgGameState, Version)>,
}

impl SnapshotStore for MemoryStore {
    fn load(&self, game_id: &str) -> Result<(RpgGameState, Version), Error> {
        let func = "MemoryStore::load";

        self.games
            .get(game_id)
            .cloned()
            .ok_or_else(|| Error::GameNotFound {
                func,
                game_id: game_id.to_string(),
            })
    }

    fn save(
        &mut self,
        game_id: &str,
        snapshot: &RpgGameState,
        expected: Option<Version>,
    ) -> Result<Version, Error> {
        let func = "MemoryStore::save";

        let actual = self.games.get(game_id).map(|(_, v)| *v);
        if actual != expected {
            return Err(Error::VersionConflict {
                func,
                game_id: game_id.to_string(),
                expected: expected.unwrap_or(0),
                actual: actual.unwrap_or(0),
            });
        }
        let version = actual.map_or(1, |v| v + 1);
        self.games
            .insert(game_id.to_string(), (snapshot.clone(), version));
        Ok(version)
    }
}

/// 記下每次通知，測試與除錯用
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    pub published: Vec<(GameID, Version)>,
}

impl Notifier for RecordingNotifier {
    fn publish(&mut self, game_id: &str, _snapshot: &RpgGameState, version: Version) {
        self.published.push((game_id.to_string(), version));
    }
}

pub struct GameService<S, N, R> {
    pub store: S,
    pub notifier: N,
    pub config: GameConfig,
    pub rng: R,
}

impl<S: SnapshotStore, N: Notifier, R: rand::Rng> GameService<S, N, R> {
    pub fn new(store: S, notifier: N, config: GameConfig, rng: R) -> Self {
        Self {
            store,
            notifier,
            config,
            rng,
        }
    }

    pub fn create_game(&mut self, game_id: &str) -> Result<(RpgGameState, Version), Error> {
        let state = RpgGameState::new(game_id, &self.config)?;
        let version = self.commit(game_id, &state, None)?;
        info!(game_id, version, "game created");
        Ok((state, version))
    }

    /// 套用一筆行動並儲存；儲存失敗時不通知也不重試
    pub fn execute(
        &mut self,
        game_id: &str,
        record: &ActionRecord,
    ) -> Result<(RpgGameState, Version), Error> {
        let (state, version) = self.store.load(game_id)?;
        let next = dispatch(&state, record, &self.config, &mut self.rng)?;
        let version = self.commit(game_id, &next, Some(version))?;
        Ok((next, version))
    }

    fn commit(
        &mut self,
        game_id: &str,
        snapshot: &RpgGameState,
        expected: Option<Version>,
    ) -> Result<Version, Error> {
        let version = self
            .store
            .save(game_id, snapshot, expected)
            .inspect_err(|e| warn!(game_id, ?expected, error = %e, "rejected save"))?;
        self.notifier.publish(game_id, snapshot, version);
        Ok(version)
    }
}
