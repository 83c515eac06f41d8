//! shop.rs：
//! - 商店商品與價格；購買時金幣與容量檢查都針對同一份快照，全部通過才扣款。
use crate::*;
use board::component::PieceKind;
use serde::{Deserialize, Serialize};
use skills_lib::*;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum ShopItem {
    Piece {
        kind: PieceKind,
        rarity: Rarity,
        #[serde(default)]
        joker: bool,
    },
    ExtraLife,
    CapacitySlot,
    /// 全軍回滿生命
    HealArmy,
}

impl ShopItem {
    /// 棋子價格依稀有度倍率調整；國王不販售
    pub fn price(&self, config: &GameConfig) -> Option<Coins> {
        let prices = &config.economy.prices;
        match self {
            ShopItem::Piece {
                kind,
                rarity,
                joker,
            } => {
                let base = prices.piece_price(*kind)?;
                let surcharge = if *joker { prices.joker_surcharge } else { 0 };
                Some(base * rarity.stat_percent() as Coins / 100 + surcharge)
            }
            ShopItem::ExtraLife => Some(prices.extra_life),
            ShopItem::CapacitySlot => Some(prices.capacity_slot),
            ShopItem::HealArmy => Some(prices.heal_army),
        }
    }
}

impl RpgGameState {
    pub fn purchase_shop_item(&self, item: &ShopItem, config: &GameConfig) -> Result<Self, Error> {
        let func = "purchase_shop_item";

        self.ensure_not_over(func)?;
        let cost = match (item, item.price(config)) {
            (_, Some(cost)) => cost,
            (ShopItem::Piece { kind, .. }, None) => {
                return Err(Error::CapacityExceeded {
                    func,
                    kind: *kind,
                    limit: 0,
                });
            }
            (_, None) => {
                return Err(Error::InvalidConfig {
                    func,
                    reason: "商品沒有價格".to_string(),
                });
            }
        };
        if cost > self.coins {
            return Err(Error::InsufficientFunds {
                func,
                cost,
                coins: self.coins,
            });
        }

        let mut next = self.clone();
        match item {
            ShopItem::Piece {
                kind,
                rarity,
                joker,
            } => {
                let mut piece = next.mint_piece(*kind, PLAYER_COLOR, *rarity);
                if *joker {
                    piece = piece.joker();
                }
                next.army_capacity.check(&next.player_army, &piece)?;
                next.player_army.push(piece);
            }
            ShopItem::ExtraLife => next.lives += 1,
            ShopItem::CapacitySlot => {
                let limit = deployable_squares(config.board.base_size);
                if next.army_capacity.total_limit() + 1 > limit {
                    return Err(Error::DeployLimit { func, limit });
                }
                next.army_capacity.bonus_slots += 1;
            }
            ShopItem::HealArmy => {
                for attributes in next.player_army.iter_mut().filter_map(RpgPiece::rpg_mut) {
                    attributes.hp = attributes.max_hp;
                }
            }
        }
        next.coins -= cost;

        info!(
            game_id = %next.game_id,
            ?item,
            cost,
            coins = next.coins,
            "purchased shop item"
        );
        Ok(next)
    }
}
