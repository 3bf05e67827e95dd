//! Loot & reward resolution at battle end

mod drops;

pub use crate::config::LootEntry;
pub use drops::{merge_drops, roll_drops};

use crate::config::{OpponentDefinition, RarityRewards, RewardTables, ZoneDefinition};
use crate::modifier::floor_amount;
use crate::rng::Dice;
use crate::types::Rarity;
use serde::{Deserialize, Serialize};

/// A stack of identical items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDrop {
    pub name: String,
    pub rarity: Rarity,
    pub quantity: u32,
}

/// Announcement payload for a boss kill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BossNotification {
    pub boss_name: String,
    pub zone_id: String,
    pub rounds: u32,
    pub sparkling: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VictoryRewards {
    pub items: Vec<ItemDrop>,
    pub coins: i64,
    pub experience: i64,
    pub sparkling: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boss_notification: Option<BossNotification>,
}

impl VictoryRewards {
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

/// What the player gets (or loses) once a battle is over
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum RewardResult {
    Victory(VictoryRewards),
    Defeat { coin_penalty: i64 },
}

impl RewardResult {
    pub fn is_victory(&self) -> bool {
        matches!(self, RewardResult::Victory(_))
    }

    /// Get a summary string
    pub fn summary(&self) -> String {
        match self {
            RewardResult::Victory(rewards) => {
                let mut text = format!(
                    "Victory: {} coins, {} xp, {} item(s)",
                    rewards.coins,
                    rewards.experience,
                    rewards.item_count()
                );
                if rewards.sparkling {
                    text.push_str(", sparkling");
                }
                if let Some(boss) = &rewards.boss_notification {
                    text.push_str(&format!(", defeated boss {}", boss.boss_name));
                }
                text
            }
            RewardResult::Defeat { coin_penalty } => {
                format!("Defeat: lost {} coins", coin_penalty)
            }
        }
    }
}

/// Coins for a victory: base × rarity multiplier, × boss multiplier
pub fn coin_reward(
    base_coins: i64,
    tier: Option<&RarityRewards>,
    boss: bool,
    tables: &RewardTables,
) -> i64 {
    let multiplier = tier.map(|t| t.coin_multiplier).unwrap_or(1.0);
    let coins = floor_amount(base_coins as f64 * multiplier).max(0);
    if boss {
        floor_amount(coins as f64 * tables.boss_coin_multiplier)
    } else {
        coins
    }
}

/// Experience for a victory: rarity base × zone multiplier, × boss multiplier
pub fn experience_reward(
    tier: Option<&RarityRewards>,
    zone: &ZoneDefinition,
    boss: bool,
    tables: &RewardTables,
) -> i64 {
    let base = tier.map(|t| t.base_xp).unwrap_or(0.0);
    let experience = floor_amount(base * zone.xp_multiplier).max(0);
    if boss {
        floor_amount(experience as f64 * tables.boss_xp_multiplier)
    } else {
        experience
    }
}

/// Coins lost on defeat, capped
pub fn defeat_penalty(base_coins: i64, tables: &RewardTables) -> i64 {
    floor_amount(base_coins.max(0) as f64 * tables.defeat_penalty_rate)
        .min(tables.max_defeat_penalty)
}

/// Roll every victory reward for a defeated opponent
///
/// Draws happen in drop-table order (guaranteed tiers, bonus tiers, the
/// fragment roll, then the fallback pick). Coins and experience draw nothing.
pub fn resolve_victory(
    opponent: &OpponentDefinition,
    zone: &ZoneDefinition,
    sparkling: bool,
    rounds: u32,
    base_coins: i64,
    tables: &RewardTables,
    dice: &mut impl Dice,
) -> VictoryRewards {
    let tier = tables.tier(opponent.rarity);
    let items = roll_drops(opponent, tables, sparkling, dice);

    let boss_notification = opponent.boss.then(|| BossNotification {
        boss_name: opponent.name.clone(),
        zone_id: zone.id.clone(),
        rounds,
        sparkling,
    });

    VictoryRewards {
        items,
        coins: coin_reward(base_coins, tier, opponent.boss, tables),
        experience: experience_reward(tier, zone, opponent.boss, tables),
        sparkling,
        boss_notification,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(xp_multiplier: f64) -> ZoneDefinition {
        ZoneDefinition {
            id: "ember_caverns".to_string(),
            name: "Ember Caverns".to_string(),
            min_level: 25,
            max_level: 40,
            xp_multiplier,
            opponents: Vec::new(),
        }
    }

    #[test]
    fn test_coin_multipliers() {
        let tables = RewardTables::bundled();
        let coins: Vec<i64> = Rarity::all()
            .iter()
            .map(|r| coin_reward(10, tables.tier(*r), false, &tables))
            .collect();
        assert_eq!(coins, vec![10, 30, 50, 100, 200]);
        assert_eq!(coin_reward(10, tables.tier(Rarity::Rare), true, &tables), 150);
    }

    #[test]
    fn test_experience_uses_zone_multiplier() {
        let tables = RewardTables::bundled();
        let rare = tables.tier(Rarity::Rare);
        assert_eq!(experience_reward(rare, &zone(4.75), false, &tables), 2375);
        assert_eq!(experience_reward(rare, &zone(4.75), true, &tables), 4750);
        assert_eq!(
            experience_reward(tables.tier(Rarity::Uncommon), &zone(2.5), false, &tables),
            625
        );
    }

    #[test]
    fn test_defeat_penalty_caps() {
        let tables = RewardTables::bundled();
        assert_eq!(defeat_penalty(90, &tables), 22);
        assert_eq!(defeat_penalty(1000, &tables), 100);
        assert_eq!(defeat_penalty(-5, &tables), 0);
    }

    #[test]
    fn test_reward_result_serializes_tagged() {
        let result = RewardResult::Defeat { coin_penalty: 12 };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["result"], "defeat");
        assert_eq!(json["coin_penalty"], 12);
        assert_eq!(result.summary(), "Defeat: lost 12 coins");
    }
}
