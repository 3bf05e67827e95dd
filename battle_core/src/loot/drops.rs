//! Weighted item drops

use super::ItemDrop;
use crate::config::{LootEntry, OpponentDefinition, RewardTables};
use crate::modifier::floor_amount;
use crate::rng::Dice;
use crate::types::Rarity;

/// Roll the item drops for a defeated opponent
///
/// 1. Guaranteed tiers: quantity in `min..=max`, scaled for sparkle and boss,
///    one weighted pick per unit
/// 2. Bonus tiers: one chance roll each, one weighted pick on success
/// 3. Mythic bosses: a fragment roll over entries flagged as fragments
/// 4. Nothing dropped: one common item
///
/// Tiers with no matching loot entries are skipped without drawing.
pub fn roll_drops(
    opponent: &OpponentDefinition,
    tables: &RewardTables,
    sparkling: bool,
    dice: &mut impl Dice,
) -> Vec<ItemDrop> {
    let mut picked: Vec<&LootEntry> = Vec::new();

    if let Some(tier) = tables.tier(opponent.rarity) {
        for guaranteed in &tier.guaranteed {
            let pool: Vec<&LootEntry> = opponent.loot_of(guaranteed.rarity).collect();
            if pool.is_empty() {
                continue;
            }

            let rolled = dice.int_inclusive(guaranteed.min, guaranteed.max);
            let quantity = scaled_quantity(rolled, sparkling, opponent.boss, tables);
            for _ in 0..quantity {
                if let Some(entry) = pick(&pool, dice) {
                    picked.push(entry);
                }
            }
        }

        for bonus in &tier.bonus {
            let pool: Vec<&LootEntry> = opponent.loot_of(bonus.rarity).collect();
            if pool.is_empty() {
                continue;
            }

            let chance = bonus_chance(bonus.chance, sparkling, opponent.boss, tables);
            if dice.chance(chance) {
                if let Some(entry) = pick(&pool, dice) {
                    picked.push(entry);
                }
            }
        }
    }

    if opponent.boss && opponent.rarity == Rarity::Mythic {
        let fragments: Vec<&LootEntry> = opponent.fragments().collect();
        if !fragments.is_empty() {
            let mut chance = tables.fragment_chance;
            if sparkling {
                chance += tables.sparkle_fragment_bonus;
            }
            if dice.chance(chance) {
                if let Some(entry) = pick(&fragments, dice) {
                    picked.push(entry);
                }
            }
        }
    }

    if picked.is_empty() {
        let commons: Vec<&LootEntry> = opponent.loot_of(Rarity::Common).collect();
        if let Some(entry) = pick(&commons, dice) {
            picked.push(entry);
        } else {
            return vec![ItemDrop {
                name: tables.fallback_item.clone(),
                rarity: Rarity::Common,
                quantity: 1,
            }];
        }
    }

    merge_drops(picked.into_iter().map(|entry| ItemDrop {
        name: entry.name.clone(),
        rarity: entry.rarity,
        quantity: 1,
    }))
}

/// Combine drops sharing a name, keeping first-seen order
pub fn merge_drops(drops: impl IntoIterator<Item = ItemDrop>) -> Vec<ItemDrop> {
    let mut merged: Vec<ItemDrop> = Vec::new();
    for drop in drops {
        match merged.iter_mut().find(|d| d.name == drop.name) {
            Some(existing) => existing.quantity += drop.quantity,
            None => merged.push(drop),
        }
    }
    merged
}

fn scaled_quantity(rolled: i64, sparkling: bool, boss: bool, tables: &RewardTables) -> u32 {
    let mut quantity = rolled.max(0) as f64;
    if sparkling {
        quantity *= tables.sparkle_multiplier;
    }
    if boss {
        quantity *= tables.boss_multiplier;
    }
    floor_amount(quantity).max(0) as u32
}

/// Bonus drop chance: (base + sparkle bonus + boss bonus) × sparkle multiplier, capped at 1
fn bonus_chance(base: f64, sparkling: bool, boss: bool, tables: &RewardTables) -> f64 {
    let mut chance = base;
    if sparkling {
        chance += tables.sparkle_chance_bonus;
    }
    if boss {
        chance += tables.boss_chance_bonus;
    }
    if sparkling {
        chance *= tables.sparkle_multiplier;
    }
    chance.min(1.0)
}

/// Weighted pick, one draw; entries with zero weight are never picked
fn pick<'a>(pool: &[&'a LootEntry], dice: &mut impl Dice) -> Option<&'a LootEntry> {
    if pool.is_empty() {
        return None;
    }
    let weights: Vec<f64> = pool.iter().map(|e| e.weight).collect();
    dice.weighted_index(&weights).map(|index| pool[index])
}
