//! Reward tables keyed by opponent rarity

use super::ConfigError;
use crate::types::Rarity;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Items always dropped from one rarity tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuaranteedDrop {
    pub rarity: Rarity,
    pub min: i64,
    pub max: i64,
}

/// A chance at one extra item from a rarity tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusDrop {
    pub rarity: Rarity,
    pub chance: f64,
}

/// Rewards for beating an opponent of one rarity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RarityRewards {
    pub rarity: Rarity,
    pub coin_multiplier: f64,
    pub base_xp: f64,
    #[serde(default)]
    pub guaranteed: Vec<GuaranteedDrop>,
    #[serde(default)]
    pub bonus: Vec<BonusDrop>,
}

/// Loot, coin and experience tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardTables {
    /// Guaranteed quantity and bonus chance multiplier for sparkling opponents
    #[serde(default = "default_sparkle_multiplier")]
    pub sparkle_multiplier: f64,
    /// Guaranteed quantity multiplier for bosses
    #[serde(default = "default_boss_multiplier")]
    pub boss_multiplier: f64,
    /// Added to bonus drop chances for sparkling opponents
    #[serde(default = "default_sparkle_chance_bonus")]
    pub sparkle_chance_bonus: f64,
    /// Added to bonus drop chances for bosses
    #[serde(default = "default_boss_chance_bonus")]
    pub boss_chance_bonus: f64,
    #[serde(default = "default_boss_coin_multiplier")]
    pub boss_coin_multiplier: f64,
    #[serde(default = "default_boss_xp_multiplier")]
    pub boss_xp_multiplier: f64,
    /// Share of base coins lost on defeat
    #[serde(default = "default_defeat_penalty_rate")]
    pub defeat_penalty_rate: f64,
    #[serde(default = "default_max_defeat_penalty")]
    pub max_defeat_penalty: i64,
    /// Fragment chance for mythic bosses
    #[serde(default = "default_fragment_chance")]
    pub fragment_chance: f64,
    #[serde(default = "default_sparkle_fragment_bonus")]
    pub sparkle_fragment_bonus: f64,
    /// Common item awarded when an opponent has no loot to give
    #[serde(default = "default_fallback_item")]
    pub fallback_item: String,
    #[serde(default)]
    pub tiers: Vec<RarityRewards>,
}

fn default_sparkle_multiplier() -> f64 {
    1.5
}
fn default_boss_multiplier() -> f64 {
    2.0
}
fn default_sparkle_chance_bonus() -> f64 {
    0.30
}
fn default_boss_chance_bonus() -> f64 {
    0.50
}
fn default_boss_coin_multiplier() -> f64 {
    3.0
}
fn default_boss_xp_multiplier() -> f64 {
    2.0
}
fn default_defeat_penalty_rate() -> f64 {
    0.25
}
fn default_max_defeat_penalty() -> i64 {
    100
}
fn default_fragment_chance() -> f64 {
    0.25
}
fn default_sparkle_fragment_bonus() -> f64 {
    0.15
}
fn default_fallback_item() -> String {
    "Tattered Hide".to_string()
}

impl Default for RewardTables {
    fn default() -> Self {
        RewardTables {
            sparkle_multiplier: default_sparkle_multiplier(),
            boss_multiplier: default_boss_multiplier(),
            sparkle_chance_bonus: default_sparkle_chance_bonus(),
            boss_chance_bonus: default_boss_chance_bonus(),
            boss_coin_multiplier: default_boss_coin_multiplier(),
            boss_xp_multiplier: default_boss_xp_multiplier(),
            defeat_penalty_rate: default_defeat_penalty_rate(),
            max_defeat_penalty: default_max_defeat_penalty(),
            fragment_chance: default_fragment_chance(),
            sparkle_fragment_bonus: default_sparkle_fragment_bonus(),
            fallback_item: default_fallback_item(),
            tiers: Vec::new(),
        }
    }
}

impl RewardTables {
    /// Validate tier ranges and uniqueness
    pub fn validate(self) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        for tier in &self.tiers {
            if !seen.insert(tier.rarity) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate reward tier '{}'",
                    tier.rarity
                )));
            }
            for drop in &tier.guaranteed {
                if drop.min < 0 || drop.min > drop.max {
                    return Err(ConfigError::ValidationError(format!(
                        "tier '{}' has an invalid {} quantity range {}..={}",
                        tier.rarity, drop.rarity, drop.min, drop.max
                    )));
                }
            }
            if let Some(bonus) = tier.bonus.iter().find(|b| !(0.0..=1.0).contains(&b.chance)) {
                return Err(ConfigError::ValidationError(format!(
                    "tier '{}' has bonus chance {} outside 0..=1",
                    tier.rarity, bonus.chance
                )));
            }
        }
        Ok(self)
    }

    /// Load reward tables from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let tables: RewardTables = super::load_toml(path)?;
        tables.validate()
    }

    /// Parse reward tables from a TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let tables: RewardTables = super::parse_toml(content)?;
        tables.validate()
    }

    /// Get the bundled reward tables
    pub fn bundled() -> Self {
        let toml = include_str!("../../config/rewards.toml");
        Self::parse(toml).unwrap_or_default()
    }

    pub fn tier(&self, rarity: Rarity) -> Option<&RarityRewards> {
        self.tiers.iter().find(|t| t.rarity == rarity)
    }
}
