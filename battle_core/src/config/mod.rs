//! Configuration loading from TOML files
//!
//! Every content file has a bundled default compiled into the crate, so the
//! engine works without any files on disk. `load_from_dir` swaps in a
//! directory of overrides.

mod catalog;
mod constants;
mod rewards;
mod skills;

pub use catalog::{LootEntry, OpponentCatalog, OpponentDefinition, ZoneDefinition};
pub use constants::{
    AttackConstants, BattleConstants, DefendConstants, RageConstants, ResourceConstants,
    ScalingConstants, SpecialConstants, StatusConstants, UltimateConstants,
};
pub use rewards::{BonusDrop, GuaranteedDrop, RarityRewards, RewardTables};
pub use skills::SkillCatalog;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration loading error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}

/// Load a TOML file and deserialize it
pub fn load_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Load a TOML string and deserialize it
pub fn parse_toml<T: serde::de::DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    let config: T = toml::from_str(content)?;
    Ok(config)
}

/// Get the bundled battle constants
pub fn default_constants() -> BattleConstants {
    let toml = include_str!("../../config/constants.toml");
    parse_toml(toml).unwrap_or_default()
}

/// All content the engine needs, loaded together
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameContent {
    pub constants: BattleConstants,
    pub catalog: OpponentCatalog,
    pub skills: SkillCatalog,
    pub rewards: RewardTables,
}

impl Default for GameContent {
    fn default() -> Self {
        GameContent {
            constants: default_constants(),
            catalog: OpponentCatalog::bundled(),
            skills: SkillCatalog::bundled(),
            rewards: RewardTables::bundled(),
        }
    }
}

impl GameContent {
    /// Load content from a directory
    ///
    /// Looks for `constants.toml`, `zones.toml`, `skills.toml` and
    /// `rewards.toml`. Missing files fall back to the bundled defaults;
    /// files that exist but fail to parse or validate are errors.
    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let mut content = GameContent::default();

        let constants = dir.join("constants.toml");
        if constants.exists() {
            content.constants = load_toml(&constants)?;
        }

        let zones = dir.join("zones.toml");
        if zones.exists() {
            content.catalog = OpponentCatalog::load(&zones)?;
        }

        let skills = dir.join("skills.toml");
        if skills.exists() {
            content.skills = SkillCatalog::load(&skills)?;
        }

        let rewards = dir.join("rewards.toml");
        if rewards.exists() {
            content.rewards = RewardTables::load(&rewards)?;
        }

        Ok(content)
    }
}
