//! Collaborator seams - where player data comes from
//!
//! The engine never aggregates stats or reads storage itself. A
//! [`CombatantSource`] answers for one character at battle start and the
//! answers are frozen into a [`PlayerLoadout`].

mod roster;

pub use roster::{InMemoryRoster, RosterEntry};

use crate::error::BattleError;
use crate::modifier::WeaponEffect;
use crate::skill::BattleSkillEffects;
use crate::types::CombatantStats;
use serde::{Deserialize, Serialize};

/// Trait for anything that can describe a character going into battle
pub trait CombatantSource: Send + Sync {
    /// Aggregated stats, or `None` for an unknown character
    fn combatant_stats(&self, character_id: &str) -> Option<CombatantStats>;

    /// Equipped skills split into passives, actives and the ultimate
    fn battle_skill_effects(&self, character_id: &str) -> BattleSkillEffects;

    /// Special effects of equipped weapons, in equip order
    fn weapon_effects(&self, character_id: &str) -> Vec<WeaponEffect>;

    fn level(&self, character_id: &str) -> u32;
}

/// Read-only snapshot of the player taken at battle start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerLoadout {
    pub character_id: String,
    pub level: u32,
    pub stats: CombatantStats,
    pub skill_effects: BattleSkillEffects,
    pub weapon_effects: Vec<WeaponEffect>,
}

impl PlayerLoadout {
    /// Loadout with no skills or weapon effects
    pub fn new(character_id: impl Into<String>, level: u32, stats: CombatantStats) -> Self {
        PlayerLoadout {
            character_id: character_id.into(),
            level,
            stats,
            skill_effects: BattleSkillEffects::default(),
            weapon_effects: Vec::new(),
        }
    }

    pub fn with_skills(mut self, skill_effects: BattleSkillEffects) -> Self {
        self.skill_effects = skill_effects;
        self
    }

    pub fn with_weapons(mut self, weapon_effects: Vec<WeaponEffect>) -> Self {
        self.weapon_effects = weapon_effects;
        self
    }

    /// Snapshot a character from a source
    pub fn from_source(
        source: &dyn CombatantSource,
        character_id: &str,
    ) -> Result<Self, BattleError> {
        let stats = source
            .combatant_stats(character_id)
            .ok_or_else(|| BattleError::UnknownCharacter(character_id.to_string()))?;

        Ok(PlayerLoadout {
            character_id: character_id.to_string(),
            level: source.level(character_id),
            stats,
            skill_effects: source.battle_skill_effects(character_id),
            weapon_effects: source.weapon_effects(character_id),
        })
    }
}
