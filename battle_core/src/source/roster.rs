//! InMemoryRoster - a map-backed CombatantSource

use super::CombatantSource;
use crate::modifier::WeaponEffect;
use crate::skill::{BattleSkillEffects, LearnedSkill};
use crate::types::CombatantStats;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One character as stored in the roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub level: u32,
    pub stats: CombatantStats,
    #[serde(default)]
    pub equipped_skills: Vec<LearnedSkill>,
    #[serde(default)]
    pub weapon_effects: Vec<WeaponEffect>,
}

impl RosterEntry {
    pub fn new(level: u32, stats: CombatantStats) -> Self {
        RosterEntry {
            level,
            stats,
            equipped_skills: Vec::new(),
            weapon_effects: Vec::new(),
        }
    }

    pub fn with_skill(mut self, skill: LearnedSkill) -> Self {
        self.equipped_skills.push(skill);
        self
    }

    pub fn with_weapon(mut self, effect: WeaponEffect) -> Self {
        self.weapon_effects.push(effect);
        self
    }
}

/// Characters kept in memory, keyed by id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryRoster {
    characters: HashMap<String, RosterEntry>,
}

impl InMemoryRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, character_id: impl Into<String>, entry: RosterEntry) {
        self.characters.insert(character_id.into(), entry);
    }

    pub fn get(&self, character_id: &str) -> Option<&RosterEntry> {
        self.characters.get(character_id)
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }
}

impl CombatantSource for InMemoryRoster {
    fn combatant_stats(&self, character_id: &str) -> Option<CombatantStats> {
        self.get(character_id).map(|e| e.stats)
    }

    fn battle_skill_effects(&self, character_id: &str) -> BattleSkillEffects {
        self.get(character_id)
            .map(|e| BattleSkillEffects::from_learned(e.equipped_skills.iter().cloned()))
            .unwrap_or_default()
    }

    fn weapon_effects(&self, character_id: &str) -> Vec<WeaponEffect> {
        self.get(character_id)
            .map(|e| e.weapon_effects.clone())
            .unwrap_or_default()
    }

    fn level(&self, character_id: &str) -> u32 {
        self.get(character_id).map(|e| e.level).unwrap_or(1)
    }
}
