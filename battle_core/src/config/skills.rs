//! Skill catalog loading

use super::ConfigError;
use crate::skill::{LearnedSkill, SkillDefinition, SkillEffectKind, SkillType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Container for skill definitions as they appear on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SkillsFile {
    #[serde(default)]
    skills: Vec<SkillDefinition>,
}

/// Every authored skill, keyed by id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillCatalog {
    skills: BTreeMap<String, SkillDefinition>,
}

impl SkillCatalog {
    /// Build a catalog, rejecting duplicate ids and mismatched effect kinds
    pub fn new(skills: Vec<SkillDefinition>) -> Result<Self, ConfigError> {
        let mut map = BTreeMap::new();
        for skill in skills {
            let is_passive_effect = matches!(skill.effect_kind, SkillEffectKind::Passive { .. });
            if is_passive_effect != (skill.skill_type == SkillType::Passive) {
                return Err(ConfigError::ValidationError(format!(
                    "skill '{}' mixes a passive effect with a non-passive type",
                    skill.id
                )));
            }
            if let Some(existing) = map.insert(skill.id.clone(), skill) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate skill id '{}'",
                    existing.id
                )));
            }
        }
        Ok(SkillCatalog { skills: map })
    }

    /// Load skill definitions from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let file: SkillsFile = super::load_toml(path)?;
        Self::new(file.skills)
    }

    /// Load skill definitions from a TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let file: SkillsFile = super::parse_toml(content)?;
        Self::new(file.skills)
    }

    /// Get the bundled skill catalog
    pub fn bundled() -> Self {
        let toml = include_str!("../../config/skills.toml");
        Self::parse(toml).unwrap_or_default()
    }

    pub fn get(&self, id: &str) -> Option<&SkillDefinition> {
        self.skills.get(id)
    }

    /// A learned copy of a catalog skill at `level`
    pub fn learn(&self, id: &str, level: u32) -> Option<LearnedSkill> {
        self.get(id).map(|def| LearnedSkill::new(def.clone(), level))
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkillDefinition> {
        self.skills.values()
    }
}
