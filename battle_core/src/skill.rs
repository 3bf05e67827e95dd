//! Learned skills and the per-battle skill snapshot

use crate::modifier::{PassiveBonuses, PassiveKind};
use crate::status::StatusEffectType;
use serde::{Deserialize, Serialize};

/// How a skill is used in battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillType {
    /// Always-on bonus, never selected as an action
    Passive,
    /// Costs energy when used
    Active,
    /// Costs the full ultimate charge when used
    Ultimate,
}

/// What a skill does when it resolves
///
/// Decided when the skill is authored; the engine never inspects names or
/// descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkillEffectKind {
    /// Restore magnitude% of max health
    Heal,
    /// Place a status effect (on the opponent, or on the player for defense boosts)
    Status { effect: StatusEffectType },
    /// Strike for bonus damage scaled by magnitude%
    Damage,
    /// Grant a passive bonus for the whole battle
    Passive { bonus: PassiveKind },
}

/// A skill as authored in the content catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub skill_type: SkillType,
    pub effect_kind: SkillEffectKind,
    /// Magnitude at level 1
    pub base_effect: f64,
    /// Magnitude gained per level above 1
    #[serde(default)]
    pub effect_per_level: f64,
    /// Rounds before the skill can be used again
    #[serde(default)]
    pub cooldown: Option<u32>,
}

impl SkillDefinition {
    /// Magnitude at a learned level: base + per_level × (level - 1)
    pub fn magnitude(&self, level: u32) -> f64 {
        self.base_effect + self.effect_per_level * level.saturating_sub(1) as f64
    }
}

/// A skill the character has learned, with its level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnedSkill {
    pub skill: SkillDefinition,
    pub level: u32,
}

impl LearnedSkill {
    pub fn new(skill: SkillDefinition, level: u32) -> Self {
        LearnedSkill {
            skill,
            level: level.max(1),
        }
    }

    pub fn id(&self) -> &str {
        &self.skill.id
    }

    pub fn magnitude(&self) -> f64 {
        self.skill.magnitude(self.level)
    }
}

/// Read-only skill snapshot taken at battle start
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BattleSkillEffects {
    pub passive_bonuses: PassiveBonuses,
    /// Ids of equipped passives, so selecting one can be refused
    #[serde(default)]
    pub passive_skill_ids: Vec<String>,
    pub active_skills: Vec<LearnedSkill>,
    pub ultimate_skill: Option<LearnedSkill>,
}

impl BattleSkillEffects {
    /// Split learned skills into passive bonuses, actives and the ultimate
    ///
    /// Passive skills contribute their magnitude to the bonus map. If more
    /// than one ultimate is equipped the first one wins.
    pub fn from_learned(skills: impl IntoIterator<Item = LearnedSkill>) -> Self {
        let mut effects = BattleSkillEffects::default();

        for learned in skills {
            match learned.skill.skill_type {
                SkillType::Passive => {
                    if let SkillEffectKind::Passive { bonus } = learned.skill.effect_kind {
                        effects.passive_bonuses.add(bonus, learned.magnitude());
                    }
                    effects.passive_skill_ids.push(learned.skill.id);
                }
                SkillType::Active => effects.active_skills.push(learned),
                SkillType::Ultimate => {
                    if effects.ultimate_skill.is_none() {
                        effects.ultimate_skill = Some(learned);
                    }
                }
            }
        }

        effects
    }

    /// Find an equipped, usable skill by id
    pub fn find(&self, skill_id: &str) -> Option<&LearnedSkill> {
        self.active_skills
            .iter()
            .chain(self.ultimate_skill.iter())
            .find(|s| s.id() == skill_id)
    }

    pub fn is_passive(&self, skill_id: &str) -> bool {
        self.passive_skill_ids.iter().any(|id| id == skill_id)
    }

    /// Every skill that can be selected as an action
    pub fn usable_skills(&self) -> impl Iterator<Item = &LearnedSkill> {
        self.active_skills.iter().chain(self.ultimate_skill.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skill(id: &str, skill_type: SkillType, effect_kind: SkillEffectKind) -> SkillDefinition {
        SkillDefinition {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            skill_type,
            effect_kind,
            base_effect: 10.0,
            effect_per_level: 2.5,
            cooldown: None,
        }
    }

    #[test]
    fn test_magnitude_scales_with_level() {
        let def = skill("mend", SkillType::Active, SkillEffectKind::Heal);
        assert!((def.magnitude(1) - 10.0).abs() < f64::EPSILON);
        assert!((def.magnitude(5) - 20.0).abs() < f64::EPSILON);
        assert!((LearnedSkill::new(def, 0).magnitude() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_learned_splits_skills() {
        let effects = BattleSkillEffects::from_learned([
            LearnedSkill::new(
                skill(
                    "keen_edge",
                    SkillType::Passive,
                    SkillEffectKind::Passive {
                        bonus: PassiveKind::CriticalChance,
                    },
                ),
                3,
            ),
            LearnedSkill::new(skill("mend", SkillType::Active, SkillEffectKind::Heal), 1),
            LearnedSkill::new(skill("cataclysm", SkillType::Ultimate, SkillEffectKind::Damage), 1),
            LearnedSkill::new(skill("second", SkillType::Ultimate, SkillEffectKind::Damage), 1),
        ]);

        assert!((effects.passive_bonuses.get(PassiveKind::CriticalChance) - 15.0).abs() < 1e-9);
        assert_eq!(effects.active_skills.len(), 1);
        assert_eq!(effects.ultimate_skill.as_ref().map(|s| s.id()), Some("cataclysm"));
        assert!(effects.find("mend").is_some());
        assert!(effects.find("cataclysm").is_some());
        assert!(effects.find("keen_edge").is_none());
        assert!(effects.is_passive("keen_edge"));
        assert!(!effects.is_passive("mend"));
        assert_eq!(effects.usable_skills().count(), 2);
    }

    #[test]
    fn test_parse_skill_toml() {
        let toml = r#"
id = "ember_brand"
name = "Ember Brand"
skill_type = "active"
base_effect = 20
effect_per_level = 5
effect_kind = { kind = "status", effect = "burn" }
"#;
        let def: SkillDefinition = toml::from_str(toml).unwrap();
        assert_eq!(
            def.effect_kind,
            SkillEffectKind::Status {
                effect: StatusEffectType::Burn
            }
        );
        assert_eq!(def.cooldown, None);
        assert!((def.magnitude(3) - 30.0).abs() < f64::EPSILON);
    }
}
