//! Battle tuning constants

use serde::{Deserialize, Serialize};

/// Tunable battle constants
///
/// Every section falls back to its defaults when omitted from the TOML file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConstants {
    pub resources: ResourceConstants,
    pub attack: AttackConstants,
    pub special: SpecialConstants,
    pub ultimate: UltimateConstants,
    pub defend: DefendConstants,
    pub rage: RageConstants,
    pub scaling: ScalingConstants,
    pub status: StatusConstants,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConstants {
    pub max_energy: u32,
    /// Energy regained at the start of every player action
    pub energy_regen: u32,
    /// Energy spent by special attacks and active skills
    pub energy_cost: u32,
    pub max_ultimate: u32,
    /// Ultimate charge gained per action
    pub ultimate_gain: u32,
    /// Rounds the special attack stays unavailable after use
    pub special_cooldown: u32,
    /// Upper bound on the defend cooldown
    pub max_defend_cooldown: u32,
    /// Cooldown for skills that do not define one
    pub default_skill_cooldown: u32,
}

impl Default for ResourceConstants {
    fn default() -> Self {
        ResourceConstants {
            max_energy: 100,
            energy_regen: 5,
            energy_cost: 30,
            max_ultimate: 100,
            ultimate_gain: 10,
            special_cooldown: 2,
            max_defend_cooldown: 3,
            default_skill_cooldown: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackConstants {
    pub variance_min: i64,
    pub variance_max: i64,
    pub crit_multiplier: f64,
    pub player_crit_chance: f64,
    pub beast_crit_chance: f64,
    /// Chance the opponent dodges a player attack
    pub player_dodge_chance: f64,
    /// Chance the player dodges an opponent attack
    pub beast_dodge_chance: f64,
}

impl Default for AttackConstants {
    fn default() -> Self {
        AttackConstants {
            variance_min: 1,
            variance_max: 3,
            crit_multiplier: 1.5,
            player_crit_chance: 0.15,
            beast_crit_chance: 0.10,
            player_dodge_chance: 0.05,
            beast_dodge_chance: 0.03,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialConstants {
    /// Hit chance when the opponent is not stunned
    pub accuracy: f64,
    pub min_multiplier: f64,
    pub max_multiplier: f64,
    pub max_bonus: i64,
}

impl Default for SpecialConstants {
    fn default() -> Self {
        SpecialConstants {
            accuracy: 0.65,
            min_multiplier: 3.0,
            max_multiplier: 5.0,
            max_bonus: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UltimateConstants {
    pub min_multiplier: f64,
    pub max_multiplier: f64,
    pub max_bonus: i64,
}

impl Default for UltimateConstants {
    fn default() -> Self {
        UltimateConstants {
            min_multiplier: 5.0,
            max_multiplier: 8.0,
            max_bonus: 10,
        }
    }
}

/// Defend tuning: damage factor = max(min, base - step × streak)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefendConstants {
    pub base_reduction: f64,
    pub reduction_step: f64,
    pub min_reduction: f64,
    pub base_stun_chance: f64,
    pub stun_step: f64,
    pub max_stun_chance: f64,
    /// Opponent turns lost on a successful defend stun
    pub stun_rounds: u32,
}

impl Default for DefendConstants {
    fn default() -> Self {
        DefendConstants {
            base_reduction: 0.8,
            reduction_step: 0.1,
            min_reduction: 0.3,
            base_stun_chance: 0.15,
            stun_step: 0.05,
            max_stun_chance: 0.35,
            stun_rounds: 2,
        }
    }
}

impl DefendConstants {
    /// Damage multiplier for a defend streak of `streak`
    pub fn damage_factor(&self, streak: u32) -> f64 {
        (self.base_reduction - self.reduction_step * streak as f64).max(self.min_reduction)
    }

    /// Chance the defend stuns the opponent
    pub fn stun_chance(&self, streak: u32) -> f64 {
        (self.base_stun_chance + self.stun_step * streak as f64).min(self.max_stun_chance)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RageConstants {
    pub per_round: f64,
    pub max: f64,
}

impl Default for RageConstants {
    fn default() -> Self {
        RageConstants {
            per_round: 0.05,
            max: 0.5,
        }
    }
}

impl RageConstants {
    pub fn for_round(&self, round: u32) -> f64 {
        (round as f64 * self.per_round).min(self.max)
    }
}

/// Opponent stat scaling at spawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScalingConstants {
    pub level_step: f64,
    pub min_random: f64,
    pub max_random: f64,
    pub sparkle_bonus: f64,
    pub sparkle_chance: f64,
}

impl Default for ScalingConstants {
    fn default() -> Self {
        ScalingConstants {
            level_step: 0.1,
            min_random: 0.2,
            max_random: 2.0,
            sparkle_bonus: 0.5,
            sparkle_chance: 0.5,
        }
    }
}

/// Durations and magnitudes for skill-applied status effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusConstants {
    pub dot_duration: u32,
    pub control_duration: u32,
    pub slow_duration: u32,
    pub defense_boost_duration: u32,
    pub max_slow: f64,
}

impl Default for StatusConstants {
    fn default() -> Self {
        StatusConstants {
            dot_duration: 3,
            control_duration: 1,
            slow_duration: 2,
            defense_boost_duration: 3,
            max_slow: 0.9,
        }
    }
}
