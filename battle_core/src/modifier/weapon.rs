//! Equipped weapon special effects
//!
//! Effects are evaluated in equip order. Offensive effects fire when a player
//! attack lands; defensive effects (stealth, evasion, block) shape the
//! opponent's counter-attack.

use crate::rng::Dice;
use crate::status::{StatusApplication, StatusEffectType};
use serde::{Deserialize, Serialize};

/// One special effect granted by equipped weapons
///
/// Chances are fractions (0.25 = 25%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WeaponEffect {
    /// Added critical strike chance
    Critical { chance: f64 },
    /// Flat fire damage added to every landed attack
    FireDamage { bonus: i64 },
    Bleed {
        chance: f64,
        damage: i64,
        #[serde(default = "default_dot_duration")]
        duration: u32,
    },
    Poison {
        chance: f64,
        damage: i64,
        #[serde(default = "default_dot_duration")]
        duration: u32,
    },
    Burn {
        chance: f64,
        damage: i64,
        #[serde(default = "default_dot_duration")]
        duration: u32,
    },
    Freeze { chance: f64 },
    Stun { chance: f64 },
    Slow {
        chance: f64,
        #[serde(default = "default_slow_value")]
        value: f64,
    },
    /// Chance for a second strike dealing `multiplier` of the hit
    ChainLightning { chance: f64, multiplier: f64 },
    /// Percent of damage dealt returned as health
    LifeSteal { percent: f64 },
    /// Chance for the opponent's attacks to miss outright
    Stealth { accuracy_penalty: f64 },
    /// Chance to shave `reduction` off an incoming hit
    Block { chance: f64, reduction: f64 },
    /// Chance to avoid an incoming hit entirely
    Evasion { chance: f64 },
}

fn default_dot_duration() -> u32 {
    3
}

fn default_slow_value() -> f64 {
    0.2
}

/// Total added crit chance from equipped weapons
pub fn critical_bonus(effects: &[WeaponEffect]) -> f64 {
    effects
        .iter()
        .map(|e| match e {
            WeaponEffect::Critical { chance } => *chance,
            _ => 0.0,
        })
        .sum()
}

/// Total miss chance imposed on the opponent, capped at 90%
pub fn stealth_penalty(effects: &[WeaponEffect]) -> f64 {
    effects
        .iter()
        .map(|e| match e {
            WeaponEffect::Stealth { accuracy_penalty } => *accuracy_penalty,
            _ => 0.0,
        })
        .sum::<f64>()
        .clamp(0.0, 0.9)
}

/// What the weapon added to a landed player hit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OnHitResult {
    /// Flat fire damage added
    pub fire_damage: i64,
    /// Extra chain lightning damage, if it triggered
    pub chain_damage: i64,
    /// Health returned to the player
    pub life_steal: i64,
    /// Status effects to place on the opponent
    pub applications: Vec<StatusApplication>,
}

impl OnHitResult {
    pub fn extra_damage(&self) -> i64 {
        self.fire_damage + self.chain_damage
    }
}

/// Roll every offensive weapon effect for a hit that dealt `hit_damage`
///
/// One draw per chance-based effect, in equip order.
pub fn roll_on_hit(effects: &[WeaponEffect], hit_damage: i64, dice: &mut impl Dice) -> OnHitResult {
    let mut result = OnHitResult::default();
    let mut life_steal_percent = 0.0;

    for effect in effects {
        match effect {
            WeaponEffect::FireDamage { bonus } => result.fire_damage += (*bonus).max(0),
            WeaponEffect::Bleed { chance, damage, duration } => {
                if dice.chance(*chance) {
                    result.applications.push(StatusApplication::dot(
                        StatusEffectType::Bleed,
                        *damage,
                        *duration,
                    ));
                }
            }
            WeaponEffect::Poison { chance, damage, duration } => {
                if dice.chance(*chance) {
                    result.applications.push(StatusApplication::dot(
                        StatusEffectType::Poison,
                        *damage,
                        *duration,
                    ));
                }
            }
            WeaponEffect::Burn { chance, damage, duration } => {
                if dice.chance(*chance) {
                    result.applications.push(StatusApplication::dot(
                        StatusEffectType::Burn,
                        *damage,
                        *duration,
                    ));
                }
            }
            WeaponEffect::Freeze { chance } => {
                if dice.chance(*chance) {
                    result
                        .applications
                        .push(StatusApplication::control(StatusEffectType::Freeze, 1));
                }
            }
            WeaponEffect::Stun { chance } => {
                if dice.chance(*chance) {
                    result
                        .applications
                        .push(StatusApplication::control(StatusEffectType::Stun, 1));
                }
            }
            WeaponEffect::Slow { chance, value } => {
                if dice.chance(*chance) {
                    result.applications.push(StatusApplication::slow(*value, 2));
                }
            }
            WeaponEffect::ChainLightning { chance, multiplier } => {
                if dice.chance(*chance) {
                    result.chain_damage += (hit_damage as f64 * multiplier).floor() as i64;
                }
            }
            WeaponEffect::LifeSteal { percent } => life_steal_percent += percent,
            WeaponEffect::Critical { .. }
            | WeaponEffect::Stealth { .. }
            | WeaponEffect::Block { .. }
            | WeaponEffect::Evasion { .. } => {}
        }
    }

    if life_steal_percent > 0.0 {
        let dealt = hit_damage + result.extra_damage();
        result.life_steal = (dealt as f64 * life_steal_percent / 100.0).floor() as i64;
    }

    result
}

/// How a defensive weapon effect changed an incoming hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponDefense {
    Evaded,
    Blocked,
}

/// Apply evasion/block effects to an incoming hit
///
/// One draw per defensive effect until the first one triggers.
pub fn apply_weapon_defense(
    effects: &[WeaponEffect],
    damage: i64,
    dice: &mut impl Dice,
) -> (i64, Option<WeaponDefense>) {
    for effect in effects {
        match effect {
            WeaponEffect::Evasion { chance } => {
                if dice.chance(*chance) {
                    return (0, Some(WeaponDefense::Evaded));
                }
            }
            WeaponEffect::Block { chance, reduction } => {
                if dice.chance(*chance) {
                    let kept = (1.0 - reduction.clamp(0.0, 1.0)).max(0.0);
                    let reduced = (damage as f64 * kept).floor() as i64;
                    return (reduced, Some(WeaponDefense::Blocked));
                }
            }
            _ => {}
        }
    }
    (damage, None)
}
