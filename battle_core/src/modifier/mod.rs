//! Stat & modifier pipeline
//!
//! Combines a combatant's base attack/defense with passive skill bonuses,
//! weapon effects and temporary battle modifiers (rage, slow) into the
//! numbers fed to attack resolution.

mod passive;
mod stat_value;
pub mod weapon;

pub use passive::{PassiveBonuses, PassiveKind};
pub use stat_value::StatValue;
pub use weapon::{OnHitResult, WeaponDefense, WeaponEffect};

use crate::config::AttackConstants;
use serde::{Deserialize, Serialize};

/// Passive damage reduction never exceeds this fraction
const MAX_DAMAGE_REDUCTION: f64 = 0.9;

/// Everything attack resolution needs to know about one swing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackProfile {
    pub attack: i64,
    pub defense: i64,
    /// Chance (0-1) for the hit to crit
    pub crit_chance: f64,
    /// Chance (0-1) for the defender to dodge
    pub dodge_chance: f64,
}

/// Floor a derived damage/heal amount, tolerating float noise
pub fn floor_amount(value: f64) -> i64 {
    (value + 1e-9).floor() as i64
}

/// Player attack after passive attack boosts
pub fn player_attack_value(base_attack: i64, passives: &PassiveBonuses) -> i64 {
    let mut stat = StatValue::with_base(base_attack as f64);
    stat.add_increased(passives.fraction(PassiveKind::AttackBoost));
    stat.resolve()
}

/// Opponent attack after rage and slow
pub fn beast_attack_value(base_attack: i64, rage: f64, slow: f64) -> i64 {
    let mut stat = StatValue::with_base(base_attack as f64);
    stat.add_more(rage);
    if slow > 0.0 {
        stat.add_more(-slow);
    }
    stat.resolve()
}

/// Profile for a player attack against the opponent
pub fn player_attack_profile(
    base_attack: i64,
    beast_defense: i64,
    passives: &PassiveBonuses,
    weapons: &[WeaponEffect],
    constants: &AttackConstants,
) -> AttackProfile {
    AttackProfile {
        attack: player_attack_value(base_attack, passives),
        defense: beast_defense,
        crit_chance: constants.player_crit_chance
            + passives.fraction(PassiveKind::CriticalChance)
            + weapon::critical_bonus(weapons),
        dodge_chance: constants.player_dodge_chance,
    }
}

/// Profile for an opponent attack against the player
pub fn beast_attack_profile(
    base_attack: i64,
    rage: f64,
    slow: f64,
    player_defense: i64,
    passives: &PassiveBonuses,
    constants: &AttackConstants,
) -> AttackProfile {
    AttackProfile {
        attack: beast_attack_value(base_attack, rage, slow),
        defense: player_defense,
        crit_chance: constants.beast_crit_chance,
        dodge_chance: constants.beast_dodge_chance + passives.fraction(PassiveKind::Evasion),
    }
}

/// Attack minus defense, the base for special, ultimate and skill damage
///
/// Callers clamp with `max(1, diff)`.
pub fn attack_difference(player_attack: i64, beast_defense: i64) -> i64 {
    player_attack - beast_defense
}

/// Apply passive damage reduction to an incoming hit
pub fn apply_damage_reduction(damage: i64, passives: &PassiveBonuses) -> i64 {
    let reduction = passives
        .fraction(PassiveKind::DamageReduction)
        .clamp(0.0, MAX_DAMAGE_REDUCTION);
    if reduction <= 0.0 {
        return damage;
    }
    floor_amount(damage as f64 * (1.0 - reduction))
}
