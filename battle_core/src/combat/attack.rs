//! Attack resolution shared by both sides

use crate::config::AttackConstants;
use crate::modifier::{floor_amount, AttackProfile};
use crate::rng::Dice;
use serde::{Deserialize, Serialize};

/// Outcome of one basic attack roll
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AttackRoll {
    /// Damage before any on-hit or defensive effects; 0 when dodged
    pub damage: i64,
    pub critical: bool,
    pub dodged: bool,
    /// Variance added to the hit, 0 when dodged
    pub variance: i64,
}

/// Resolve a basic attack
///
/// Draw order is fixed: dodge, then variance, then crit. A dodge consumes
/// only the first draw.
///
/// `damage = max(1, attack - defense + variance)`, multiplied by the crit
/// multiplier and floored on a crit.
pub fn resolve_attack(
    profile: &AttackProfile,
    constants: &AttackConstants,
    dice: &mut impl Dice,
) -> AttackRoll {
    if dice.chance(profile.dodge_chance) {
        return AttackRoll {
            dodged: true,
            ..AttackRoll::default()
        };
    }

    let variance = dice.int_inclusive(constants.variance_min, constants.variance_max);
    let base = (profile.attack - profile.defense + variance).max(1);

    let critical = dice.chance(profile.crit_chance);
    let damage = if critical {
        floor_amount(base as f64 * constants.crit_multiplier)
    } else {
        base
    };

    AttackRoll {
        damage,
        critical,
        dodged: false,
        variance,
    }
}
