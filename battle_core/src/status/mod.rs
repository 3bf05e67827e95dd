//! Status effects - timed modifiers on either combatant
//!
//! Damage-over-time effects (burn, poison, bleed) hurt their target each
//! tick. Control effects (freeze, stun) make the opponent lose turns. Slow
//! weakens the opponent's attack, and defense boost temporarily raises the
//! player's defense.

mod ledger;

pub use ledger::{LedgerTick, StatusLedger};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of timed status effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusEffectType {
    Burn,
    Poison,
    Bleed,
    Freeze,
    Stun,
    Slow,
    DefenseBoost,
}

impl StatusEffectType {
    /// Burn, poison and bleed deal damage every tick
    pub fn is_damage_over_time(self) -> bool {
        matches!(
            self,
            StatusEffectType::Burn | StatusEffectType::Poison | StatusEffectType::Bleed
        )
    }

    /// Freeze and stun cost the target its next turn
    pub fn skips_turn(self) -> bool {
        matches!(self, StatusEffectType::Freeze | StatusEffectType::Stun)
    }

    /// Whether the effect lands on the caster rather than the opponent
    pub fn targets_self(self) -> bool {
        matches!(self, StatusEffectType::DefenseBoost)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatusEffectType::Burn => "burn",
            StatusEffectType::Poison => "poison",
            StatusEffectType::Bleed => "bleed",
            StatusEffectType::Freeze => "freeze",
            StatusEffectType::Stun => "stun",
            StatusEffectType::Slow => "slow",
            StatusEffectType::DefenseBoost => "defense_boost",
        }
    }
}

impl fmt::Display for StatusEffectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An effect currently active on a combatant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveStatus {
    /// Magnitude for slow (fraction) and defense boost (flat defense)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Damage per tick for DoT effects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<i64>,
    /// Ticks remaining
    pub duration: u32,
    /// Defense before a defense boost, restored on expiry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_defense: Option<i64>,
}

/// Request to place an effect on a combatant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusApplication {
    pub effect: StatusEffectType,
    pub duration: u32,
    #[serde(default)]
    pub damage: Option<i64>,
    #[serde(default)]
    pub value: Option<f64>,
}

impl StatusApplication {
    /// Damage-over-time effect dealing `damage` per tick
    pub fn dot(effect: StatusEffectType, damage: i64, duration: u32) -> Self {
        StatusApplication {
            effect,
            duration,
            damage: Some(damage.max(0)),
            value: None,
        }
    }

    /// Freeze or stun
    pub fn control(effect: StatusEffectType, duration: u32) -> Self {
        StatusApplication {
            effect,
            duration,
            damage: None,
            value: None,
        }
    }

    /// Slow reducing the target's attack by `value` (fraction)
    pub fn slow(value: f64, duration: u32) -> Self {
        StatusApplication {
            effect: StatusEffectType::Slow,
            duration,
            damage: None,
            value: Some(value.clamp(0.0, 1.0)),
        }
    }

    /// Flat defense increase
    pub fn defense_boost(amount: i64, duration: u32) -> Self {
        StatusApplication {
            effect: StatusEffectType::DefenseBoost,
            duration,
            damage: None,
            value: Some(amount as f64),
        }
    }
}
