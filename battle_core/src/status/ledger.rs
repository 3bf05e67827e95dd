//! StatusLedger - per-combatant map of active effects and its tick processing

use super::{ActiveStatus, StatusApplication, StatusEffectType};
use crate::types::CombatantStats;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Result of advancing a ledger by one tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerTick {
    /// Damage dealt by each DoT this tick
    pub damage: Vec<(StatusEffectType, i64)>,
    /// Effects that ran out this tick
    pub expired: Vec<StatusEffectType>,
}

impl LedgerTick {
    pub fn total_damage(&self) -> i64 {
        self.damage.iter().map(|(_, d)| d).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.damage.is_empty() && self.expired.is_empty()
    }
}

/// Active timed effects on one combatant, at most one entry per type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusLedger {
    effects: BTreeMap<StatusEffectType, ActiveStatus>,
}

impl StatusLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place an effect, replacing any entry of the same type
    ///
    /// Re-applying a type overwrites its damage, value and duration rather
    /// than stacking. A replaced defense boost keeps the first recorded
    /// original defense so expiry still restores the true base value.
    /// Returns the entry that was replaced, if any.
    pub fn apply(
        &mut self,
        application: &StatusApplication,
        stats: &mut CombatantStats,
    ) -> Option<ActiveStatus> {
        if application.duration == 0 {
            return None;
        }

        let previous = self.effects.remove(&application.effect);

        let original_defense = if application.effect == StatusEffectType::DefenseBoost {
            let original = previous
                .as_ref()
                .and_then(|p| p.original_defense)
                .unwrap_or(stats.defense);
            let boost = application.value.unwrap_or(0.0).floor() as i64;
            stats.defense = original + boost;
            Some(original)
        } else {
            None
        };

        self.effects.insert(
            application.effect,
            ActiveStatus {
                value: application.value,
                damage: application.damage,
                duration: application.duration,
                original_defense,
            },
        );

        previous
    }

    /// Advance every effect by one tick
    ///
    /// DoTs deal their damage (health floors at 0), every duration drops by
    /// one, and effects reaching zero are removed and reversed.
    pub fn tick(&mut self, hp: &mut i64, stats: &mut CombatantStats) -> LedgerTick {
        let mut result = LedgerTick::default();

        for (effect, status) in self.effects.iter_mut() {
            if let Some(damage) = status.damage.filter(|_| effect.is_damage_over_time()) {
                let dealt = damage.clamp(0, (*hp).max(0));
                *hp -= dealt;
                result.damage.push((*effect, dealt));
            }
            status.duration = status.duration.saturating_sub(1);
        }

        let expired: Vec<StatusEffectType> = self
            .effects
            .iter()
            .filter(|(_, s)| s.duration == 0)
            .map(|(e, _)| *e)
            .collect();

        for effect in &expired {
            if let Some(status) = self.effects.remove(effect) {
                reverse(*effect, &status, stats);
            }
        }
        result.expired = expired;

        result
    }

    pub fn get(&self, effect: StatusEffectType) -> Option<&ActiveStatus> {
        self.effects.get(&effect)
    }

    pub fn contains(&self, effect: StatusEffectType) -> bool {
        self.effects.contains_key(&effect)
    }

    /// Attack reduction from an active slow, 0 when not slowed
    pub fn slow_value(&self) -> f64 {
        self.get(StatusEffectType::Slow)
            .and_then(|s| s.value)
            .unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatusEffectType, &ActiveStatus)> {
        self.effects.iter().map(|(e, s)| (*e, s))
    }
}

fn reverse(effect: StatusEffectType, status: &ActiveStatus, stats: &mut CombatantStats) {
    if effect == StatusEffectType::DefenseBoost {
        if let Some(original) = status.original_defense {
            stats.defense = original;
        }
    }
}
