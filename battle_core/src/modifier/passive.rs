//! Passive skill bonuses active for the whole battle

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The kinds of passive bonus a learned skill can grant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassiveKind {
    /// Flat damage added to every landed attack
    BonusDamage,
    /// Percent increased attack
    AttackBoost,
    /// Added critical strike chance, in percent
    CriticalChance,
    /// Percent reduction of incoming damage
    DamageReduction,
    /// Percent of max health healed on a successful defend
    DefendHeal,
    /// Added chance to dodge opponent attacks, in percent
    Evasion,
}

/// Magnitudes of every passive bonus, keyed by kind
///
/// Repeated grants of the same kind sum.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PassiveBonuses(BTreeMap<PassiveKind, f64>);

impl PassiveBonuses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: PassiveKind, magnitude: f64) -> Self {
        self.add(kind, magnitude);
        self
    }

    pub fn add(&mut self, kind: PassiveKind, magnitude: f64) {
        *self.0.entry(kind).or_insert(0.0) += magnitude;
    }

    /// Magnitude for a kind, 0 when absent
    pub fn get(&self, kind: PassiveKind) -> f64 {
        self.0.get(&kind).copied().unwrap_or(0.0)
    }

    /// Magnitude as a fraction (percent / 100)
    pub fn fraction(&self, kind: PassiveKind) -> f64 {
        self.get(kind) / 100.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PassiveKind, f64)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }
}

impl FromIterator<(PassiveKind, f64)> for PassiveBonuses {
    fn from_iter<T: IntoIterator<Item = (PassiveKind, f64)>>(iter: T) -> Self {
        let mut bonuses = PassiveBonuses::new();
        for (kind, magnitude) in iter {
            bonuses.add(kind, magnitude);
        }
        bonuses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_kind_is_zero() {
        let bonuses = PassiveBonuses::new();
        assert_eq!(bonuses.get(PassiveKind::BonusDamage), 0.0);
        assert!(bonuses.is_empty());
    }

    #[test]
    fn test_grants_sum() {
        let bonuses: PassiveBonuses = [
            (PassiveKind::CriticalChance, 5.0),
            (PassiveKind::CriticalChance, 2.5),
        ]
        .into_iter()
        .collect();
        assert!((bonuses.get(PassiveKind::CriticalChance) - 7.5).abs() < f64::EPSILON);
        assert!((bonuses.fraction(PassiveKind::CriticalChance) - 0.075).abs() < 1e-12);
    }

    #[test]
    fn test_json_round_trip_keys() {
        let bonuses = PassiveBonuses::new()
            .with(PassiveKind::BonusDamage, 4.0)
            .with(PassiveKind::DamageReduction, 10.0);
        let json = serde_json::to_string(&bonuses).unwrap();
        assert!(json.contains("bonus_damage"));
        let back: PassiveBonuses = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bonuses);
    }
}
