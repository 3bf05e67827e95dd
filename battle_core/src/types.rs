//! Core types shared across the battle engine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Health, attack and defense snapshot for one combatant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CombatantStats {
    pub hp: i64,
    pub attack: i64,
    pub defense: i64,
}

impl CombatantStats {
    pub fn new(hp: i64, attack: i64, defense: i64) -> Self {
        CombatantStats { hp, attack, defense }
    }

    /// Scale every stat by the same multiplier, flooring each result
    ///
    /// Health never drops below 1.
    pub fn scaled(&self, multiplier: f64) -> Self {
        let scale = |value: i64| (value as f64 * multiplier + 1e-9).floor() as i64;
        CombatantStats {
            hp: scale(self.hp).max(1),
            attack: scale(self.attack),
            defense: scale(self.defense),
        }
    }
}

/// Which side of the battle an event concerns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Player,
    Beast,
}

/// Rarity tier for opponents and loot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Legendary,
    Mythic,
}

impl Rarity {
    /// All tiers, lowest first
    pub fn all() -> &'static [Rarity] {
        &[
            Rarity::Common,
            Rarity::Uncommon,
            Rarity::Rare,
            Rarity::Legendary,
            Rarity::Mythic,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Legendary => "legendary",
            Rarity::Mythic => "mythic",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A player action request
///
/// Text form: `attack`, `defend`, `special`, `ultimate` or `skill:<id>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ActionId {
    Attack,
    Defend,
    Special,
    Ultimate,
    Skill(String),
}

impl ActionId {
    pub fn skill(id: impl Into<String>) -> Self {
        ActionId::Skill(id.into())
    }

    /// Whether this action keeps the consecutive-defend streak alive
    pub fn preserves_defend_streak(&self) -> bool {
        matches!(self, ActionId::Defend | ActionId::Skill(_))
    }

    /// Short kind label used in log entries
    pub fn kind(&self) -> &'static str {
        match self {
            ActionId::Attack => "attack",
            ActionId::Defend => "defend",
            ActionId::Special => "special",
            ActionId::Ultimate => "ultimate",
            ActionId::Skill(_) => "skill",
        }
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionId::Skill(id) => write!(f, "skill:{}", id),
            other => f.write_str(other.kind()),
        }
    }
}

/// Error for unparseable action strings
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised action: {0:?}")]
pub struct ParseActionError(pub String);

impl FromStr for ActionId {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "attack" => Ok(ActionId::Attack),
            "defend" => Ok(ActionId::Defend),
            "special" => Ok(ActionId::Special),
            "ultimate" => Ok(ActionId::Ultimate),
            other => match other.strip_prefix("skill:") {
                Some(id) if !id.is_empty() => Ok(ActionId::Skill(id.to_string())),
                _ => Err(ParseActionError(s.to_string())),
            },
        }
    }
}

impl TryFrom<String> for ActionId {
    type Error = ParseActionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ActionId> for String {
    fn from(action: ActionId) -> Self {
        action.to_string()
    }
}
