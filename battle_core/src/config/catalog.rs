//! Zones and their opponent pools

use super::ConfigError;
use crate::types::{CombatantStats, Rarity};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// One item an opponent can drop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootEntry {
    pub name: String,
    pub rarity: Rarity,
    /// Relative pick weight within the entry's rarity tier
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Boss fragment, only awarded by the fragment roll
    #[serde(default)]
    pub fragment: bool,
}

fn default_weight() -> f64 {
    1.0
}

impl LootEntry {
    pub fn new(name: impl Into<String>, rarity: Rarity) -> Self {
        LootEntry {
            name: name.into(),
            rarity,
            weight: 1.0,
            fragment: false,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn fragment(mut self) -> Self {
        self.fragment = true;
        self
    }
}

/// An opponent as authored in the zone table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpponentDefinition {
    pub name: String,
    pub rarity: Rarity,
    /// Unscaled stats, multiplied at spawn
    pub base: CombatantStats,
    /// Owning zone; filled in from the enclosing zone when loading
    #[serde(default)]
    pub zone: String,
    #[serde(default)]
    pub boss: bool,
    #[serde(default)]
    pub loot: Vec<LootEntry>,
}

impl OpponentDefinition {
    pub fn new(name: impl Into<String>, rarity: Rarity, base: CombatantStats) -> Self {
        OpponentDefinition {
            name: name.into(),
            rarity,
            base,
            zone: String::new(),
            boss: false,
            loot: Vec::new(),
        }
    }

    pub fn in_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = zone.into();
        self
    }

    pub fn as_boss(mut self) -> Self {
        self.boss = true;
        self
    }

    pub fn with_loot(mut self, loot: Vec<LootEntry>) -> Self {
        self.loot = loot;
        self
    }

    /// Non-fragment loot entries of one rarity
    pub fn loot_of(&self, rarity: Rarity) -> impl Iterator<Item = &LootEntry> {
        self.loot
            .iter()
            .filter(move |e| e.rarity == rarity && !e.fragment)
    }

    pub fn fragments(&self) -> impl Iterator<Item = &LootEntry> {
        self.loot.iter().filter(|e| e.fragment)
    }
}

/// An exploration zone and the opponents that spawn in it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneDefinition {
    pub id: String,
    pub name: String,
    pub min_level: u32,
    pub max_level: u32,
    /// Experience multiplier for victories in this zone
    #[serde(default = "default_xp_multiplier")]
    pub xp_multiplier: f64,
    #[serde(default)]
    pub opponents: Vec<OpponentDefinition>,
}

fn default_xp_multiplier() -> f64 {
    1.0
}

impl ZoneDefinition {
    /// Level above which sparkling opponents can appear
    pub fn middle_level(&self) -> u32 {
        (self.min_level + self.max_level) / 2
    }

    pub fn contains_level(&self, level: u32) -> bool {
        level >= self.min_level && level <= self.max_level
    }

    pub fn opponent(&self, name: &str) -> Option<&OpponentDefinition> {
        self.opponents.iter().find(|o| o.name == name)
    }

    pub fn bosses(&self) -> impl Iterator<Item = &OpponentDefinition> {
        self.opponents.iter().filter(|o| o.boss)
    }
}

/// Static zone → opponent pool table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpponentCatalog {
    zones: Vec<ZoneDefinition>,
}

impl OpponentCatalog {
    /// Build a catalog, filling each opponent's zone and validating the table
    pub fn new(mut zones: Vec<ZoneDefinition>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        for zone in &mut zones {
            if !seen.insert(zone.id.clone()) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate zone id '{}'",
                    zone.id
                )));
            }
            if zone.min_level > zone.max_level {
                return Err(ConfigError::ValidationError(format!(
                    "zone '{}' has min_level above max_level",
                    zone.id
                )));
            }
            if zone.xp_multiplier < 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "zone '{}' has a negative xp_multiplier",
                    zone.id
                )));
            }
            for opponent in &mut zone.opponents {
                if opponent.base.hp <= 0 {
                    return Err(ConfigError::ValidationError(format!(
                        "opponent '{}' in zone '{}' needs positive hp",
                        opponent.name, zone.id
                    )));
                }
                if let Some(entry) = opponent.loot.iter().find(|e| e.weight < 0.0) {
                    return Err(ConfigError::ValidationError(format!(
                        "loot entry '{}' has a negative weight",
                        entry.name
                    )));
                }
                opponent.zone = zone.id.clone();
            }
        }
        Ok(OpponentCatalog { zones })
    }

    /// Load the zone table from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let file: ZonesFile = super::load_toml(path)?;
        Self::new(file.zones)
    }

    /// Parse the zone table from a TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let file: ZonesFile = super::parse_toml(content)?;
        Self::new(file.zones)
    }

    /// Get the bundled zone table
    pub fn bundled() -> Self {
        let toml = include_str!("../../config/zones.toml");
        Self::parse(toml).unwrap_or_default()
    }

    pub fn zones(&self) -> &[ZoneDefinition] {
        &self.zones
    }

    pub fn zone(&self, id: &str) -> Option<&ZoneDefinition> {
        self.zones.iter().find(|z| z.id == id)
    }

    /// Opponent pool for a zone
    pub fn pool(&self, zone_id: &str) -> Option<&[OpponentDefinition]> {
        self.zone(zone_id).map(|z| z.opponents.as_slice())
    }

    /// Look an opponent up by name across every zone
    pub fn opponent(&self, name: &str) -> Option<&OpponentDefinition> {
        self.zones.iter().find_map(|z| z.opponent(name))
    }

    /// First zone whose level range contains `level`
    pub fn zone_for_level(&self, level: u32) -> Option<&ZoneDefinition> {
        self.zones.iter().find(|z| z.contains_level(level))
    }
}

#[derive(Debug, Deserialize)]
struct ZonesFile {
    #[serde(default)]
    zones: Vec<ZoneDefinition>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZONES: &str = r#"
[[zones]]
id = "meadow"
name = "Meadow"
min_level = 1
max_level = 10

[[zones.opponents]]
name = "Rabbit"
rarity = "common"
base = { hp = 20, attack = 4, defense = 1 }
loot = [
    { name = "Fur", rarity = "common", weight = 2.0 },
    { name = "Foot", rarity = "uncommon" },
]

[[zones.opponents]]
name = "Old Hare"
rarity = "mythic"
boss = true
base = { hp = 200, attack = 20, defense = 8 }
loot = [
    { name = "Hare Crown", rarity = "mythic" },
    { name = "Hare Shard", rarity = "mythic", fragment = true },
]
"#;

    #[test]
    fn test_parse_zones() {
        let catalog = OpponentCatalog::parse(ZONES).unwrap();
        let zone = catalog.zone("meadow").unwrap();
        assert_eq!(zone.middle_level(), 5);
        assert!((zone.xp_multiplier - 1.0).abs() < f64::EPSILON);

        let rabbit = catalog.opponent("Rabbit").unwrap();
        assert_eq!(rabbit.zone, "meadow");
        assert!(!rabbit.boss);
        assert!((rabbit.loot[0].weight - 2.0).abs() < f64::EPSILON);
        assert!((rabbit.loot[1].weight - 1.0).abs() < f64::EPSILON);
        assert_eq!(catalog.pool("meadow").map(|p| p.len()), Some(2));
        assert!(catalog.pool("desert").is_none());
    }

    #[test]
    fn test_fragments_are_kept_out_of_tiers() {
        let catalog = OpponentCatalog::parse(ZONES).unwrap();
        let hare = catalog.opponent("Old Hare").unwrap();
        assert_eq!(hare.loot_of(Rarity::Mythic).count(), 1);
        assert_eq!(hare.fragments().count(), 1);
        assert_eq!(catalog.zone("meadow").unwrap().bosses().count(), 1);
    }

    #[test]
    fn test_duplicate_zone_rejected() {
        let zone = ZoneDefinition {
            id: "meadow".to_string(),
            name: "Meadow".to_string(),
            min_level: 1,
            max_level: 5,
            xp_multiplier: 1.0,
            opponents: Vec::new(),
        };
        let result = OpponentCatalog::new(vec![zone.clone(), zone]);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_bundled_zones() {
        let catalog = OpponentCatalog::bundled();
        let multipliers: Vec<f64> = catalog.zones().iter().map(|z| z.xp_multiplier).collect();
        assert_eq!(multipliers, vec![1.0, 2.5, 4.75, 7.25, 10.0]);
        assert_eq!(catalog.zone_for_level(30).map(|z| z.id.as_str()), Some("ember_caverns"));

        let leviathan = catalog.opponent("Abyssal Leviathan").unwrap();
        assert!(leviathan.boss);
        assert_eq!(leviathan.rarity, Rarity::Mythic);
        assert_eq!(leviathan.fragments().count(), 1);
    }
}
