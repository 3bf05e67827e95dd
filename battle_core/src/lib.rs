//! battle_core - Turn-based battle resolution for an exploration RPG
//!
//! This library provides:
//! - BattleEngine: battle setup, the turn loop and reward resolution
//! - BattleState: the serializable state of one battle
//! - Modifier pipeline: passive skills, weapon effects and stat math
//! - Status ledger: timed effects on either combatant
//! - Content configuration: constants, zones, skills and reward tables from TOML
//!
//! Every random decision goes through [`rng::Dice`], so battles replay
//! exactly under a seeded RNG or a scripted sequence.

pub mod battle;
pub mod combat;
pub mod config;
pub mod error;
pub mod loot;
pub mod modifier;
pub mod prelude;
pub mod resource;
pub mod rng;
pub mod skill;
pub mod source;
pub mod status;
pub mod types;

// Re-export core types for convenience
pub use battle::{
    ActionDescriptor, BattleEngine, BattleOutcome, BattleState, BattleStatistics, Combatant,
    TurnReport,
};
pub use combat::{ActionOutcome, BattleEvent, MultiplierTrace, OpponentStats, RoundRecord};
pub use config::{ConfigError, GameContent, OpponentCatalog, OpponentDefinition, ZoneDefinition};
pub use error::{ActionError, BattleError};
pub use loot::{BossNotification, ItemDrop, RewardResult, VictoryRewards};
pub use modifier::{PassiveBonuses, PassiveKind, WeaponEffect};
pub use resource::Resources;
pub use rng::{Dice, ScriptedDice};
pub use skill::{BattleSkillEffects, LearnedSkill, SkillDefinition, SkillEffectKind, SkillType};
pub use source::{CombatantSource, InMemoryRoster, PlayerLoadout, RosterEntry};
pub use status::{StatusEffectType, StatusLedger};
pub use types::{ActionId, CombatantStats, Rarity, Side};
