//! Prelude module for convenient imports
//!
//! ```rust
//! use battle_core::prelude::*;
//! ```

// Engine
pub use crate::battle::{BattleEngine, BattleOutcome, BattleState, TurnReport};

// Core types
pub use crate::types::{ActionId, CombatantStats, Rarity, Side};

// Player snapshot
pub use crate::skill::{BattleSkillEffects, LearnedSkill};
pub use crate::modifier::{PassiveKind, WeaponEffect};
pub use crate::source::{CombatantSource, PlayerLoadout};

// Results
pub use crate::combat::{BattleEvent, RoundRecord};
pub use crate::loot::RewardResult;

// Randomness
pub use crate::rng::{Dice, ScriptedDice};
