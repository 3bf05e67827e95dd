//! Combat resolution - actions, attacks and the opponent's turn

pub mod actions;
mod attack;
mod opponent;
mod record;

pub use attack::{resolve_attack, AttackRoll};
pub use opponent::{counter_turn, roll_opponent_stats, MultiplierTrace, OpponentStats};
pub use record::{BattleEvent, RoundRecord};

use serde::{Deserialize, Serialize};

/// What a player action did
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub damage_dealt: i64,
    /// Multiplier on the opponent's next hit, set by defend
    pub damage_factor: Option<f64>,
}

impl ActionOutcome {
    pub fn damage(damage_dealt: i64) -> Self {
        ActionOutcome {
            damage_dealt,
            damage_factor: None,
        }
    }
}
