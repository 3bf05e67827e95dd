//! Error types for battle resolution

use thiserror::Error;

/// Why a requested action could not be carried out
///
/// These never abort a battle: the turn loop records the action as blocked
/// (or falls back to a plain attack for unknown skills) and the opponent
/// still takes its turn.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActionError {
    #[error("{action} is on cooldown for {remaining} more round(s)")]
    OnCooldown { action: String, remaining: u32 },
    #[error("not enough energy: {required} required, {available} available")]
    InsufficientEnergy { required: u32, available: u32 },
    #[error("ultimate is not charged")]
    UltimateNotReady,
    #[error("skill {0:?} is not equipped")]
    UnknownSkill(String),
    #[error("skill {0:?} cannot be used as an action")]
    NotUsable(String),
}

impl ActionError {
    /// Short machine-readable reason used in battle log entries
    pub fn reason(&self) -> &'static str {
        match self {
            ActionError::OnCooldown { .. } => "cooldown",
            ActionError::InsufficientEnergy { .. } => "energy",
            ActionError::UltimateNotReady => "ultimate_not_ready",
            ActionError::UnknownSkill(_) => "unknown_skill",
            ActionError::NotUsable(_) => "not_usable",
        }
    }
}

/// Caller contract violations and lookup failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BattleError {
    #[error("battle is already complete")]
    BattleComplete,
    #[error("battle is still in progress")]
    BattleInProgress,
    #[error("unknown zone: {0}")]
    UnknownZone(String),
    #[error("unknown character: {0}")]
    UnknownCharacter(String),
    #[error("invalid action: {0}")]
    InvalidAction(String),
}
